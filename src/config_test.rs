use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_defaults_when_unset() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(
        cfg.timeouts,
        Timeouts { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    );
    assert_eq!(cfg, ClientConfig::default());
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        ("OLAHUB_API_URL", "https://hub.example.test/api/"),
        ("OLAHUB_REQUEST_TIMEOUT_SECS", "42"),
        ("OLAHUB_CONNECT_TIMEOUT_SECS", " 7 "),
    ]))
    .unwrap();
    assert_eq!(cfg.api_url, "https://hub.example.test/api");
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 42, connect_secs: 7 });
}

#[test]
fn from_lookup_bad_timeout_falls_back_to_default() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("OLAHUB_REQUEST_TIMEOUT_SECS", "soon")])).unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
}

#[test]
fn from_lookup_blank_url_uses_default() {
    for blank in ["", "   "] {
        let cfg = ClientConfig::from_lookup(lookup_from(&[("OLAHUB_API_URL", blank)])).unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
    }
}

#[test]
fn from_lookup_slash_only_url_errors() {
    let err = ClientConfig::from_lookup(lookup_from(&[("OLAHUB_API_URL", "  / ")])).unwrap_err();
    assert_eq!(err, ConfigError::EmptyApiUrl);
}

#[test]
fn with_api_url_rejects_empty() {
    assert_eq!(ClientConfig::with_api_url("").unwrap_err(), ConfigError::EmptyApiUrl);
}

#[test]
fn from_lookup_non_http_url_errors() {
    let err = ClientConfig::from_lookup(lookup_from(&[("OLAHUB_API_URL", "ftp://hub")])).unwrap_err();
    assert!(err.to_string().contains("ftp://hub"));
}

#[test]
fn with_api_url_trims_trailing_slashes() {
    let cfg = ClientConfig::with_api_url("http://127.0.0.1:9000/api//").unwrap();
    assert_eq!(cfg.api_url, "http://127.0.0.1:9000/api");
}
