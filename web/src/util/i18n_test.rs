use super::*;

#[test]
fn parse_accepts_region_codes() {
    assert_eq!(Locale::parse("en"), Some(Locale::En));
    assert_eq!(Locale::parse("en-US"), Some(Locale::En));
    assert_eq!(Locale::parse("zh_CN"), Some(Locale::Zh));
    assert_eq!(Locale::parse(" ZH "), Some(Locale::Zh));
    assert_eq!(Locale::parse("fr"), None);
    assert_eq!(Locale::parse(""), None);
}

#[test]
fn saved_locale_beats_browser_language() {
    assert_eq!(resolve_locale(Some("en"), Some("zh-CN")), Locale::En);
    assert_eq!(resolve_locale(None, Some("en-GB")), Locale::En);
    assert_eq!(resolve_locale(Some("klingon"), Some("en")), Locale::En);
}

#[test]
fn chinese_is_the_fallback() {
    assert_eq!(resolve_locale(None, None), Locale::Zh);
    assert_eq!(resolve_locale(None, Some("de-DE")), Locale::Zh);
    assert_eq!(Locale::default(), Locale::Zh);
}

#[test]
fn toggle_round_trips() {
    assert_eq!(Locale::Zh.toggled(), Locale::En);
    assert_eq!(Locale::En.toggled().toggled(), Locale::En);
}

#[test]
fn table_has_both_languages() {
    assert_eq!(tr(Locale::En, Text::SignOut), "Sign out");
    assert_eq!(tr(Locale::Zh, Text::SignOut), "退出登录");
    assert_eq!(tr(Locale::Zh, Text::Copied), "已复制到剪贴板");
}
