//! `fetch`-backed transport for the core API client.
//!
//! Browser builds (`csr`) issue real requests via `gloo-net`. Native builds
//! return a transport error, since the endpoints are only reachable from the
//! page.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use olahub::api::{ApiRequest, ApiResponse, HttpTransport};
use olahub::error::TransportError;

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[cfg(any(test, feature = "csr"))]
fn network_error_message(method: olahub::api::Method, url: &str, detail: &str) -> String {
    format!("{method} {url} failed: {detail}")
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::{Method, RequestBuilder};

            let method = match request.method {
                olahub::api::Method::Get => Method::GET,
                olahub::api::Method::Post => Method::POST,
                olahub::api::Method::Put => Method::PUT,
                olahub::api::Method::Patch => Method::PATCH,
                olahub::api::Method::Delete => Method::DELETE,
            };
            let fail = |e: gloo_net::Error| TransportError(network_error_message(request.method, &request.url, &e.to_string()));

            let mut builder = RequestBuilder::new(&request.url).method(method);
            if !request.query.is_empty() {
                builder = builder.query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            }
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let prepared = match request.body.as_deref() {
                Some(body) => builder.body(body),
                None => builder.build(),
            }
            .map_err(fail)?;

            let response = prepared.send().await.map_err(fail)?;
            let status = response.status();
            let body = response.text().await.map_err(fail)?;
            Ok(ApiResponse { status, body })
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(TransportError(format!("{} {}: not available outside the browser", request.method, request.url)))
        }
    }
}
