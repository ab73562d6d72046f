//! Browser `HttpClient` backed by `gloo-net`.
//!
//! Client-side (hydrate): every request is sent with
//! `credentials: include`, so the browser attaches the HttpOnly session
//! cookie. Client code never sees the cookie.
//! Server-side (SSR): requests fail immediately since the session lives in
//! the browser's cookie jar.

use super::transport::{HttpClient, WireError, WireRequest, WireResponse};

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for BrowserClient {
    async fn execute(&self, request: WireRequest) -> Result<WireResponse, WireError> {
        #[cfg(feature = "hydrate")]
        {
            use super::transport::Method;
            use gloo_net::http::RequestBuilder;
            use web_sys::RequestCredentials;

            let builder = match request.method {
                Method::Get => RequestBuilder::new(&request.url).method(gloo_net::http::Method::GET),
                Method::Post => RequestBuilder::new(&request.url).method(gloo_net::http::Method::POST),
            }
            .credentials(RequestCredentials::Include)
            .header("Accept", "application/json");

            let resp = match request.body {
                Some(body) => builder
                    .header("Content-Type", "application/json")
                    .body(body)
                    .map_err(|e| WireError(e.to_string()))?
                    .send()
                    .await,
                None => builder.send().await,
            }
            .map_err(|e| WireError(e.to_string()))?;

            let status = resp.status();
            let body = resp.text().await.map_err(|e| WireError(e.to_string()))?;
            Ok(WireResponse { status, body })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            drop(request);
            Err(WireError("not available on server".to_owned()))
        }
    }
}
