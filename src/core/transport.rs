use std::future::Future;

use once_cell::sync::Lazy;
use reqwest::{
    Client, StatusCode,
    header::{CONTENT_TYPE, HeaderMap},
};
use url::Url;

use crate::error::Result;

static SHARED_CLIENT: Lazy<Client> = Lazy::new(Client::new);

/// Raw answer of the chart service.
#[derive(Debug, Clone)]
pub struct ServiceResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ServiceResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body decoded as UTF-8, invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Outbound HTTP used by [`ChartClient`](crate::core::client::ChartClient).
pub trait Transport: Send + Sync {
    /// POST `body` as `application/json` to `url` and collect the whole response.
    ///
    /// Non-success statuses are returned as a normal response; only failures
    /// to complete the exchange are errors.
    fn post_json(
        &self,
        url: Url,
        body: String,
    ) -> impl Future<Output = Result<ServiceResponse>> + Send;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Wrap a caller-built client, e.g. one configured with a timeout.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Transport sharing one process-wide connection pool.
    pub fn shared() -> Self {
        Self::new(SHARED_CLIENT.clone())
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::shared()
    }
}

impl Transport for HttpTransport {
    async fn post_json(&self, url: Url, body: String) -> Result<ServiceResponse> {
        tracing::debug!("POST {} ({} bytes)", url, body.len());

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(ServiceResponse {
            status,
            headers,
            body,
        })
    }
}
