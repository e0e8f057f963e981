use std::path::Path;

use serde_json::{Map, Value};

use crate::core::endpoint::Endpoint;
use crate::core::transport::{HttpTransport, ServiceResponse, Transport};
use crate::error::{ChartError, Result};
use crate::schemas::chart::ShortUrlResponse;

const CHART_PATH: &str = "/chart";
const SHORT_URL_PATH: &str = "/chart/create";

/// Client for the QuickChart rendering service.
///
/// Fields are set directly or through the `with_*` helpers; `config` must be
/// present before any URL or request is built.
#[derive(Debug, Clone)]
pub struct ChartClient<T = HttpTransport> {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f64,
    pub format: String,
    pub background_color: String,
    pub key: Option<String>,
    pub version: Option<String>,
    pub config: Option<String>,
    pub endpoint: Endpoint,
    transport: T,
}

impl ChartClient {
    /// Client targeting `https://quickchart.io:443` over the shared transport.
    pub fn new() -> Self {
        Self::with_transport_and_endpoint(HttpTransport::shared(), Endpoint::default())
    }

    /// Client targeting a self-hosted service, see [`Endpoint::resolve`].
    pub fn with_target(scheme: Option<&str>, host: Option<&str>, port: Option<u16>) -> Self {
        Self::with_transport_and_endpoint(
            HttpTransport::shared(),
            Endpoint::resolve(scheme, host, port),
        )
    }
}

impl Default for ChartClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> ChartClient<T> {
    pub fn with_transport_and_endpoint(transport: T, endpoint: Endpoint) -> Self {
        Self {
            width: 500,
            height: 300,
            device_pixel_ratio: 1.0,
            format: "png".to_string(),
            background_color: "transparent".to_string(),
            key: None,
            version: None,
            config: None,
            endpoint,
            transport,
        }
    }

    /// Swap the transport, keeping every other field.
    pub fn with_transport<U: Transport>(self, transport: U) -> ChartClient<U> {
        ChartClient {
            width: self.width,
            height: self.height,
            device_pixel_ratio: self.device_pixel_ratio,
            format: self.format,
            background_color: self.background_color,
            key: self.key,
            version: self.version,
            config: self.config,
            endpoint: self.endpoint,
            transport,
        }
    }

    pub fn with_config(mut self, config: impl Into<String>) -> Self {
        self.config = Some(config.into());
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET url that renders the chart, e.g.
    /// `https://quickchart.io:443/chart?w=500&h=300&devicePixelRatio=1&f=png&bkg=transparent&c=...`
    pub fn build_url(&self) -> Result<String> {
        let config = self.require_config("building a URL")?;

        let mut params: Vec<String> = vec![
            format!("w={}", self.width),
            format!("h={}", self.height),
            format!("devicePixelRatio={}", self.device_pixel_ratio),
            format!("f={}", self.format),
            format!("bkg={}", urlencoding::encode(&self.background_color)),
            format!("c={}", urlencoding::encode(config)),
        ];

        if let Some(key) = non_empty(&self.key) {
            params.push(format!("key={}", urlencoding::encode(key)));
        }
        if let Some(version) = non_empty(&self.version) {
            params.push(format!("v={}", urlencoding::encode(version)));
        }

        let url = format!(
            "{}{}?{}",
            self.endpoint.base_url(),
            CHART_PATH,
            params.join("&")
        );
        tracing::debug!("Built chart url: {}", url);

        Ok(url)
    }

    /// JSON body shared by the POST endpoints. `key` and `version` are left
    /// out entirely when unset or empty.
    pub fn build_payload(&self) -> Result<Value> {
        let config = self.require_config("building a request payload")?;

        let mut payload = Map::new();
        payload.insert("width".to_string(), Value::from(self.width));
        payload.insert("height".to_string(), Value::from(self.height));
        payload.insert(
            "backgroundColor".to_string(),
            Value::from(self.background_color.as_str()),
        );
        payload.insert(
            "devicePixelRatio".to_string(),
            Value::from(self.device_pixel_ratio),
        );
        payload.insert("format".to_string(), Value::from(self.format.as_str()));
        payload.insert("chart".to_string(), Value::from(config));

        if let Some(key) = non_empty(&self.key) {
            payload.insert("key".to_string(), Value::from(key));
        }
        if let Some(version) = non_empty(&self.version) {
            payload.insert("version".to_string(), Value::from(version));
        }

        Ok(Value::Object(payload))
    }

    /// Ask the service for a short redirect URL rendering this chart.
    ///
    /// The `status` flag of the response body is not checked; a success
    /// status code is trusted.
    pub async fn request_short_url(&self) -> Result<String> {
        self.require_config("requesting a short URL")?;

        let response = self.post(SHORT_URL_PATH).await?;
        let parsed: ShortUrlResponse = serde_json::from_slice(&response.body)?;

        tracing::info!("Short url created: {}", parsed.url);
        Ok(parsed.url)
    }

    /// Rendered image in the configured `format`, bytes exactly as received.
    pub async fn request_image_bytes(&self) -> Result<Vec<u8>> {
        self.require_config("requesting an image")?;

        let response = self.post(CHART_PATH).await?;
        tracing::info!(
            "Chart rendered: {}x{} {}, size: {} bytes",
            self.width,
            self.height,
            self.format,
            response.body.len()
        );

        Ok(response.body)
    }

    /// Render the chart and overwrite `path` with the image.
    pub async fn write_image_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.request_image_bytes().await?;

        tokio::fs::write(path, &bytes)
            .await
            .map_err(|source| ChartError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!("Chart written to {}", path.display());
        Ok(())
    }

    async fn post(&self, path: &str) -> Result<ServiceResponse> {
        let url = self.endpoint.request_url(path)?;
        let body = serde_json::to_string(&self.build_payload()?)?;

        let response = self.transport.post_json(url, body).await?;
        if !response.is_success() {
            tracing::warn!(
                "Chart API {} answered {}: {}",
                path,
                response.status,
                response.text()
            );
            return Err(ChartError::Api(Box::new(response)));
        }

        Ok(response)
    }

    fn require_config(&self, operation: &'static str) -> Result<&str> {
        self.config
            .as_deref()
            .ok_or(ChartError::MissingConfig { operation })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
