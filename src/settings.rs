use std::env;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::core::client::ChartClient;

/// What the demo binary does with the chart.
#[derive(Clone, Copy, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Print the GET url
    #[default]
    Url,
    /// Print a short url created by the service
    Short,
    /// Write the rendered image to disk
    Image,
}

/// Settings read from `QUICKCHART_*` environment variables.
#[derive(Clone, Deserialize, Debug)]
pub struct Settings {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub key: Option<String>,
    pub version: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub device_pixel_ratio: Option<f64>,
    pub format: Option<String>,
    pub background_color: Option<String>,
    pub chart_path: String,
    pub output: Option<String>,
    #[serde(default)]
    pub mode: Mode,
}

impl Settings {
    /// Client for `config` with every configured override applied.
    pub fn build_client(&self, config: impl Into<String>) -> ChartClient {
        let mut client = ChartClient::with_target(
            self.scheme.as_deref(),
            self.host.as_deref(),
            self.port,
        )
        .with_config(config);

        if let Some(width) = self.width {
            client.width = width;
        }
        if let Some(height) = self.height {
            client.height = height;
        }
        if let Some(ratio) = self.device_pixel_ratio {
            client.device_pixel_ratio = ratio;
        }
        if let Some(format) = &self.format {
            client.format = format.clone();
        }
        if let Some(color) = &self.background_color {
            client.background_color = color.clone();
        }
        client.key = self.key.clone();
        client.version = self.version.clone();

        client
    }

    /// Image output path, `chart.<format>` unless set.
    pub fn output_path(&self) -> String {
        self.output.clone().unwrap_or_else(|| {
            format!("chart.{}", self.format.as_deref().unwrap_or("png"))
        })
    }
}

pub fn get_settings() -> Result<Settings> {
    let env_var = env::var("QUICKCHART_ENV").unwrap_or("file".to_string());
    if env_var == "file" {
        info!("using .env file as environment variable");
        let _ = dotenvy::dotenv();
    } else {
        info!("using server environment as environment variable");
    }

    envy::prefixed("QUICKCHART_")
        .from_env::<Settings>()
        .context("failed to read QUICKCHART_* settings")
}
