use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::core::transport::ServiceResponse;

#[derive(Error, Debug)]
pub enum ChartError {
    /// The chart config was not set before an operation that needs it.
    #[error("config must be set on the chart before {operation}")]
    MissingConfig { operation: &'static str },

    /// The service answered with a non-success status code.
    #[error("unsuccessful response from chart API: {}", .0.status)]
    Api(Box<ServiceResponse>),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write image to {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ChartError {
    /// Status code of the failed API call, if this is an API error.
    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(|response| response.status)
    }

    pub fn response(&self) -> Option<&ServiceResponse> {
        match self {
            ChartError::Api(response) => Some(response.as_ref()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
