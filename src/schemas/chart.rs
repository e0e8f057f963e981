use serde::{Deserialize, Serialize};

/// Body returned by `POST /chart/create`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ShortUrlResponse {
    /// Success flag reported by the service
    #[serde(default)]
    pub status: bool,

    /// Short redirect URL rendering the chart
    pub url: String,
}
