//! Client for the QuickChart chart-rendering service.
//!
//! ```no_run
//! use quickchart_client::ChartClient;
//!
//! # async fn run() -> quickchart_client::Result<()> {
//! let chart = ChartClient::new()
//!     .with_config(r#"{"type":"bar","data":{"labels":["a","b"],"datasets":[{"data":[1,2]}]}}"#)
//!     .with_size(600, 400);
//!
//! println!("{}", chart.build_url()?);
//! println!("{}", chart.request_short_url().await?);
//! chart.write_image_to_path("chart.png").await?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;
pub mod schemas;
pub mod settings;

pub use crate::core::client::ChartClient;
pub use crate::core::endpoint::Endpoint;
pub use crate::core::transport::{HttpTransport, ServiceResponse, Transport};
pub use crate::error::{ChartError, Result};
