use anyhow::{Context, Result};
use quickchart_client::settings::{Mode, get_settings};
use tracing::Level;

#[tokio::main]
async fn main() -> Result<()> {
    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let settings = get_settings()?;
    tracing::info!(
        "run in {:?} mode with chart {}",
        settings.mode,
        settings.chart_path
    );

    let config = tokio::fs::read_to_string(&settings.chart_path)
        .await
        .with_context(|| format!("failed to read chart config {}", settings.chart_path))?;
    let client = settings.build_client(config);

    match settings.mode {
        Mode::Url => println!("{}", client.build_url()?),
        Mode::Short => {
            let url = client
                .request_short_url()
                .await
                .context("short url request failed")?;
            println!("{}", url);
        }
        Mode::Image => {
            let output = settings.output_path();
            client
                .write_image_to_path(&output)
                .await
                .context("chart render failed")?;
            println!("{}", output);
        }
    }

    Ok(())
}
