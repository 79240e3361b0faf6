use blog_client::config::ClientConfig;
use blog_client::telemetry;

fn print_version() {
    println!("blog-client {}", env!("CARGO_PKG_VERSION"));
}

fn main() -> anyhow::Result<()> {
    if std::env::args().any(|a| a == "--version" || a == "-V") {
        print_version();
        return Ok(());
    }

    let config = ClientConfig::from_env()?;
    telemetry::init_telemetry(&config);
    tracing::info!(api = %config.api.base_url, "blog-client configured");

    Ok(())
}
