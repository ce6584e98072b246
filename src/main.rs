use tracing_subscriber::EnvFilter;

use ticket_alerts_lib::config::AppConfig;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Every outcome, including bad configuration, exits 0.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("✗ Invalid configuration: {err:#}");
            return;
        }
    };

    ticket_alerts_lib::run(&config, ticket_alerts_lib::today());
}
