use forms_to_mailchimp::configuration::get_configuration;
use forms_to_mailchimp::startup::Application;
use forms_to_mailchimp::telemetry::get_subscriber;
use forms_to_mailchimp::telemetry::init_subscriber;

/// Initialise telemetry, load config, and start the server
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // only logs at the specified level and higher are emitted; `RUST_LOG`
    // overrides this
    let subscriber = get_subscriber("forms-to-mailchimp", "info", std::io::stdout);
    init_subscriber(subscriber)?;

    let cfg = get_configuration()?;
    tracing::info!(
        host = %cfg.application.host,
        port = cfg.application.port,
        "starting server"
    );

    let app = Application::build(cfg).await?;
    app.run_until_stopped().await?;
    Ok(())
}
