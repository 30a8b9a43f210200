use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::web;
use actix_web::App;
use actix_web::HttpServer;
use tracing_actix_web::TracingLogger;

use crate::configuration::FormSettings;
use crate::configuration::Settings;
use crate::connector_log::ConnectorLog;
use crate::connector_log::TracingLog;
use crate::forwarder::SubscriberForwarder;
use crate::routes::connector_info;
use crate::routes::health_check;
use crate::routes::receive_submission;

/// Wrapper for actix's `Server` with access to the bound port
pub struct Application {
    /// Left private; use `port` to access
    port: u16,
    server: Server,
}

impl Application {
    /// Bind to the configured address and build the server, with connector
    /// events going to `tracing`
    pub async fn build(cfg: Settings) -> Result<Self, anyhow::Error> {
        Self::build_with_log(cfg, Arc::new(TracingLog)).await
    }

    /// Like `build`, but connector events go to `log` instead (tests)
    pub async fn build_with_log(
        cfg: Settings,
        log: Arc<dyn ConnectorLog>,
    ) -> Result<Self, anyhow::Error> {
        let addr = format!("{}:{}", cfg.application.host, cfg.application.port);
        let listener = TcpListener::bind(addr)?;
        // the OS-assigned port, if `port` was 0
        let port = listener.local_addr()?.port();

        let forwarder = SubscriberForwarder::new(cfg.mailchimp.client(), log);
        let server = run(listener, forwarder, cfg.forms)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 { self.port }

    /// Because this consumes `self`, this should be the final function call (or
    /// passed to `tokio::spawn`)
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> { self.server.await }
}

/// The server is not responsible for binding to an address, it only listens to
/// an already bound address.
///
/// Declares all API endpoints.
pub fn run(
    listener: TcpListener,
    forwarder: SubscriberForwarder,
    forms: FormSettings,
) -> Result<Server, anyhow::Error> {
    // `Data` is an `Arc` internally, so every worker shares the same forwarder
    // (and its connection pool)
    let forwarder = web::Data::new(forwarder);
    let forms = web::Data::new(forms);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/connector", web::get().to(connector_info))
            .route("/submissions", web::post().to(receive_submission))
            .app_data(forwarder.clone())
            .app_data(forms.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
