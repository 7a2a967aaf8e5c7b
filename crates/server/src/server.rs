use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};

use std::sync::Arc;

use crate::{
    captcha::{CaptchaConfig, CaptchaVerifier},
    import, journeys, log_book, statistics, users,
};
use engine::Engine;

/// Largest accepted import body.
const IMPORT_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// HTTP-level settings.
#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    /// Registration challenge; disabled when `None`.
    pub captcha: Option<CaptchaConfig>,
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub(crate) captcha: Option<Arc<CaptchaVerifier>>,
}

pub fn router(engine: Arc<Engine>, config: ServerConfig) -> Router {
    let state = ServerState {
        engine,
        captcha: config.captcha.map(|c| Arc::new(CaptchaVerifier::new(c))),
    };

    Router::new()
        .route("/api/logBook", post(log_book::log_new))
        .route("/api/journeys", post(journeys::journey_new))
        .route(
            "/api/journeys/{id}",
            get(journeys::get)
                .put(journeys::update)
                .delete(journeys::delete),
        )
        .route("/api/getJourney/{id}", get(journeys::get))
        .route("/api/getJourneys", get(journeys::list))
        .route("/api/getTotalJourneys/{username}", get(journeys::total))
        .route(
            "/api/importJourneys",
            post(import::import).layer(DefaultBodyLimit::max(IMPORT_BODY_LIMIT)),
        )
        .route("/api/users", post(users::register))
        .route("/api/login", post(users::login))
        .route("/api/getUsers/{username}", get(users::get))
        .route("/api/saveUsers/{username}", put(users::save))
        .route("/api/summary/{username}", get(statistics::summary))
        .route("/api/costs/{username}", get(statistics::costs))
        .route("/api/stats/{username}", get(statistics::stats))
        .route("/api/budget/{username}", get(statistics::budget))
        .route("/api/graph/{username}", get(statistics::graph))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine), config)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, config, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
