use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::{init_logging_default, init_logging_json};
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use tower_http::cors::CorsLayer;
use tracing::info;

use service::ai::{AiService, GeminiClient};

use crate::auth::{ServerAuthConfig, ServerState};
use crate::routes;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: load config, connect, migrate, serve.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    // LOG_FORMAT=json switches to structured output for container setups.
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => init_logging_json(),
        _ => init_logging_default(),
    }

    let cfg = configs::AppConfig::load_and_validate()?;

    let db = models::db::connect().await?;
    Migrator::up(&db, None).await?;

    let generator = GeminiClient::new(cfg.ai.api_key.clone())
        .with_model(cfg.ai.model.clone())
        .with_base_url(cfg.ai.base_url.clone());
    let state = ServerState {
        db,
        auth: ServerAuthConfig {
            jwt_secret: cfg.auth.jwt_secret.clone(),
            token_ttl_minutes: cfg.auth.token_ttl_minutes,
        },
        ai: Arc::new(AiService::new(Arc::new(generator))),
    };

    let app: Router = routes::build_router(build_cors(), state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, model = %cfg.ai.model, "starting meal planner server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
