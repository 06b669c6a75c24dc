//! Aleator server entry point: config, pool, adapters, router, serve.

use std::sync::Arc;
use std::time::Duration;

use http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use aleator::adapters::auth::{BcryptPasswordHasher, JwtTokenService};
use aleator::adapters::http::auth::AuthHandlers;
use aleator::adapters::http::decision::DecisionHandlers;
use aleator::adapters::http::stats::{StatsCache, StatsState, STATS_CACHE_TTL};
use aleator::adapters::http::user::UserHandlers;
use aleator::adapters::http::{api_router, middleware::AuthState};
use aleator::adapters::postgres::{
    PostgresDecisionRepository, PostgresRollRepository, PostgresStatsReader,
    PostgresUserRepository,
};
use aleator::adapters::rng::OsRandomSource;
use aleator::application::handlers::auth::{
    ConvertGuestHandler, CreateGuestHandler, LoginUserHandler, RegisterUserHandler,
};
use aleator::application::handlers::decision::{
    CreateDecisionHandler, DeleteDecisionHandler, GetDecisionHandler, ListDecisionsHandler,
    ReorderDecisionsHandler, UpdateDecisionHandler,
};
use aleator::application::handlers::export::ExportUserDataHandler;
use aleator::application::handlers::roll::{
    ConfirmRollHandler, GetPendingRollHandler, RollDecisionHandler,
};
use aleator::config::AppConfig;
use aleator::ports::{PasswordHasher, TokenIssuer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .init();

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    // Ports
    let decisions = Arc::new(PostgresDecisionRepository::new(pool.clone()));
    let rolls = Arc::new(PostgresRollRepository::new(pool.clone()));
    let users = Arc::new(PostgresUserRepository::new(pool.clone()));
    let stats_reader = Arc::new(PostgresStatsReader::new(pool));
    let rng = Arc::new(OsRandomSource::new());

    let token_service = Arc::new(JwtTokenService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl(),
    ));
    let issuer: Arc<dyn TokenIssuer> = token_service.clone();
    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher::new());
    let validator: AuthState = token_service;

    // Application handlers
    let decision_handlers = DecisionHandlers::new(
        Arc::new(CreateDecisionHandler::new(
            decisions.clone(),
            config.limits.max_decisions_per_user,
        )),
        Arc::new(ListDecisionsHandler::new(decisions.clone(), rolls.clone())),
        Arc::new(GetDecisionHandler::new(decisions.clone(), rolls.clone())),
        Arc::new(UpdateDecisionHandler::new(decisions.clone())),
        Arc::new(DeleteDecisionHandler::new(decisions.clone())),
        Arc::new(ReorderDecisionsHandler::new(decisions.clone())),
        Arc::new(RollDecisionHandler::new(
            decisions.clone(),
            rolls.clone(),
            rng,
            config.limits.max_rolls_per_user,
        )),
        Arc::new(ConfirmRollHandler::new(decisions.clone(), rolls.clone())),
        Arc::new(GetPendingRollHandler::new(decisions.clone(), rolls.clone())),
    );

    let auth_handlers = AuthHandlers::new(
        Arc::new(RegisterUserHandler::new(users.clone(), hasher.clone())),
        Arc::new(LoginUserHandler::new(
            users.clone(),
            hasher.clone(),
            issuer.clone(),
        )),
        Arc::new(CreateGuestHandler::new(users.clone(), issuer.clone())),
        Arc::new(ConvertGuestHandler::new(users.clone(), hasher, issuer)),
        users.clone(),
    );

    let user_handlers = UserHandlers::new(Arc::new(ExportUserDataHandler::new(
        users, decisions, rolls,
    )));

    let stats_state = StatsState::new(stats_reader, Arc::new(StatsCache::new(STATS_CACHE_TTL)));

    // Router
    let cors = cors_layer(&config)?;
    let app = api_router(
        decision_handlers,
        auth_handlers,
        user_handlers,
        stats_state,
        validator,
    )
    .layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(cors),
    );

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("aleator listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(config: &AppConfig) -> Result<CorsLayer, Box<dyn std::error::Error>> {
    let origins = config.server.cors_origins_list();
    if origins.is_empty() {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let parsed: Result<Vec<HeaderValue>, _> = origins.iter().map(|o| o.parse()).collect();
    Ok(CorsLayer::new()
        .allow_origin(parsed?)
        .allow_methods(Any)
        .allow_headers(Any))
}
