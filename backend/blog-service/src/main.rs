use actix_web::{web, App, HttpServer};
use anyhow::Context;
use blog_service::{routes, Config, MIGRATOR};
use db_pool::{create_pool, run_migrations};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info,actix_web=info,sqlx=warn";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Blog Service
///
/// Serves `/api/v1/user/*`, `/api/v1/blog/*` and `/api/v1/health`.
/// Configuration is read from the environment (see `Config::from_env`);
/// migrations run at startup unless `RUN_MIGRATIONS=false`.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real deployments set variables directly
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        env = %config.app.env,
        origins = ?config.cors.allowed_origins,
        token_ttl_hours = ?config.auth.token_ttl_hours,
        "Configuration loaded"
    );

    let jwt = config
        .auth
        .jwt_service()
        .context("Failed to initialize token service")?;

    config.database.log_config();
    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;

    if config.app.run_migrations {
        run_migrations(&pool, &MIGRATOR)
            .await
            .context("Failed to run database migrations")?;
    } else {
        tracing::info!("Skipping migrations (RUN_MIGRATIONS=false)");
    }

    let pool_data = web::Data::new(pool);
    let jwt_data = web::Data::new(jwt);
    let allowed_origins = config.cors.allowed_origins.clone();

    let bind_address = config.bind_address();
    tracing::info!("Starting HTTP server at {}", bind_address);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(pool_data.clone())
            .app_data(jwt_data.clone())
            .wrap(routes::cors(&allowed_origins))
            .wrap(TracingLogger::default())
            .configure(routes::configure)
    });
    if let Some(workers) = config.app.workers {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("HTTP server error")?;

    tracing::info!("blog-service shut down");
    Ok(())
}
