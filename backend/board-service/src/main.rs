use actix_web::{App, HttpServer};
use anyhow::{anyhow, Context};
use board_service::config::{Config, LogFormat};
use board_service::db::build_store;
use board_service::middleware::CredentialStore;
use board_service::services::PostService;
use board_service::views::BoardView;
use board_service::{configure, AppServices};
use crypto_core::TrackingTokenManager;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Board Service
///
/// # Routes
///
/// - `GET /health` - Liveness probe (public)
/// - `GET|POST /posts` - List posts / create a post
/// - `POST /posts/delete` - Delete a post (author or admin)
/// - `/logout` - Drop Basic credentials
///
/// `board-service hash-password <password>` prints an Argon2 hash for the
/// credentials file and exits.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    {
        let mut args = std::env::args().skip(1);
        if let Some(cmd) = args.next() {
            if cmd == "hash-password" {
                let password = args
                    .next()
                    .context("usage: board-service hash-password <password>")?;
                println!("{}", actix_middleware::hash_password(&password)?);
                return Ok(());
            }
            return Err(anyhow!("unknown command '{}'", cmd));
        }
    }

    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.logging.format);

    tracing::info!("Starting board-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    if config.tracking.generated {
        tracing::warn!(
            "TRACKING_SECRET not set; using a random key, tracking cookies reset on restart"
        );
    }
    let tokens = TrackingTokenManager::new(config.tracking.secret.expose())
        .context("failed to initialize tracking token manager")?;

    let credentials = CredentialStore::from_file(&config.auth.credentials_file)
        .with_context(|| format!("failed to load {}", config.auth.credentials_file))?;
    if credentials.is_empty() {
        tracing::warn!(file = %config.auth.credentials_file, "credentials file has no users");
    }
    tracing::info!(users = credentials.len(), "Loaded credentials");

    let store = build_store(&config.store).await?;
    tracing::info!(kind = ?config.store.kind, "Post store ready");

    let view = BoardView::new().context("failed to load templates")?;

    let services = AppServices::new(PostService::new(store), tokens, view, credentials);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(configure(services.clone()))
    })
    .bind(&bind_address)?
    .workers(config.app.workers)
    .run()
    .await?;

    tracing::info!("Board-service shutting down");
    Ok(())
}
