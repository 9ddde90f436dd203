/// Board Service Library
///
/// A minimal message board: authenticated users post and delete short
/// messages, and every request carries a tamper-evident tracking token.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Post and its display form
/// - `services`: Business logic (creation, authorized deletion)
/// - `db`: Post store trait with in-memory and PostgreSQL backends
/// - `middleware`: Authentication gate re-exports and ownership rule
/// - `views`: HTML rendering of the list page
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod views;

pub use config::Config;
pub use error::{AppError, Result};

use actix_web::web;
use crypto_core::TrackingTokenManager;
use middleware::{BasicAuthMiddleware, CredentialStore};
use services::PostService;
use std::sync::Arc;
use views::BoardView;

/// Shared state handed to every worker
#[derive(Clone)]
pub struct AppServices {
    pub posts: web::Data<PostService>,
    pub tokens: web::Data<TrackingTokenManager>,
    pub view: web::Data<BoardView>,
    pub credentials: Arc<CredentialStore>,
}

impl AppServices {
    pub fn new(
        posts: PostService,
        tokens: TrackingTokenManager,
        view: BoardView,
        credentials: CredentialStore,
    ) -> Self {
        Self {
            posts: web::Data::new(posts),
            tokens: web::Data::new(tokens),
            view: web::Data::new(view),
            credentials: Arc::new(credentials),
        }
    }
}

/// Register routes and state
///
/// `/health` is public. Everything else sits behind the Basic-auth gate;
/// unknown paths answer 404 after authentication.
pub fn configure(services: AppServices) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(services.posts.clone())
            .app_data(services.tokens.clone())
            .app_data(services.view.clone())
            .route("/health", web::get().to(handlers::health_check))
            .service(
                web::scope("")
                    .wrap(BasicAuthMiddleware::new(services.credentials.clone()))
                    .route("/logout", web::to(handlers::handle_logout))
                    .route(handlers::POSTS_PATH, web::to(handlers::handle_list))
                    .route(handlers::DELETE_PATH, web::to(handlers::handle_delete))
                    .default_service(web::to(handlers::handle_not_found)),
            );
    }
}
