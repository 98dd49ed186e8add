use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use tabdeel_api::auth::{self, AppState, AppStateInner};
use tabdeel_api::middleware::require_auth;
use tabdeel_api::notify::Notifier;
use tabdeel_api::{conversations, items, recommendations, swaps, users};
use tabdeel_recommend::{GeminiRecommender, Recommender, StaticRecommender};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tabdeel=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("TABDEEL_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("TABDEEL_DB_PATH").unwrap_or_else(|_| "tabdeel.db".into());
    let host = std::env::var("TABDEEL_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("TABDEEL_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let gemini_model =
        std::env::var("TABDEEL_GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".into());

    // Init database
    let db = tabdeel_db::Database::open(&PathBuf::from(&db_path))?;

    // Recommendation oracle: live model when a key is configured, otherwise
    // the canned stub so the rest of the service keeps working.
    let recommender: Arc<dyn Recommender> = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => {
            info!("Recommendations served by {}", gemini_model);
            Arc::new(GeminiRecommender::new(key, gemini_model))
        }
        _ => {
            warn!("GEMINI_API_KEY not set; recommendations will be empty");
            Arc::new(StaticRecommender::default())
        }
    };

    // Shared state
    let notifier = Notifier::new();
    let app_state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret,
        notifier,
        recommender,
    });

    // Routes
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(app_state.clone());

    let protected_routes = Router::new()
        .route("/users/me", get(users::get_me))
        .route("/users/me", patch(users::update_me))
        .route("/users/me/items", get(items::my_items))
        .route("/items", get(items::list_items))
        .route("/items", post(items::create_item))
        .route("/items/suggest", post(recommendations::suggest_listing))
        .route("/items/{item_id}", get(items::get_item))
        .route("/items/{item_id}", patch(items::update_item))
        .route("/items/{item_id}", delete(items::remove_item))
        .route("/items/{item_id}/exchange", post(items::exchange_item))
        .route("/swaps", post(swaps::create_swap))
        .route("/swaps", get(swaps::list_swaps))
        .route("/swaps/pending", get(swaps::pending_swaps))
        .route("/swaps/{request_id}/respond", post(swaps::respond_swap))
        .route(
            "/recommendations",
            get(recommendations::get_recommendations),
        )
        .route("/conversations", get(conversations::list_conversations))
        .route(
            "/conversations/{conversation_id}/messages",
            get(conversations::get_messages),
        )
        .route(
            "/conversations/{conversation_id}/messages",
            post(conversations::send_message),
        )
        .layer(middleware::from_fn(require_auth))
        .with_state(app_state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Tabdeel server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
