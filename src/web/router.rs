//! Router configuration for the REST API.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::error::set_error_timezone;
use super::handlers::{
    check_email, check_like, check_nickname, create_comment, create_post, delete_comment,
    delete_post, get_post, like_post, list_comments, list_my_posts, list_paged_posts, list_posts,
    login, logout, me, refresh, signup, transfer_post, unlike_post, update_comment, update_post,
    AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, with_security_headers, JwtState};

/// Create the main API router, mounted under `/api/v1`.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
    timezone: &str,
) -> Router {
    set_error_timezone(timezone);

    let auth_routes = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh", post(refresh))
        .route("/check-email", get(check_email))
        .route("/check-nickname", get(check_nickname))
        .route("/me", get(me));

    let post_routes = Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/paged", get(list_paged_posts))
        .route("/me", get(list_my_posts))
        .route("/:id", get(get_post).put(update_post).delete(delete_post))
        .route("/:id/owner", put(transfer_post))
        .route("/:id/likes", post(like_post))
        .route(
            "/:id/likes/:account_id",
            get(check_like).delete(unlike_post),
        )
        .route("/:id/comments", get(list_comments).post(create_comment));

    let comment_routes =
        Router::new().route("/:id", put(update_comment).delete(delete_comment));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/posts", post_routes)
        .nest("/comments", comment_routes)
        .merge(create_health_router());

    let jwt_state_for_middleware = jwt_state.clone();

    let router = Router::new()
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state);

    with_security_headers(router)
}

/// Create a health check router.
pub fn create_health_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    "OK"
}
