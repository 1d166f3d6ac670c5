//! Router construction and middleware stack.

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::config::MAX_BODY_BYTES;
use crate::handlers::{auth, bookmarks, categories, system, users};
use crate::AppState;

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Every endpoint, relative to its mount point.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Bookmarks
        .route(
            "/bookmarks",
            post(bookmarks::create_bookmark).get(bookmarks::list_bookmarks),
        )
        .route("/bookmarks/all", get(bookmarks::list_my_bookmarks))
        .route(
            "/bookmarks/category/:category",
            get(bookmarks::list_my_bookmarks_in_category),
        )
        .route("/bookmarks/batch", post(bookmarks::create_bookmarks_batch))
        .route("/bookmarks/search", get(bookmarks::search_bookmarks))
        .route(
            "/bookmarks/categories",
            post(bookmarks::add_category).delete(bookmarks::remove_category),
        )
        .route(
            "/bookmarks/:id",
            get(bookmarks::get_bookmark)
                .put(bookmarks::update_bookmark)
                .delete(bookmarks::delete_bookmark),
        )
        // Categories
        .route("/categories", get(categories::list_categories))
        // Users
        .route("/users", get(users::list_users))
        .route("/users/:id/role", put(users::update_user_role))
}

fn cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600))
}

/// The complete application: routes at the root and under `/api`, with
/// tracing, request ids, CORS, and the body size limit applied.
pub fn build_app(state: AppState, allowed_origins: Vec<HeaderValue>) -> Router {
    Router::new()
        .merge(api_routes())
        .nest("/api", api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(allowed_origins))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
