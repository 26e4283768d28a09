use axum::{
    http::{header, Method, StatusCode},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        blog::{create_blog_post, delete_blog_post, list_blog_posts, toggle_like},
        comments::{add_comment, list_comments},
        health::livez,
        products::{get_product, get_product_by_name, list_products, search_products},
        reviews::{create_review, list_reviews, list_reviews_by_author},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let timeout = state.config.request_timeout();

    Router::new()
        // Products
        .route("/products", get(list_products))
        .route("/products/search", get(search_products))
        .route("/product/{name}", get(get_product_by_name))
        .route("/product/{collection}/{name}", get(get_product))
        // Reviews
        .route("/product/{collection}/{name}/review", post(create_review))
        .route("/product/{collection}/{name}/reviews", get(list_reviews))
        .route("/reviews/username", get(list_reviews_by_author))
        // Blog
        .route("/blog", get(list_blog_posts))
        .route("/blog/admin/new", post(create_blog_post))
        .route("/blog/admin/delete", delete(delete_blog_post))
        .route("/blog/{theme}/{createdAt}/like", post(toggle_like))
        .route("/blog/{theme}/{createdAt}/comment", post(add_comment))
        .route("/blog/{theme}/{createdAt}/comments", get(list_comments))
        .route("/livez", get(livez))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .with_state(state)
}
