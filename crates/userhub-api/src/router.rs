//! Route table and middleware stack

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers::{groups, health, users};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        // Collections answer with and without the trailing slash.
        .route("/users/", post(users::create_user).get(users::list_users))
        .route("/users", post(users::create_user).get(users::list_users))
        .route("/users/{user_id}", get(users::get_user))
        .route("/users/{user_id}/groups/{group_id}", post(users::add_user_to_group))
        .route("/groups/", post(groups::create_group).get(groups::list_groups))
        .route("/groups", post(groups::create_group).get(groups::list_groups))
        .route("/groups/{group_id}", get(groups::get_group))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::default().include_headers(true)),
                )
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .layer(CorsLayer::permissive())
}
