use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::auth as auth_mw;
use crate::auth::ServerState;
use crate::openapi::ApiDoc;

pub mod admin;
pub mod ai;
pub mod auth;
pub mod plans;
pub mod recipes;
pub mod shopping;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public auth endpoints, the
/// authenticated API, and the admin surface.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let api = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/profile", put(auth::update_profile))
        .route("/recipes", get(recipes::list).post(recipes::create))
        .route("/recipes/rated", get(recipes::list_rated))
        .route(
            "/recipes/:id",
            get(recipes::get_one).put(recipes::update).delete(recipes::delete),
        )
        .route(
            "/recipes/:id/ratings",
            get(recipes::list_ratings).post(recipes::rate),
        )
        .route(
            "/recipes/:id/ratings/my",
            get(recipes::my_rating).delete(recipes::delete_my_rating),
        )
        .route("/plans", get(plans::list).post(plans::create))
        .route("/plans/:id", put(plans::update).delete(plans::delete))
        .route("/shopping/list", get(shopping::list))
        .route("/ai/generate-recipe", post(ai::generate_recipe))
        .route("/ai/suggest-weekly-plan", post(ai::suggest_weekly_plan))
        .route("/ai/search-recipes", post(ai::search_recipes))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_mw::require_auth,
        ));

    let admin_routes = Router::new()
        .route("/admin/stats", get(admin::stats))
        .route("/admin/users", get(admin::list_users))
        .route(
            "/admin/users/:id",
            get(admin::get_user).put(admin::update_user).delete(admin::delete_user),
        )
        .route("/admin/recipes", get(admin::list_recipes))
        .route("/admin/recipes/:id", axum::routing::delete(admin::delete_recipe))
        .route("/admin/meal-plans", get(admin::list_meal_plans))
        .route("/admin/meal-plans/:id", axum::routing::delete(admin::delete_meal_plan))
        .route("/admin/ratings", get(admin::list_ratings))
        .route("/admin/ratings/:id", axum::routing::delete(admin::delete_rating))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_mw::require_admin,
        ));

    let swagger = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    public
        .merge(api)
        .merge(admin_routes)
        .merge(swagger)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
