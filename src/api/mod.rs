// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::{
    http::{header, Method},
    middleware,
    routing::{delete, get, patch, post, MethodRouter},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{
        permissions::{
            DELETE_ACTORS, DELETE_MOVIES, GET_ACTORS, GET_MOVIES, PATCH_ACTORS, PATCH_MOVIES,
            POST_ACTORS, POST_MOVIES,
        },
        require_permission, Permission, RequirePermission, TokenVerifier,
    },
    error::ApiError,
    models::{ActorRequest, ActorsResponse, DeletedResponse, MovieRequest, MoviesResponse},
    state::AppState,
    storage::{Actor, CatalogDatabase, Movie, StorageResult},
};

pub mod actors;
pub mod health;
pub mod movies;

pub fn router(state: AppState) -> Router {
    let verifier = Arc::clone(&state.verifier);
    let guarded = |route: MethodRouter<AppState>, permission: Permission| {
        protect(route, &verifier, permission)
    };

    let catalog_routes = Router::new()
        .route(
            "/movies",
            guarded(get(movies::list_movies), GET_MOVIES)
                .merge(guarded(post(movies::create_movie), POST_MOVIES)),
        )
        .route(
            "/movies/{movie_id}",
            guarded(patch(movies::update_movie), PATCH_MOVIES)
                .merge(guarded(delete(movies::delete_movie), DELETE_MOVIES)),
        )
        .route(
            "/actors",
            guarded(get(actors::list_actors), GET_ACTORS)
                .merge(guarded(post(actors::create_actor), POST_ACTORS)),
        )
        .route(
            "/actors/{actor_id}",
            guarded(patch(actors::update_actor), PATCH_ACTORS)
                .merge(guarded(delete(actors::delete_actor), DELETE_ACTORS)),
        );

    // Health routes (no authentication)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    // Outermost first
    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        );

    Router::new()
        .merge(catalog_routes)
        .merge(health_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(layers)
}

/// Put `route` behind authentication and the given permission.
fn protect(
    route: MethodRouter<AppState>,
    verifier: &Arc<TokenVerifier>,
    permission: Permission,
) -> MethodRouter<AppState> {
    let guard = RequirePermission::new(Arc::clone(verifier), permission);
    route.route_layer(middleware::from_fn_with_state(guard, require_permission))
}

/// Run a catalog operation on the blocking thread pool.
pub(crate) async fn with_catalog<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&CatalogDatabase) -> StorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    let db = Arc::clone(&state.db);
    let result = tokio::task::spawn_blocking(move || op(&db))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Catalog task failed");
            ApiError::internal()
        })?;
    Ok(result?)
}

/// Registers the `bearer_auth` scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        movies::list_movies,
        movies::create_movie,
        movies::update_movie,
        movies::delete_movie,
        actors::list_actors,
        actors::create_actor,
        actors::update_actor,
        actors::delete_actor,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Movie,
            Actor,
            MovieRequest,
            ActorRequest,
            MoviesResponse,
            ActorsResponse,
            DeletedResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Movies", description = "Movie catalog"),
        (name = "Actors", description = "Actor catalog"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
