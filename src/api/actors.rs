// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};

use crate::{
    api::with_catalog,
    auth::DecodedClaims,
    error::ApiError,
    models::{ActorRequest, ActorsResponse, DeletedResponse},
    state::AppState,
    storage::ActorRepository,
};

/// List all actors.
#[utoipa::path(
    get,
    path = "/actors",
    tag = "Actors",
    security(("bearer_auth" = ["get:actors"])),
    responses(
        (status = 200, description = "All actors", body = ActorsResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing get:actors")
    )
)]
pub async fn list_actors(State(state): State<AppState>) -> Result<Json<ActorsResponse>, ApiError> {
    let actors = with_catalog(&state, |db| ActorRepository::new(db).list()).await?;
    Ok(Json(ActorsResponse::new(actors)))
}

/// Add an actor cast in an existing movie.
#[utoipa::path(
    post,
    path = "/actors",
    request_body = ActorRequest,
    tag = "Actors",
    security(("bearer_auth" = ["post:actors"])),
    responses(
        (status = 200, description = "Created actor", body = ActorsResponse),
        (status = 400, description = "Missing or blank field"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing post:actors"),
        (status = 422, description = "Unknown movie or could not be stored")
    )
)]
pub async fn create_actor(
    State(state): State<AppState>,
    Extension(claims): Extension<DecodedClaims>,
    payload: Result<Json<ActorRequest>, JsonRejection>,
) -> Result<Json<ActorsResponse>, ApiError> {
    let Json(request) = payload?;
    let actor = request.validate()?;

    let created = with_catalog(&state, move |db| ActorRepository::new(db).create(&actor)).await?;
    tracing::info!(actor_id = created.id, subject = %claims.subject, "Actor added");

    Ok(Json(ActorsResponse::new(vec![created])))
}

/// Replace an actor's fields.
#[utoipa::path(
    patch,
    path = "/actors/{actor_id}",
    params(
        ("actor_id" = u64, Path, description = "Identifier of the actor to update")
    ),
    request_body = ActorRequest,
    tag = "Actors",
    security(("bearer_auth" = ["patch:actors"])),
    responses(
        (status = 200, description = "Updated actor", body = ActorsResponse),
        (status = 400, description = "Missing or blank field"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing patch:actors"),
        (status = 404, description = "Actor not found"),
        (status = 422, description = "Unknown movie or could not be stored")
    )
)]
pub async fn update_actor(
    path: Result<Path<u64>, PathRejection>,
    State(state): State<AppState>,
    Extension(claims): Extension<DecodedClaims>,
    payload: Result<Json<ActorRequest>, JsonRejection>,
) -> Result<Json<ActorsResponse>, ApiError> {
    let Path(actor_id) = path.map_err(|_| ApiError::not_found())?;
    let exists = with_catalog(&state, move |db| ActorRepository::new(db).exists(actor_id)).await?;
    if !exists {
        return Err(ApiError::not_found());
    }

    let Json(request) = payload?;
    let actor = request.validate()?;

    let updated =
        with_catalog(&state, move |db| ActorRepository::new(db).update(actor_id, &actor)).await?;
    tracing::info!(actor_id, subject = %claims.subject, "Actor updated");

    Ok(Json(ActorsResponse::new(vec![updated])))
}

#[utoipa::path(
    delete,
    path = "/actors/{actor_id}",
    params(
        ("actor_id" = u64, Path, description = "Identifier of the actor to delete")
    ),
    tag = "Actors",
    security(("bearer_auth" = ["delete:actors"])),
    responses(
        (status = 200, description = "Deleted actor id", body = DeletedResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing delete:actors"),
        (status = 404, description = "Actor not found")
    )
)]
pub async fn delete_actor(
    path: Result<Path<u64>, PathRejection>,
    State(state): State<AppState>,
    Extension(claims): Extension<DecodedClaims>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let Path(actor_id) = path.map_err(|_| ApiError::not_found())?;
    with_catalog(&state, move |db| ActorRepository::new(db).delete(actor_id)).await?;
    tracing::info!(actor_id, subject = %claims.subject, "Actor deleted");

    Ok(Json(DeletedResponse::new(actor_id)))
}
