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
    models::{DeletedResponse, MovieRequest, MoviesResponse},
    state::AppState,
    storage::MovieRepository,
};

/// List all movies.
#[utoipa::path(
    get,
    path = "/movies",
    tag = "Movies",
    security(("bearer_auth" = ["get:movies"])),
    responses(
        (status = 200, description = "All movies", body = MoviesResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing get:movies")
    )
)]
pub async fn list_movies(State(state): State<AppState>) -> Result<Json<MoviesResponse>, ApiError> {
    let movies = with_catalog(&state, |db| MovieRepository::new(db).list()).await?;
    Ok(Json(MoviesResponse::new(movies)))
}

/// Add a movie.
#[utoipa::path(
    post,
    path = "/movies",
    request_body = MovieRequest,
    tag = "Movies",
    security(("bearer_auth" = ["post:movies"])),
    responses(
        (status = 200, description = "Created movie", body = MoviesResponse),
        (status = 400, description = "Missing or blank field"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing post:movies"),
        (status = 422, description = "Could not be stored")
    )
)]
pub async fn create_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<DecodedClaims>,
    payload: Result<Json<MovieRequest>, JsonRejection>,
) -> Result<Json<MoviesResponse>, ApiError> {
    let Json(request) = payload?;
    let movie = request.validate()?;

    let created = with_catalog(&state, move |db| MovieRepository::new(db).create(&movie)).await?;
    tracing::info!(movie_id = created.id, subject = %claims.subject, "Movie added");

    Ok(Json(MoviesResponse::new(vec![created])))
}

/// Replace a movie's fields.
#[utoipa::path(
    patch,
    path = "/movies/{movie_id}",
    params(
        ("movie_id" = u64, Path, description = "Identifier of the movie to update")
    ),
    request_body = MovieRequest,
    tag = "Movies",
    security(("bearer_auth" = ["patch:movies"])),
    responses(
        (status = 200, description = "Updated movie", body = MoviesResponse),
        (status = 400, description = "Missing or blank field"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing patch:movies"),
        (status = 404, description = "Movie not found")
    )
)]
pub async fn update_movie(
    path: Result<Path<u64>, PathRejection>,
    State(state): State<AppState>,
    Extension(claims): Extension<DecodedClaims>,
    payload: Result<Json<MovieRequest>, JsonRejection>,
) -> Result<Json<MoviesResponse>, ApiError> {
    let Path(movie_id) = path.map_err(|_| ApiError::not_found())?;
    let exists = with_catalog(&state, move |db| MovieRepository::new(db).exists(movie_id)).await?;
    if !exists {
        return Err(ApiError::not_found());
    }

    let Json(request) = payload?;
    let movie = request.validate()?;

    let updated =
        with_catalog(&state, move |db| MovieRepository::new(db).update(movie_id, &movie)).await?;
    tracing::info!(movie_id, subject = %claims.subject, "Movie updated");

    Ok(Json(MoviesResponse::new(vec![updated])))
}

/// Delete a movie. Actors cast in it are kept but detached.
#[utoipa::path(
    delete,
    path = "/movies/{movie_id}",
    params(
        ("movie_id" = u64, Path, description = "Identifier of the movie to delete")
    ),
    tag = "Movies",
    security(("bearer_auth" = ["delete:movies"])),
    responses(
        (status = 200, description = "Deleted movie id", body = DeletedResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing delete:movies"),
        (status = 404, description = "Movie not found")
    )
)]
pub async fn delete_movie(
    path: Result<Path<u64>, PathRejection>,
    State(state): State<AppState>,
    Extension(claims): Extension<DecodedClaims>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let Path(movie_id) = path.map_err(|_| ApiError::not_found())?;
    with_catalog(&state, move |db| MovieRepository::new(db).delete(movie_id)).await?;
    tracing::info!(movie_id, subject = %claims.subject, "Movie deleted");

    Ok(Json(DeletedResponse::new(movie_id)))
}
