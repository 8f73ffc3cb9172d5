// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training session routes.

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::models::{
    AcceptRequest, JoinOutcome, JoinTraining, NewTraining, Participant, TrainingSession,
    TrainingSummary,
};
use crate::services::trainings::DEFAULT_TRAINING_RADIUS_KM;
use crate::services::TrainingFilter;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/trainings", get(list_trainings).post(create_training))
        .route("/api/trainings/{id}/join", post(join_training))
        .route("/api/trainings/{id}/participants", get(list_participants))
        .route("/api/trainings/{id}/requests", get(list_requests))
        .route(
            "/api/trainings/{id}/requests/{user_id}/accept",
            post(accept_request),
        )
}

#[derive(Debug, Deserialize)]
struct TrainingsQuery {
    lat: Option<f64>,
    lng: Option<f64>,
    radius: Option<f64>,
    sport: Option<String>,
}

/// Active trainings near a point. Premium trainings are always included.
async fn list_trainings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrainingsQuery>,
) -> Result<Json<ApiResponse<Vec<TrainingSummary>>>> {
    let radius = params.radius.unwrap_or(DEFAULT_TRAINING_RADIUS_KM);
    if !radius.is_finite() || radius < 0.0 {
        return Err(AppError::BadRequest(
            "radius must be a non-negative number".to_string(),
        ));
    }

    let filter = TrainingFilter {
        lat: params.lat,
        lng: params.lng,
        radius,
        sport: params.sport,
    };
    tracing::debug!(?filter, "Fetching trainings");

    let trainings = state.trainings.list(&filter).await;
    tracing::debug!(count = trainings.len(), "Returning trainings");
    Ok(ApiResponse::ok(trainings))
}

/// Create a training; the organizer becomes its first participant.
async fn create_training(
    State(state): State<Arc<AppState>>,
    Json(mut body): Json<NewTraining>,
) -> Result<(StatusCode, Json<ApiResponse<TrainingSession>>)> {
    if body.username.is_none() {
        if let Some(user_id) = body.user_id {
            body.username = state.users.get(user_id).and_then(|u| u.username);
        }
    }

    let session = state.trainings.create(body).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(session, "Training created"),
    ))
}

#[derive(Serialize)]
pub struct JoinResponse {
    pub outcome: JoinOutcome,
    pub participants: Vec<Participant>,
}

/// Join a training (or request to, when the organizer approves joins).
async fn join_training(
    State(state): State<Arc<AppState>>,
    Path(training_id): Path<String>,
    Json(mut body): Json<JoinTraining>,
) -> Result<Json<ApiResponse<JoinResponse>>> {
    if body.username.is_none() {
        if let Some(user_id) = body.user_id {
            body.username = Some(state.users.display_name(user_id));
        }
    }

    let outcome = state.trainings.join(&training_id, body).await?;
    let participants = state.trainings.participants(&training_id).await;

    Ok(ApiResponse::with_message(
        JoinResponse {
            outcome,
            participants,
        },
        outcome.message(),
    ))
}

/// Roster of a training, in join order.
async fn list_participants(
    State(state): State<Arc<AppState>>,
    Path(training_id): Path<String>,
) -> Json<ApiResponse<Vec<Participant>>> {
    ApiResponse::ok(state.trainings.participants(&training_id).await)
}

/// Join requests waiting for the organizer.
async fn list_requests(
    State(state): State<Arc<AppState>>,
    Path(training_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Participant>>>> {
    let pending = state.trainings.pending_requests(&training_id).await?;
    Ok(ApiResponse::ok(pending))
}

/// Organizer accepts a pending join request.
async fn accept_request(
    State(state): State<Arc<AppState>>,
    Path((training_id, user_id)): Path<(String, i64)>,
    Json(body): Json<AcceptRequest>,
) -> Result<Json<ApiResponse<Participant>>> {
    body.validate()?;
    let owner_id = body.owner_id.unwrap_or_default();

    let participant = state
        .trainings
        .accept_request(&training_id, owner_id, user_id)
        .await?;
    Ok(ApiResponse::with_message(participant, "Request accepted"))
}
