// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User presence routes: location updates, nearby search, profiles.

use super::ApiResponse;
use crate::error::{AppError, Result};
use crate::models::{ContactRequest, Coordinates, NearbyUser, UserLocation, UserProfile};
use crate::services::presence::DEFAULT_NEARBY_RADIUS_KM;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users/location", post(update_location))
        .route("/api/users/nearby", get(nearby_users))
        .route("/api/users/contact-request", post(contact_request))
        .route("/api/users/{id}", get(get_profile))
        .route("/api/users/{id}/contact-requests", get(list_contact_requests))
}

#[derive(Serialize)]
pub struct LocationUpdated {
    pub user_id: i64,
    pub last_seen: String,
}

/// Record the caller's current location.
async fn update_location(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UserLocation>,
) -> Result<Json<ApiResponse<LocationUpdated>>> {
    body.validate()?;
    let record = state.users.upsert_location(body);

    Ok(ApiResponse::with_message(
        LocationUpdated {
            user_id: record.user_id,
            last_seen: crate::time_utils::format_utc_rfc3339(record.last_seen),
        },
        "Location updated",
    ))
}

#[derive(Debug, Deserialize)]
struct NearbyQuery {
    lat: Option<f64>,
    lng: Option<f64>,
    radius: Option<f64>,
}

/// Users seen in the last two hours within `radius` km.
async fn nearby_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<Vec<NearbyUser>>>> {
    let (Some(lat), Some(lng)) = (params.lat, params.lng) else {
        return Err(AppError::BadRequest(
            "lat and lng parameters are required".to_string(),
        ));
    };
    let radius = params.radius.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
    if !radius.is_finite() || radius < 0.0 {
        return Err(AppError::BadRequest(
            "radius must be a non-negative number".to_string(),
        ));
    }

    let users = state.users.nearby(Coordinates::new(lat, lng), radius);
    tracing::debug!(lat, lng, radius, count = users.len(), "Nearby users");
    Ok(ApiResponse::ok(users))
}

/// Public profile of a user.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<UserProfile>>> {
    let profile = state
        .users
        .profile(user_id)
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
    Ok(ApiResponse::ok(profile))
}

/// Ask another user to get in touch. Only recorded.
async fn contact_request(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ContactRequest>,
) -> Result<Json<ApiResponse<ContactRequest>>> {
    body.validate()?;
    if body.from_user_id == body.to_user_id {
        return Err(AppError::BadRequest(
            "Cannot send a contact request to yourself".to_string(),
        ));
    }

    let request = state.users.record_contact_request(body);
    Ok(ApiResponse::with_message(request, "Contact request sent"))
}

/// Contact requests addressed to a user.
async fn list_contact_requests(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Json<ApiResponse<Vec<ContactRequest>>> {
    ApiResponse::ok(state.users.contact_requests_for(user_id))
}
