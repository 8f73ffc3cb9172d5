// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event catalog routes.

use super::ApiResponse;
use crate::models::Event;
use crate::services::EventFilter;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/events", get(list_events))
}

#[derive(Debug, Deserialize)]
struct EventsQuery {
    sport: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    /// Kilometers
    radius: Option<f64>,
}

/// List events, optionally filtered by sport and distance.
async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventsQuery>,
) -> Json<ApiResponse<Vec<Event>>> {
    tracing::debug!(
        sport = ?params.sport,
        lat = ?params.lat,
        lng = ?params.lng,
        radius = ?params.radius,
        "Fetching events"
    );

    let events = state.events.list(&EventFilter {
        sport: params.sport,
        lat: params.lat,
        lng: params.lng,
        radius: params.radius,
    });

    tracing::debug!(count = events.len(), "Returning events");
    ApiResponse::ok(events)
}
