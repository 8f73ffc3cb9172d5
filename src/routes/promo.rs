// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Static promotional payloads.

use super::ApiResponse;
use crate::models::TrainingSummary;
use crate::services::promo::promoted_locations;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use geojson::FeatureCollection;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/promoted-locations", get(get_promoted_locations))
        .route("/api/premium-training", get(get_premium_trainings))
}

/// Partner venues as a GeoJSON FeatureCollection.
async fn get_promoted_locations() -> Json<FeatureCollection> {
    Json(promoted_locations())
}

async fn get_premium_trainings(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<TrainingSummary>>> {
    ApiResponse::ok(state.trainings.premium().await)
}
