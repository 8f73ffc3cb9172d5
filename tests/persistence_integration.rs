// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trainings survive a restart when a data directory is configured.

use axum::http::StatusCode;
use na_sporte::config::Config;
use na_sporte::db::files;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{create_test_app_with, get, json_body, post_json};

#[tokio::test]
async fn test_trainings_persist_across_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        data_dir: Some(dir.path().to_path_buf()),
        ..Config::test_default()
    };

    let (app, _, _) = create_test_app_with(config.clone()).await;
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/trainings",
            json!({
                "user_id": 7,
                "title": "Велозаезд",
                "sport": "велоспорт",
                "lat": 55.731,
                "lng": 37.603,
                "start_time": "2024-09-15T18:00"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = json_body(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    app.oneshot(post_json(
        &format!("/api/trainings/{id}/join"),
        json!({ "user_id": 42 }),
    ))
    .await
    .unwrap();

    // Both documents exist and are keyed by training id.
    let trainings: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join(files::TRAININGS)).unwrap(),
    )
    .unwrap();
    assert_eq!(trainings[&id]["title"], "Велозаезд");
    let participants: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join(files::PARTICIPANTS)).unwrap(),
    )
    .unwrap();
    assert_eq!(participants[&id].as_array().unwrap().len(), 2);

    // "Restart": a fresh app over the same directory.
    let (app, state, _) = create_test_app_with(config).await;
    assert!(state.trainings.get(&id).await.is_some());

    let response = app
        .oneshot(get(&format!("/api/trainings/{id}/participants")))
        .await
        .unwrap();
    let json = json_body(response).await;
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["user_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![7, 42]);
}
