// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Training session model: ad-hoc, location-anchored group workouts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use super::Coordinates;

/// Body of `POST /api/trainings`.
///
/// Required fields are optional here so that a missing field is reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewTraining {
    #[validate(required)]
    pub user_id: Option<i64>,
    #[validate(required, length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(required, length(min = 1, max = 64))]
    pub sport: Option<String>,
    #[validate(required, range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(required, range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,
    #[validate(required, length(min = 1))]
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
    pub auto_accept: Option<bool>,
    /// Owner display name
    pub username: Option<String>,
    pub photo_url: Option<String>,
}

/// A training session as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrainingSession {
    pub id: String,
    /// Owner
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub sport: String,
    pub lat: f64,
    pub lng: f64,
    /// As supplied by the client; parsed leniently.
    pub start_time: String,
    pub end_time: Option<String>,
    pub comment: String,
    pub auto_accept: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub photo_url: Option<String>,
    /// Promotional sessions: never expire, ignore the distance filter.
    #[serde(default)]
    pub is_premium: bool,
}

impl TrainingSession {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// The timestamp that expiry is measured from: end time if set, else start.
    pub fn expiry_reference(&self) -> &str {
        self.end_time
            .as_deref()
            .filter(|end| !end.trim().is_empty())
            .unwrap_or(&self.start_time)
    }
}

/// A session in a listing, annotated with derived fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TrainingSummary {
    #[serde(flatten)]
    pub session: TrainingSession,
    pub participants_count: usize,
    /// Kilometers from the query center, rounded to 2 decimals (0 for premium).
    pub distance: f64,
}

/// A member of a session roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Participant {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub user_id: i64,
    pub username: String,
    pub photo_url: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub joined_at: DateTime<Utc>,
}

/// Body of `POST /api/trainings/{id}/join`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct JoinTraining {
    #[validate(required)]
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub photo_url: Option<String>,
}

/// Body of `POST /api/trainings/{id}/requests/{user_id}/accept`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AcceptRequest {
    #[validate(required)]
    pub owner_id: Option<i64>,
}

/// Result of a join attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinOutcome {
    /// Added to the roster.
    Joined,
    /// Already on the roster; nothing changed.
    AlreadyJoined,
    /// Session needs owner approval; the request is pending.
    RequestSent,
}

impl JoinOutcome {
    pub fn message(self) -> &'static str {
        match self {
            JoinOutcome::Joined => "Joined training",
            JoinOutcome::AlreadyJoined => "Already joined",
            JoinOutcome::RequestSent => "Request sent to the organizer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> NewTraining {
        NewTraining {
            user_id: Some(1),
            title: Some("Пробежка".to_string()),
            sport: Some("бег".to_string()),
            lat: Some(55.7),
            lng: Some(37.6),
            start_time: Some("2024-09-15T10:00".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_training_valid() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_new_training_missing_sport() {
        let mut body = valid();
        body.sport = None;
        let errors = body.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sport"));
    }

    #[test]
    fn test_new_training_empty_title() {
        let mut body = valid();
        body.title = Some(String::new());
        let errors = body.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_new_training_latitude_out_of_range() {
        let mut body = valid();
        body.lat = Some(123.0);
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_expiry_reference_prefers_end_time() {
        let json = serde_json::json!({
            "id": "x", "user_id": 1, "title": "t", "description": "", "sport": "бег",
            "lat": 0.0, "lng": 0.0, "start_time": "2024-01-01T10:00",
            "end_time": "2024-01-01T12:00", "comment": "", "auto_accept": true,
            "created_at": "2024-01-01T09:00:00Z", "username": "u", "photo_url": null
        });
        let mut session: TrainingSession = serde_json::from_value(json).unwrap();
        assert!(!session.is_premium);
        assert_eq!(session.expiry_reference(), "2024-01-01T12:00");

        session.end_time = Some(String::new());
        assert_eq!(session.expiry_reference(), "2024-01-01T10:00");
    }
}
