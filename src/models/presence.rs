// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! User presence models: self-reported locations and contact requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use super::{placeholder_name, Coordinates};

/// Body of `POST /api/users/location`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserLocation {
    pub user_id: i64,
    pub username: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    pub comment: Option<String>,
    pub sports: Option<Vec<String>>,
    /// Defaults to visible
    pub is_visible: Option<bool>,
}

/// Last known location of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPresence {
    pub user_id: i64,
    pub username: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub comment: Option<String>,
    pub sports: Vec<String>,
    pub last_seen: DateTime<Utc>,
    pub is_visible: bool,
}

impl UserPresence {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    pub fn display_name(&self) -> String {
        self.username
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| placeholder_name(self.user_id))
    }
}

/// A user returned by the nearby query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NearbyUser {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub comment: Option<String>,
    pub sports: Vec<String>,
    /// Kilometers, rounded to 2 decimals
    pub distance: f64,
}

/// Public profile of a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: i64,
    pub username: Option<String>,
    pub comment: Option<String>,
    pub sports: Vec<String>,
}

impl From<&UserPresence> for UserProfile {
    fn from(presence: &UserPresence) -> Self {
        Self {
            id: presence.user_id,
            username: presence.username.clone(),
            comment: presence.comment.clone(),
            sports: presence.sports.clone(),
        }
    }
}

/// A request from one user to get in touch with another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ContactRequest {
    pub from_user_id: i64,
    pub to_user_id: i64,
    #[validate(length(max = 500))]
    pub message: Option<String>,
    /// Stamped by the server
    #[serde(skip_deserializing)]
    pub created_at: DateTime<Utc>,
}
