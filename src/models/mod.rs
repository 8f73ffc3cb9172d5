// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod event;
pub mod presence;
pub mod training;

pub use event::Event;
pub use presence::{ContactRequest, NearbyUser, UserLocation, UserPresence, UserProfile};
pub use training::{
    AcceptRequest, JoinOutcome, JoinTraining, NewTraining, Participant, TrainingSession,
    TrainingSummary,
};

/// A (lat, lng) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Display name used when a user never told us theirs.
pub fn placeholder_name(user_id: i64) -> String {
    format!("User_{user_id}")
}
