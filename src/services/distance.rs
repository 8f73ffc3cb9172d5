// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flat-plane distance approximation.
//!
//! Treats degrees as a Cartesian plane and scales by the length of one degree
//! at the equator. Good enough for "what's within a few kilometers of me" in
//! a single city; it is not a geodesic distance and it overestimates
//! east-west distances away from the equator.

use crate::models::Coordinates;
use geo::{Distance, Euclidean, Point};

/// Approximate kilometers per degree.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Approximate distance in kilometers between two points.
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let a = Point::new(a.lng, a.lat);
    let b = Point::new(b.lng, b.lat);
    Euclidean.distance(a, b) * KM_PER_DEGREE
}

/// Round to 2 decimal places for API output.
pub fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}
