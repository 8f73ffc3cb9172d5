// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod distance;
pub mod events;
pub mod presence;
pub mod promo;
pub mod trainings;

pub use events::{EventCatalog, EventFilter};
pub use presence::PresenceStore;
pub use trainings::{TrainingFilter, TrainingStore};
