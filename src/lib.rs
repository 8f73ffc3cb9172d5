// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! na-sporte: find sport events, training partners and group workouts nearby
//!
//! This crate provides the backend API for the na-sporte map web app:
//! a catalog of public events, self-reported user locations, and ad-hoc
//! training sessions that other users can join.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::JsonStore;
use services::{EventCatalog, PresenceStore, TrainingStore};
use std::sync::Arc;
use time_utils::Clock;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub clock: Arc<dyn Clock>,
    pub events: EventCatalog,
    pub users: PresenceStore,
    pub trainings: TrainingStore,
}

impl AppState {
    /// Build the stores described by `config`.
    ///
    /// Trainings are loaded from `config.data_dir` when it is set.
    pub async fn build(config: Config, clock: Arc<dyn Clock>) -> Self {
        let trainings = match &config.data_dir {
            Some(dir) => {
                tracing::info!(dir = %dir.display(), "Training persistence enabled");
                TrainingStore::open(clock.clone(), JsonStore::new(dir))
            }
            None => {
                tracing::info!("Training persistence disabled, data lives in memory only");
                TrainingStore::in_memory(clock.clone())
            }
        };
        if config.seed_premium {
            trainings.seed_premium().await;
        }

        Self {
            events: EventCatalog::seeded(),
            users: PresenceStore::new(clock.clone()),
            trainings,
            clock,
            config,
        }
    }
}
