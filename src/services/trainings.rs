// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training session store.
//!
//! A session is created with its owner as the first participant, stays
//! joinable while active, and is purged by the expiry sweep once it is more
//! than [`RETENTION_DAYS`] past its end (or start) time. Premium sessions are
//! seeded at startup and never expire. They ignore the distance filter and are
//! never written to disk.
//!
//! All state sits behind one async mutex. When a [`JsonStore`] is configured
//! the snapshot is flushed while the lock is still held, so the in-memory maps
//! and the files on disk change in the same order.

use crate::db::{JsonStore, TrainingSnapshot};
use crate::error::{AppError, Result};
use crate::models::{
    placeholder_name, Coordinates, JoinOutcome, JoinTraining, NewTraining, Participant,
    TrainingSession, TrainingSummary,
};
use crate::services::distance::{distance_km, round_km};
use crate::time_utils::{parse_client_timestamp, Clock, SystemClock};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;
use validator::Validate;

/// Sessions are purged this long after their end (or start) time.
pub const RETENTION_DAYS: i64 = 1;

/// Retention measured from creation when the session times don't parse.
pub const FALLBACK_RETENTION_DAYS: i64 = 2;

/// Default search radius for trainings, in kilometers.
pub const DEFAULT_TRAINING_RADIUS_KM: f64 = 5.0;

/// Filters accepted by [`TrainingStore::list`].
#[derive(Debug, Clone)]
pub struct TrainingFilter {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: f64,
    pub sport: Option<String>,
}

impl Default for TrainingFilter {
    fn default() -> Self {
        Self {
            lat: None,
            lng: None,
            radius: DEFAULT_TRAINING_RADIUS_KM,
            sport: None,
        }
    }
}

impl TrainingFilter {
    fn center(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.lat?, self.lng?))
    }
}

#[derive(Default)]
struct TrainingState {
    sessions: HashMap<String, TrainingSession>,
    participants: HashMap<String, Vec<Participant>>,
    /// Join requests awaiting owner approval. Not persisted.
    pending: HashMap<String, Vec<Participant>>,
}

impl TrainingState {
    /// Persistable state. Premium sessions and their rosters are left out;
    /// they exist only while seeding is enabled.
    fn snapshot(&self) -> TrainingSnapshot {
        let sessions: HashMap<String, TrainingSession> = self
            .sessions
            .iter()
            .filter(|(_, s)| !s.is_premium)
            .map(|(id, s)| (id.clone(), s.clone()))
            .collect();
        let participants = self
            .participants
            .iter()
            .filter(|(id, _)| sessions.contains_key(id.as_str()))
            .map(|(id, roster)| (id.clone(), roster.clone()))
            .collect();

        TrainingSnapshot {
            sessions,
            participants,
        }
    }

    fn remove(&mut self, id: &str) {
        self.sessions.remove(id);
        self.participants.remove(id);
        self.pending.remove(id);
    }

    fn participants_count(&self, id: &str) -> usize {
        self.participants.get(id).map_or(0, Vec::len)
    }

    /// Remove expired sessions, returning how many were dropped.
    fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let expired: Vec<String> = self
            .sessions
            .values()
            .filter(|s| is_expired(s, now))
            .map(|s| s.id.clone())
            .collect();

        for id in &expired {
            tracing::info!(training_id = %id, "Training expired");
            self.remove(id);
        }
        expired.len()
    }
}

/// Whether the sweep should purge `session` at `now`.
pub fn is_expired(session: &TrainingSession, now: DateTime<Utc>) -> bool {
    if session.is_premium {
        return false;
    }

    match parse_client_timestamp(session.expiry_reference()) {
        Some(reference) => now.signed_duration_since(reference) > Duration::days(RETENTION_DAYS),
        None => {
            tracing::debug!(
                training_id = %session.id,
                reference = session.expiry_reference(),
                "Unparseable training time, falling back to creation time"
            );
            now.signed_duration_since(session.created_at)
                > Duration::days(FALLBACK_RETENTION_DAYS)
        }
    }
}

/// Store of training sessions and their rosters.
pub struct TrainingStore {
    state: Mutex<TrainingState>,
    persistence: Option<JsonStore>,
    clock: Arc<dyn Clock>,
}

impl Default for TrainingStore {
    fn default() -> Self {
        Self::in_memory(Arc::new(SystemClock))
    }
}

impl TrainingStore {
    /// Store without a backing file.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(TrainingState::default()),
            persistence: None,
            clock,
        }
    }

    /// Store backed by JSON snapshots, loading whatever is already on disk.
    ///
    /// An unreadable snapshot is logged and the store starts empty; the next
    /// flush overwrites it.
    pub fn open(clock: Arc<dyn Clock>, persistence: JsonStore) -> Self {
        let mut snapshot = persistence.load().unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load training snapshot, starting empty");
            TrainingSnapshot::default()
        });
        // Snapshots written before premium sessions were excluded may hold them.
        snapshot.sessions.retain(|_, s| !s.is_premium);
        let sessions = &snapshot.sessions;
        snapshot.participants.retain(|id, _| sessions.contains_key(id));

        Self {
            state: Mutex::new(TrainingState {
                sessions: snapshot.sessions,
                participants: snapshot.participants,
                pending: HashMap::new(),
            }),
            persistence: Some(persistence),
            clock,
        }
    }

    /// Write the current state to disk. Failures are logged, not returned.
    async fn flush(&self, state: &TrainingState) {
        let Some(persistence) = self.persistence.clone() else {
            return;
        };
        let snapshot = state.snapshot();

        match tokio::task::spawn_blocking(move || persistence.save(&snapshot)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "Failed to persist trainings"),
            Err(e) => tracing::error!(error = %e, "Persist task failed"),
        }
    }

    /// Create a session with its owner as the first participant.
    pub async fn create(&self, body: NewTraining) -> Result<TrainingSession> {
        body.validate()?;

        let missing = |field: &str| AppError::Validation(format!("missing field: {field}"));
        let user_id = body.user_id.ok_or_else(|| missing("user_id"))?;
        let title = body.title.ok_or_else(|| missing("title"))?;
        let sport = body.sport.ok_or_else(|| missing("sport"))?;
        let lat = body.lat.ok_or_else(|| missing("lat"))?;
        let lng = body.lng.ok_or_else(|| missing("lng"))?;
        let start_time = body.start_time.ok_or_else(|| missing("start_time"))?;

        let now = self.clock.now();
        let username = body
            .username
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| placeholder_name(user_id));

        let session = TrainingSession {
            id: Uuid::new_v4().to_string(),
            user_id,
            title,
            description: body.description.unwrap_or_default(),
            sport,
            lat,
            lng,
            start_time,
            end_time: body.end_time.filter(|end| !end.trim().is_empty()),
            comment: body.comment.unwrap_or_default(),
            auto_accept: body.auto_accept.unwrap_or(true),
            created_at: now,
            username: username.clone(),
            photo_url: body.photo_url.clone(),
            is_premium: false,
        };
        let owner = Participant {
            user_id,
            username,
            photo_url: body.photo_url,
            joined_at: now,
        };

        let mut state = self.state.lock().await;
        state.sessions.insert(session.id.clone(), session.clone());
        state.participants.insert(session.id.clone(), vec![owner]);
        self.flush(&state).await;

        tracing::info!(
            training_id = %session.id,
            owner = user_id,
            sport = %session.sport,
            auto_accept = session.auto_accept,
            "Training created"
        );
        Ok(session)
    }

    /// Join a session, or ask to join one that needs approval.
    ///
    /// Joining twice is a no-op, and so is asking twice.
    pub async fn join(&self, session_id: &str, body: JoinTraining) -> Result<JoinOutcome> {
        body.validate()?;
        let user_id = body
            .user_id
            .ok_or_else(|| AppError::Validation("missing field: user_id".to_string()))?;

        let mut state = self.state.lock().await;
        let auto_accept = state
            .sessions
            .get(session_id)
            .map(|s| s.auto_accept)
            .ok_or_else(|| AppError::NotFound(format!("Training {session_id} not found")))?;

        let already_joined = state
            .participants
            .get(session_id)
            .is_some_and(|roster| roster.iter().any(|p| p.user_id == user_id));
        if already_joined {
            return Ok(JoinOutcome::AlreadyJoined);
        }

        let participant = Participant {
            user_id,
            username: body
                .username
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| placeholder_name(user_id)),
            photo_url: body.photo_url,
            joined_at: self.clock.now(),
        };

        if auto_accept {
            state
                .participants
                .entry(session_id.to_string())
                .or_default()
                .push(participant);
            self.flush(&state).await;
            tracing::info!(training_id = %session_id, user_id, "Joined training");
            Ok(JoinOutcome::Joined)
        } else {
            let pending = state.pending.entry(session_id.to_string()).or_default();
            if !pending.iter().any(|p| p.user_id == user_id) {
                pending.push(participant);
                tracing::info!(training_id = %session_id, user_id, "Join request recorded");
            }
            Ok(JoinOutcome::RequestSent)
        }
    }

    /// Pending join requests for a session, oldest first.
    pub async fn pending_requests(&self, session_id: &str) -> Result<Vec<Participant>> {
        let state = self.state.lock().await;
        if !state.sessions.contains_key(session_id) {
            return Err(AppError::NotFound(format!("Training {session_id} not found")));
        }
        Ok(state.pending.get(session_id).cloned().unwrap_or_default())
    }

    /// Owner approves a pending request, moving the user onto the roster.
    pub async fn accept_request(
        &self,
        session_id: &str,
        owner_id: i64,
        user_id: i64,
    ) -> Result<Participant> {
        let mut state = self.state.lock().await;
        let session = state
            .sessions
            .get(session_id)
            .ok_or_else(|| AppError::NotFound(format!("Training {session_id} not found")))?;
        if session.user_id != owner_id {
            return Err(AppError::Forbidden(
                "Only the organizer can accept requests".to_string(),
            ));
        }

        let pending = state.pending.entry(session_id.to_string()).or_default();
        let idx = pending
            .iter()
            .position(|p| p.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("No pending request from user {user_id}")))?;
        let mut participant = pending.remove(idx);
        participant.joined_at = self.clock.now();

        let roster = state.participants.entry(session_id.to_string()).or_default();
        if !roster.iter().any(|p| p.user_id == user_id) {
            roster.push(participant.clone());
        }
        self.flush(&state).await;

        tracing::info!(training_id = %session_id, user_id, "Join request accepted");
        Ok(participant)
    }

    /// Sessions matching the filter. Runs the expiry sweep first.
    ///
    /// Premium sessions come first, then the rest by ascending distance.
    pub async fn list(&self, filter: &TrainingFilter) -> Vec<TrainingSummary> {
        let mut state = self.state.lock().await;
        if state.sweep(self.clock.now()) > 0 {
            self.flush(&state).await;
        }

        let sport = filter.sport.as_deref().filter(|s| !s.is_empty());
        let center = filter.center();

        let mut summaries: Vec<TrainingSummary> = state
            .sessions
            .values()
            .filter(|s| sport.is_none_or(|sport| s.sport == sport))
            .filter_map(|s| {
                let distance = if s.is_premium {
                    0.0
                } else {
                    let d = distance_km(center?, s.coordinates());
                    if d > filter.radius {
                        return None;
                    }
                    round_km(d)
                };
                Some(TrainingSummary {
                    session: s.clone(),
                    participants_count: state.participants_count(&s.id),
                    distance,
                })
            })
            .collect();

        summaries.sort_by(|a, b| {
            b.session
                .is_premium
                .cmp(&a.session.is_premium)
                .then_with(|| a.distance.total_cmp(&b.distance))
                .then_with(|| a.session.created_at.cmp(&b.session.created_at))
        });
        summaries
    }

    /// Roster of a session in join order; empty for unknown sessions.
    pub async fn participants(&self, session_id: &str) -> Vec<Participant> {
        self.state
            .lock()
            .await
            .participants
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn get(&self, session_id: &str) -> Option<TrainingSession> {
        self.state.lock().await.sessions.get(session_id).cloned()
    }

    /// Purge expired sessions. Returns the number removed.
    pub async fn sweep(&self) -> usize {
        let mut state = self.state.lock().await;
        let removed = state.sweep(self.clock.now());
        if removed > 0 {
            self.flush(&state).await;
        }
        removed
    }

    /// Promotional sessions, in seed order.
    pub async fn premium(&self) -> Vec<TrainingSummary> {
        let state = self.state.lock().await;
        let mut premium: Vec<TrainingSummary> = state
            .sessions
            .values()
            .filter(|s| s.is_premium)
            .map(|s| TrainingSummary {
                session: s.clone(),
                participants_count: state.participants_count(&s.id),
                distance: 0.0,
            })
            .collect();
        premium.sort_by(|a, b| a.session.id.cmp(&b.session.id));
        premium
    }

    /// Insert (or refresh) the built-in premium sessions. Rosters are kept.
    pub async fn seed_premium(&self) {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        for session in premium_sessions(now) {
            state.participants.entry(session.id.clone()).or_default();
            state.sessions.insert(session.id.clone(), session);
        }
        tracing::info!(
            count = state.sessions.values().filter(|s| s.is_premium).count(),
            "Premium trainings seeded"
        );
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.sessions.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn premium_session(
    id: &str,
    title: &str,
    description: &str,
    sport: &str,
    (lat, lng): (f64, f64),
    start_time: &str,
    organizer: &str,
    now: DateTime<Utc>,
) -> TrainingSession {
    TrainingSession {
        id: id.to_string(),
        user_id: 0,
        title: title.to_string(),
        description: description.to_string(),
        sport: sport.to_string(),
        lat,
        lng,
        start_time: start_time.to_string(),
        end_time: None,
        comment: String::new(),
        auto_accept: true,
        created_at: now,
        username: organizer.to_string(),
        photo_url: None,
        is_premium: true,
    }
}

/// The built-in promotional sessions.
pub fn premium_sessions(now: DateTime<Utc>) -> Vec<TrainingSession> {
    vec![
        premium_session(
            "premium-1",
            "Беговой клуб: интервалы с тренером",
            "Еженедельная интервальная тренировка с мастером спорта. Все уровни.",
            "бег",
            (55.715, 37.554),
            "каждую субботу 09:00",
            "Беговой клуб «На спорте»",
            now,
        ),
        premium_session(
            "premium-2",
            "Йога на рассвете",
            "Практика для начинающих и продолжающих. Коврики выдаём.",
            "йога",
            (55.794, 37.676),
            "каждое воскресенье 08:00",
            "Студия «Асана»",
            now,
        ),
    ]
}
