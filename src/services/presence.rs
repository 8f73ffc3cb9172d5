// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User presence store: last self-reported location per user.

use crate::models::{
    placeholder_name, ContactRequest, Coordinates, NearbyUser, UserLocation, UserPresence,
    UserProfile,
};
use crate::services::distance::{distance_km, round_km};
use crate::time_utils::{Clock, SystemClock};
use chrono::Duration;
use dashmap::DashMap;
use std::sync::Arc;

/// Presence records older than this are hidden from nearby queries.
pub const FRESHNESS_WINDOW_HOURS: i64 = 2;

/// Default search radius for nearby users, in kilometers.
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 10.0;

/// Contact requests kept per recipient; older ones are dropped first.
pub const MAX_CONTACT_REQUESTS_PER_USER: usize = 100;

/// Concurrent store of user locations and contact requests.
///
/// Each upsert swaps the whole record, so readers never see a partial write.
pub struct PresenceStore {
    users: DashMap<i64, UserPresence>,
    contact_requests: DashMap<i64, Vec<ContactRequest>>,
    clock: Arc<dyn Clock>,
}

impl Default for PresenceStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl PresenceStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: DashMap::new(),
            contact_requests: DashMap::new(),
            clock,
        }
    }

    /// Replace the user's presence record with a fresh one.
    pub fn upsert_location(&self, location: UserLocation) -> UserPresence {
        let record = UserPresence {
            user_id: location.user_id,
            username: location.username,
            lat: location.lat,
            lng: location.lng,
            comment: location.comment,
            sports: location.sports.unwrap_or_default(),
            last_seen: self.clock.now(),
            is_visible: location.is_visible.unwrap_or(true),
        };

        tracing::debug!(
            user_id = record.user_id,
            visible = record.is_visible,
            "Presence updated"
        );
        self.users.insert(record.user_id, record.clone());
        record
    }

    /// Visible, fresh users within `radius` km of `center`.
    ///
    /// Result order is unspecified.
    pub fn nearby(&self, center: Coordinates, radius: f64) -> Vec<NearbyUser> {
        let now = self.clock.now();
        let freshness = Duration::hours(FRESHNESS_WINDOW_HOURS);

        self.users
            .iter()
            .filter(|entry| now.signed_duration_since(entry.last_seen) <= freshness)
            .filter(|entry| entry.is_visible)
            .filter_map(|entry| {
                let user = entry.value();
                let distance = distance_km(center, user.coordinates());
                (distance <= radius).then(|| NearbyUser {
                    id: user.user_id,
                    name: user.display_name(),
                    lat: user.lat,
                    lng: user.lng,
                    comment: user.comment.clone(),
                    sports: user.sports.clone(),
                    distance: round_km(distance),
                })
            })
            .collect()
    }

    /// Public profile, if the user ever reported a location.
    pub fn profile(&self, user_id: i64) -> Option<UserProfile> {
        self.users.get(&user_id).map(|user| UserProfile::from(user.value()))
    }

    pub fn get(&self, user_id: i64) -> Option<UserPresence> {
        self.users.get(&user_id).map(|user| user.value().clone())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Record a contact request in the recipient's inbox.
    ///
    /// Each inbox holds at most [`MAX_CONTACT_REQUESTS_PER_USER`] requests.
    pub fn record_contact_request(&self, mut request: ContactRequest) -> ContactRequest {
        request.created_at = self.clock.now();

        tracing::info!(
            from = request.from_user_id,
            to = request.to_user_id,
            recipient_known = self.users.contains_key(&request.to_user_id),
            "Contact request recorded"
        );

        let mut inbox = self.contact_requests.entry(request.to_user_id).or_default();
        inbox.push(request.clone());
        if inbox.len() > MAX_CONTACT_REQUESTS_PER_USER {
            let excess = inbox.len() - MAX_CONTACT_REQUESTS_PER_USER;
            inbox.drain(..excess);
        }
        request
    }

    /// Contact requests addressed to a user, oldest first.
    pub fn contact_requests_for(&self, user_id: i64) -> Vec<ContactRequest> {
        self.contact_requests
            .get(&user_id)
            .map(|requests| requests.value().clone())
            .unwrap_or_default()
    }

    /// Display name to use for a user id, falling back to the placeholder.
    pub fn display_name(&self, user_id: i64) -> String {
        self.users
            .get(&user_id)
            .map(|user| user.display_name())
            .unwrap_or_else(|| placeholder_name(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_utils::ManualClock;
    use chrono::{TimeZone, Utc};

    const CENTER: Coordinates = Coordinates::new(55.731, 37.603);

    fn store() -> (PresenceStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 9, 15, 12, 0, 0).unwrap(),
        ));
        (PresenceStore::new(clock.clone()), clock)
    }

    fn location(user_id: i64, lat: f64, lng: f64) -> UserLocation {
        UserLocation {
            user_id,
            username: None,
            lat,
            lng,
            comment: None,
            sports: None,
            is_visible: None,
        }
    }

    #[test]
    fn test_upsert_replaces_record() {
        let (store, _) = store();
        let mut first = location(7, 55.0, 37.0);
        first.comment = Some("first".to_string());
        first.sports = Some(vec!["бег".to_string()]);
        store.upsert_location(first);
        store.upsert_location(location(7, 55.731, 37.603));

        assert_eq!(store.len(), 1);
        let record = store.get(7).unwrap();
        assert_eq!(record.lat, 55.731);
        assert_eq!(record.lng, 37.603);
        // Full replacement, not a merge.
        assert_eq!(record.comment, None);
        assert!(record.sports.is_empty());
    }

    #[test]
    fn test_nearby_includes_close_users() {
        let (store, _) = store();
        store.upsert_location(location(1, 55.731, 37.603));
        store.upsert_location(location(2, 55.710, 37.553)); // ~6 km
        store.upsert_location(location(3, 55.756, 37.438)); // ~18.5 km

        let mut ids: Vec<i64> = store
            .nearby(CENTER, DEFAULT_NEARBY_RADIUS_KM)
            .iter()
            .map(|u| u.id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_nearby_output_fields() {
        let (store, _) = store();
        store.upsert_location(location(2, 55.710, 37.553));

        let users = store.nearby(CENTER, 10.0);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "User_2");
        assert_eq!(users[0].distance, 6.02);
    }

    #[test]
    fn test_stale_users_are_hidden() {
        let (store, clock) = store();
        store.upsert_location(location(1, 55.731, 37.603));

        clock.advance(Duration::hours(2));
        assert_eq!(store.nearby(CENTER, 10.0).len(), 1);

        clock.advance(Duration::seconds(1));
        assert!(store.nearby(CENTER, 10_000.0).is_empty());

        // Still stored, still has a profile.
        assert!(store.profile(1).is_some());
    }

    #[test]
    fn test_invisible_users_are_hidden() {
        let (store, _) = store();
        let mut hidden = location(1, 55.731, 37.603);
        hidden.is_visible = Some(false);
        store.upsert_location(hidden);
        assert!(store.nearby(CENTER, 10.0).is_empty());
    }

    #[test]
    fn test_profile() {
        let (store, _) = store();
        assert!(store.profile(42).is_none());

        let mut loc = location(42, 55.7, 37.6);
        loc.username = Some("runner".to_string());
        loc.sports = Some(vec!["бег".to_string(), "йога".to_string()]);
        store.upsert_location(loc);

        let profile = store.profile(42).unwrap();
        assert_eq!(profile.id, 42);
        assert_eq!(profile.username.as_deref(), Some("runner"));
        assert_eq!(profile.sports, vec!["бег", "йога"]);
    }

    #[test]
    fn test_contact_requests() {
        let (store, _) = store();
        store.record_contact_request(ContactRequest {
            from_user_id: 1,
            to_user_id: 2,
            message: Some("Побегаем?".to_string()),
            created_at: Default::default(),
        });

        let inbox = store.contact_requests_for(2);
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].from_user_id, 1);
        assert_eq!(
            inbox[0].created_at,
            Utc.with_ymd_and_hms(2024, 9, 15, 12, 0, 0).unwrap()
        );
        assert!(store.contact_requests_for(1).is_empty());
    }

    #[test]
    fn test_contact_inbox_is_capped() {
        let (store, clock) = store();
        for from in 0..(MAX_CONTACT_REQUESTS_PER_USER as i64 + 5) {
            store.record_contact_request(ContactRequest {
                from_user_id: from,
                to_user_id: 2,
                message: None,
                created_at: Default::default(),
            });
            clock.advance(Duration::seconds(1));
        }

        let inbox = store.contact_requests_for(2);
        assert_eq!(inbox.len(), MAX_CONTACT_REQUESTS_PER_USER);
        // Oldest five were dropped.
        assert_eq!(inbox[0].from_user_id, 5);
        assert_eq!(
            inbox.last().unwrap().from_user_id,
            MAX_CONTACT_REQUESTS_PER_USER as i64 + 4
        );
    }
}
