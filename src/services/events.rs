// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only catalog of public sport events.

use crate::models::{Coordinates, Event};
use crate::services::distance::distance_km;
use chrono::NaiveDate;

/// Filters accepted by [`EventCatalog::list`].
#[derive(Debug, Default, Clone)]
pub struct EventFilter {
    pub sport: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
}

impl EventFilter {
    /// Proximity filtering needs a center and a positive radius.
    fn proximity(&self) -> Option<(Coordinates, f64)> {
        match (self.lat, self.lng, self.radius) {
            (Some(lat), Some(lng), Some(radius)) if radius > 0.0 => {
                Some((Coordinates::new(lat, lng), radius))
            }
            _ => None,
        }
    }
}

/// Service holding the event catalog.
#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    events: Vec<Event>,
}

impl EventCatalog {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Catalog seeded with the built-in Moscow events.
    pub fn seeded() -> Self {
        Self::new(seed_events())
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// List events matching the filter, in catalog order.
    pub fn list(&self, filter: &EventFilter) -> Vec<Event> {
        let sport = filter.sport.as_deref().filter(|s| !s.is_empty());
        let proximity = filter.proximity();

        self.events
            .iter()
            .filter(|e| sport.is_none_or(|sport| e.sport == sport))
            .filter(|e| {
                proximity.is_none_or(|(center, radius)| {
                    distance_km(center, e.coordinates()) <= radius
                })
            })
            .cloned()
            .collect()
    }
}

fn event(
    id: u32,
    title: &str,
    description: &str,
    sport: &str,
    (year, month, day): (i32, u32, u32),
    location: &str,
    (lat, lng): (f64, f64),
) -> Option<Event> {
    Some(Event {
        id,
        title: title.to_string(),
        description: description.to_string(),
        sport: sport.to_string(),
        date: NaiveDate::from_ymd_opt(year, month, day)?,
        location: location.to_string(),
        lat,
        lng,
    })
}

/// The built-in event list.
pub fn seed_events() -> Vec<Event> {
    [
        event(
            1,
            "Московский марафон 2024",
            "Ежегодный осенний марафон через центр Москвы. Дистанции: 10км, 21.1км, 42.2км",
            "бег",
            (2024, 9, 15),
            "Москва, Воробьевы горы",
            (55.710, 37.553),
        ),
        event(
            2,
            "Ночной велопробег",
            "Ночная велопрогулка по освещенным улицам города. Безопасность обеспечивается организаторами",
            "велоспорт",
            (2024, 10, 20),
            "Москва, Парк Горького",
            (55.731, 37.603),
        ),
        event(
            3,
            "Открытие лыжного сезона в Крылатском",
            "Групповая лыжная прогулка с инструкторами. Прокат оборудования доступен на месте",
            "лыжи",
            (2024, 12, 10),
            "Москва, Крылатское",
            (55.756, 37.438),
        ),
        event(
            4,
            "Утренняя йога в Сокольниках",
            "Бесплатное занятие йогой на свежем воздухе. Приносите свои коврики!",
            "йога",
            (2024, 8, 25),
            "Москва, Сокольники",
            (55.795, 37.679),
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}
