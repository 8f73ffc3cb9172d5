// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Promoted partner venues, served as GeoJSON for the map layer.

use geojson::{Feature, FeatureCollection, Geometry, Value};

/// A partner venue highlighted on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotedLocation {
    pub name: &'static str,
    pub description: &'static str,
    pub sports: &'static [&'static str],
    pub lat: f64,
    pub lng: f64,
    pub url: Option<&'static str>,
}

/// Built-in list of partner venues.
pub const PROMOTED_LOCATIONS: &[PromotedLocation] = &[
    PromotedLocation {
        name: "Лужники",
        description: "Беговые дорожки и открытые площадки, прокат велосипедов",
        sports: &["бег", "велоспорт"],
        lat: 55.716,
        lng: 37.554,
        url: Some("https://www.luzhniki.ru"),
    },
    PromotedLocation {
        name: "Парк Горького",
        description: "Велодорожки вдоль набережной, утренняя йога по выходным",
        sports: &["велоспорт", "йога"],
        lat: 55.731,
        lng: 37.603,
        url: None,
    },
    PromotedLocation {
        name: "Крылатские холмы",
        description: "Лыжные трассы и летние трейлы",
        sports: &["лыжи", "бег"],
        lat: 55.756,
        lng: 37.438,
        url: None,
    },
];

impl PromotedLocation {
    fn to_feature(&self) -> Feature {
        let mut feature = Feature::from(Geometry::new(Value::Point(vec![self.lng, self.lat])));
        feature.set_property("name", self.name);
        feature.set_property("description", self.description);
        feature.set_property("sports", self.sports.to_vec());
        if let Some(url) = self.url {
            feature.set_property("url", url);
        }
        feature
    }
}

/// All promoted venues as a feature collection.
pub fn promoted_locations() -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: PROMOTED_LOCATIONS
            .iter()
            .map(PromotedLocation::to_feature)
            .collect(),
        foreign_members: None,
    }
}
