use criterion::{black_box, criterion_group, criterion_main, Criterion};
use na_sporte::models::{Coordinates, UserLocation};
use na_sporte::services::PresenceStore;

const USERS: i64 = 10_000;

fn benchmark_nearby(c: &mut Criterion) {
    let store = PresenceStore::default();

    // Spread users over roughly 50 x 50 km around central Moscow.
    for i in 0..USERS {
        let lat = 55.5 + (i % 100) as f64 * 0.0045;
        let lng = 37.3 + (i / 100) as f64 * 0.0045;
        store.upsert_location(UserLocation {
            user_id: i,
            username: None,
            lat,
            lng,
            comment: None,
            sports: Some(vec!["бег".to_string()]),
            is_visible: None,
        });
    }

    let center = Coordinates::new(55.731, 37.603);
    let mut group = c.benchmark_group("nearby_users");

    group.bench_function("radius_10km", |b| {
        b.iter(|| store.nearby(black_box(center), black_box(10.0)))
    });

    group.bench_function("radius_1km", |b| {
        b.iter(|| store.nearby(black_box(center), black_box(1.0)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_nearby);
criterion_main!(benches);
