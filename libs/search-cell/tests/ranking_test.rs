// libs/search-cell/tests/ranking_test.rs

use assert_matches::assert_matches;
use serde_json::json;

use search_cell::models::{GeoPoint, RankableEntity, RankingQuery, SearchError, SortKey};
use search_cell::services::{distance_km, filter_available_on, nearby, rank, RankingService};
use shared_utils::test_utils::TestConfig;

// ==============================================================================
// TEST FIXTURES
// ==============================================================================

const DELHI: GeoPoint = GeoPoint { latitude: 28.6139, longitude: 77.2090 };
const MUMBAI: GeoPoint = GeoPoint { latitude: 19.0760, longitude: 72.8777 };
const BENGALURU: GeoPoint = GeoPoint { latitude: 12.9716, longitude: 77.5946 };
const CHENNAI: GeoPoint = GeoPoint { latitude: 13.0827, longitude: 80.2707 };

fn located(id: &str, point: GeoPoint) -> RankableEntity {
    RankableEntity {
        latitude: Some(point.latitude),
        longitude: Some(point.longitude),
        ..RankableEntity::new(id, id)
    }
}

fn ids(ranked: &[search_cell::models::RankedEntity]) -> Vec<&str> {
    ranked.iter().map(|r| r.entity.id.as_str()).collect()
}

fn with_fee(id: &str, fee: Option<f64>) -> RankableEntity {
    RankableEntity {
        consultation_fee: fee,
        ..RankableEntity::new(id, id)
    }
}

fn with_experience(id: &str, years: Option<f64>) -> RankableEntity {
    RankableEntity {
        experience_years: years,
        ..RankableEntity::new(id, id)
    }
}

// ==============================================================================
// DISTANCE
// ==============================================================================

#[test]
fn test_distance_is_zero_for_same_point() {
    for point in [DELHI, MUMBAI, GeoPoint::new(-33.8688, 151.2093)] {
        assert_eq!(distance_km(point, point), 0.0);
    }
}

#[test]
fn test_distance_is_symmetric() {
    let pairs = [(DELHI, MUMBAI), (BENGALURU, CHENNAI), (MUMBAI, CHENNAI)];

    for (a, b) in pairs {
        assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
    }
}

#[test]
fn test_delhi_to_mumbai() {
    let d = distance_km(DELHI, MUMBAI);

    assert!((1145.0..1165.0).contains(&d), "got {}", d);
}

// ==============================================================================
// DISTANCE RANKING
// ==============================================================================

#[test]
fn test_rank_by_distance_orders_nearest_first() {
    let entities = vec![
        located("delhi", DELHI),
        located("chennai", CHENNAI),
        located("mumbai", MUMBAI),
    ];

    let ranked = rank(&entities, &RankingQuery::by_distance_from(BENGALURU));

    assert_eq!(ids(&ranked), vec!["chennai", "mumbai", "delhi"]);
    assert!(ranked.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    assert_eq!(ranked[0].distance_label.as_deref(), Some("290.2"));
}

#[test]
fn test_unknown_distance_sorts_after_known_regardless_of_input_order() {
    let unknown = RankableEntity::new("unknown", "No Address Clinic");
    let known = located("known", MUMBAI);
    let query = RankingQuery::by_distance_from(DELHI);

    let forward = rank(&[known.clone(), unknown.clone()], &query);
    let backward = rank(&[unknown, known], &query);

    assert_eq!(ids(&forward), vec!["known", "unknown"]);
    assert_eq!(ids(&backward), vec!["known", "unknown"]);
    assert_eq!(backward[1].distance_km, None);
}

#[test]
fn test_unknown_distances_keep_input_order() {
    let half_located = RankableEntity {
        latitude: Some(10.0),
        ..RankableEntity::new("half", "Half")
    };
    let entities = vec![
        RankableEntity::new("a", "A"),
        located("near", DELHI),
        half_located,
        RankableEntity::new("b", "B"),
    ];

    let ranked = rank(&entities, &RankingQuery::by_distance_from(DELHI));

    assert_eq!(ids(&ranked), vec!["near", "a", "half", "b"]);
}

#[test]
fn test_distance_without_origin_keeps_input_order() {
    let entities = vec![located("mumbai", MUMBAI), located("delhi", DELHI)];

    let ranked = rank(&entities, &RankingQuery::by(SortKey::Distance));

    assert_eq!(ids(&ranked), vec!["mumbai", "delhi"]);
    assert!(ranked.iter().all(|r| r.distance_km.is_none()));
}

#[test]
fn test_distance_is_reported_for_other_sort_keys() {
    let entities = vec![located("mumbai", MUMBAI)];

    let ranked = rank(&entities, &RankingQuery::new(Some(DELHI), Some(SortKey::Name)));

    assert!(ranked[0].distance_km.is_some());
}

#[test]
fn test_antipode_ranks_last_and_stays_within_a_global_radius() {
    let origin = GeoPoint::new(-42.7635, -169.0595);
    let entities = vec![
        located("antipode", GeoPoint::new(42.7635, 10.9405)),
        located("near", GeoPoint::new(-42.7535, -169.0595)),
    ];

    let ranked = rank(&entities, &RankingQuery::by_distance_from(origin));

    assert_eq!(ids(&ranked), vec!["near", "antipode"]);
    let far = ranked[1].distance_km.unwrap();
    assert!((far - 20015.09).abs() < 1.0, "got {}", far);
    assert_eq!(ids(&nearby(&entities, origin, 21000.0, 20)), vec!["near", "antipode"]);
}

// ==============================================================================
// SCALAR KEYS
// ==============================================================================

#[test]
fn test_rank_by_fee_is_cheapest_first() {
    let entities = vec![
        with_fee("500", Some(500.0)),
        with_fee("200", Some(200.0)),
        with_fee("800", Some(800.0)),
    ];

    let ranked = rank(&entities, &RankingQuery::by(SortKey::Fee));

    assert_eq!(ids(&ranked), vec!["200", "500", "800"]);
}

#[test]
fn test_rank_by_experience_is_most_experienced_first() {
    let entities = vec![
        with_experience("5", Some(5.0)),
        with_experience("20", Some(20.0)),
        with_experience("10", Some(10.0)),
    ];

    let ranked = rank(&entities, &RankingQuery::by(SortKey::Experience));

    assert_eq!(ids(&ranked), vec!["20", "10", "5"]);
}

#[test]
fn test_missing_numeric_fields_count_as_zero() {
    let entities = vec![
        with_fee("missing", None),
        with_fee("cheap", Some(100.0)),
        with_fee("free", Some(0.0)),
    ];

    let ranked = rank(&entities, &RankingQuery::by(SortKey::Fee));

    // "missing" and "free" tie at zero and keep input order
    assert_eq!(ids(&ranked), vec!["missing", "free", "cheap"]);
}

#[test]
fn test_rank_by_rating_and_established_year_descend() {
    let rated = |id: &str, rating: f64, year: i32| RankableEntity {
        rating: Some(rating),
        established_year: Some(year),
        ..RankableEntity::new(id, id)
    };
    let entities = vec![rated("old", 4.9, 1950), rated("new", 3.5, 2015), rated("mid", 4.2, 1990)];

    let by_rating = rank(&entities, &RankingQuery::by(SortKey::Rating));
    let by_year = rank(&entities, &RankingQuery::by(SortKey::EstablishedYear));

    assert_eq!(ids(&by_rating), vec!["old", "mid", "new"]);
    assert_eq!(ids(&by_year), vec!["new", "mid", "old"]);
}

#[test]
fn test_rank_by_name_is_case_sensitive_and_stable() {
    let entities = vec![
        RankableEntity::new("second-apollo", "Apollo"),
        RankableEntity::new("lower", "apollo"),
        RankableEntity::new("fortis", "Fortis"),
        RankableEntity::new("first-apollo", "Apollo"),
    ];

    let ranked = rank(&entities, &RankingQuery::by(SortKey::Name));

    assert_eq!(ids(&ranked), vec!["second-apollo", "first-apollo", "fortis", "lower"]);
}

#[test]
fn test_no_sort_key_keeps_input_and_input_is_untouched() {
    let entities = vec![with_fee("b", Some(2.0)), with_fee("a", Some(1.0))];
    let snapshot = entities.clone();

    let unsorted = rank(&entities, &RankingQuery::default());
    let sorted = rank(&entities, &RankingQuery::by(SortKey::Fee));

    assert_eq!(ids(&unsorted), vec!["b", "a"]);
    assert_eq!(ids(&sorted), vec!["a", "b"]);
    assert_eq!(entities, snapshot);
}

#[test]
fn test_sort_selection_accepts_portal_values() {
    assert_eq!(SortKey::parse_selection(None), Ok(None));
    assert_eq!(SortKey::parse_selection(Some("")), Ok(None));
    assert_eq!(SortKey::parse_selection(Some("fees")), Ok(Some(SortKey::Fee)));
    assert_eq!(SortKey::parse_selection(Some("year")), Ok(Some(SortKey::EstablishedYear)));
    assert_matches!(
        SortKey::parse_selection(Some("popularity")),
        Err(SearchError::UnknownSortKey(_))
    );
}

// ==============================================================================
// DIRECTORY RECORDS
// ==============================================================================

#[test]
fn test_directory_record_coerces_numeric_strings() {
    let entity: RankableEntity = serde_json::from_value(json!({
        "_id": "64f0c2",
        "hospitalName": "City Hospital",
        "latitude": "19.0760",
        "longitude": 72.8777,
        "consultationFees": "450",
        "establishedYear": "1998",
        "rating": null
    }))
    .unwrap();

    assert_eq!(entity.id, "64f0c2");
    assert_eq!(entity.name, "City Hospital");
    assert_eq!(entity.location(), Some(MUMBAI));
    assert_eq!(entity.consultation_fee, Some(450.0));
    assert_eq!(entity.established_year, Some(1998));
    assert_eq!(entity.rating, None);
}

#[test]
fn test_unparseable_coordinates_count_as_missing() {
    let entity: RankableEntity = serde_json::from_value(json!({
        "id": "x",
        "name": "Somewhere",
        "latitude": "",
        "longitude": "not a number"
    }))
    .unwrap();

    assert_eq!(entity.location(), None);
}

#[test]
fn test_null_directory_fields_fall_back_to_defaults() {
    let entities: Vec<RankableEntity> = serde_json::from_value(json!([
        { "_id": "a", "name": "A", "availableDays": null },
        { "_id": null, "name": null, "experience": 4 },
        { "_id": "c", "name": "C" }
    ]))
    .unwrap();

    assert_eq!(entities.len(), 3);
    assert!(entities[0].available_days.is_empty());
    assert_eq!(entities[1].id, "");
    assert_eq!(entities[1].name, "");
    assert_eq!(entities[1].experience_years, Some(4.0));
}

#[test]
fn test_sort_key_parsing_agrees_with_serde_names() {
    for raw in ["distance", "name", "fee", "fees", "experience", "rating", "establishedYear", "year"] {
        let parsed: SortKey = raw.parse().unwrap();
        let deserialized: SortKey = serde_json::from_value(json!(raw)).unwrap();
        assert_eq!(parsed, deserialized, "{}", raw);
    }
    for key in [SortKey::Distance, SortKey::Fee, SortKey::EstablishedYear] {
        assert_eq!(key.to_string().parse::<SortKey>(), Ok(key));
    }
    assert_matches!("Fee".parse::<SortKey>(), Err(SearchError::UnknownSortKey(k)) if k == "Fee");
}

// ==============================================================================
// FILTERS AND NEARBY
// ==============================================================================

#[test]
fn test_filter_available_on_matches_weekday_names() {
    let doctor = |id: &str, days: &[&str]| RankableEntity {
        available_days: days.iter().map(|d| d.to_string()).collect(),
        ..RankableEntity::new(id, id)
    };
    let entities = vec![
        doctor("mon-wed", &["Monday", "Wednesday"]),
        doctor("fri", &["Friday"]),
        doctor("lowercase", &["monday"]),
    ];

    let monday: Vec<String> = filter_available_on(&entities, "Monday")
        .into_iter()
        .map(|e| e.id)
        .collect();

    assert_eq!(monday, vec!["mon-wed"]);
}

#[test]
fn test_nearby_applies_radius_and_limit() {
    let origin = GeoPoint::new(12.9716, 77.5946);
    let entities = vec![
        located("far", CHENNAI),
        located("two-km", GeoPoint::new(12.9896, 77.5946)),
        RankableEntity::new("unknown", "Unknown"),
        located("one-km", GeoPoint::new(12.9806, 77.5946)),
        located("five-km", GeoPoint::new(13.0166, 77.5946)),
    ];

    let within_ten = nearby(&entities, origin, 10.0, 20);
    let closest_two = nearby(&entities, origin, 10.0, 2);

    assert_eq!(ids(&within_ten), vec!["one-km", "two-km", "five-km"]);
    assert_eq!(ids(&closest_two), vec!["one-km", "two-km"]);
}

#[test]
fn test_service_nearby_requires_origin_and_positive_radius() {
    let service = RankingService::new(&TestConfig::default().to_app_config());
    let entities = vec![located("mumbai", MUMBAI)];

    assert_matches!(service.nearby(&entities, None, None), Err(SearchError::MissingOrigin));
    assert_matches!(
        service.nearby(&entities, Some(MUMBAI), Some(-1.0)),
        Err(SearchError::InvalidRadius(_))
    );
    assert_eq!(service.nearby(&entities, Some(MUMBAI), None).unwrap().len(), 1);
}

#[test]
fn test_service_rank_applies_day_filter_before_sorting() {
    let service = RankingService::new(&TestConfig::default().to_app_config());
    let entities = vec![
        RankableEntity {
            available_days: vec!["Tuesday".to_string()],
            consultation_fee: Some(900.0),
            ..RankableEntity::new("tue-expensive", "A")
        },
        RankableEntity {
            available_days: vec!["Monday".to_string()],
            consultation_fee: Some(100.0),
            ..RankableEntity::new("mon", "B")
        },
        RankableEntity {
            available_days: vec!["Tuesday".to_string()],
            consultation_fee: Some(300.0),
            ..RankableEntity::new("tue-cheap", "C")
        },
    ];

    let ranked = service.rank(&entities, &RankingQuery::by(SortKey::Fee), Some("Tuesday"));
    let unfiltered = service.rank(&entities, &RankingQuery::by(SortKey::Fee), Some(""));

    assert_eq!(ids(&ranked), vec!["tue-cheap", "tue-expensive"]);
    assert_eq!(unfiltered.len(), 3);
}
