// libs/search-cell/src/services/ranking.rs
use std::cmp::Ordering;
use tracing::debug;

use shared_config::AppConfig;

use crate::models::{
    GeoPoint, RankableEntity, RankedEntity, RankingQuery, SearchError, SortDirection, SortKey,
};
use crate::services::geo::{distance_km, format_distance_km};

/// Known distances first (nearest first), unknown distances last.
fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_by_key(key: SortKey, a: &RankedEntity, b: &RankedEntity) -> Ordering {
    let ordering = match key {
        SortKey::Distance => return compare_distance(a.distance_km, b.distance_km),
        SortKey::Name => a.entity.name.cmp(&b.entity.name),
        _ => {
            let a_value = key.numeric_value(&a.entity).unwrap_or(0.0);
            let b_value = key.numeric_value(&b.entity).unwrap_or(0.0);
            a_value.total_cmp(&b_value)
        }
    };

    match key.direction() {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Orders entities for display. The sort is stable, so entities that compare
/// equal keep the order the directory returned them in.
pub fn rank(entities: &[RankableEntity], query: &RankingQuery) -> Vec<RankedEntity> {
    let mut ranked: Vec<RankedEntity> = entities
        .iter()
        .map(|entity| {
            let distance = query
                .origin
                .zip(entity.location())
                .map(|(origin, location)| distance_km(origin, location));
            RankedEntity {
                entity: entity.clone(),
                distance_km: distance,
                distance_label: distance.map(format_distance_km),
            }
        })
        .collect();

    if let Some(key) = query.sort_key {
        ranked.sort_by(|a, b| compare_by_key(key, a, b));
    }

    ranked
}

/// Entities whose schedule includes the given weekday name.
pub fn filter_available_on(entities: &[RankableEntity], day: &str) -> Vec<RankableEntity> {
    entities
        .iter()
        .filter(|entity| entity.available_days.iter().any(|d| d == day))
        .cloned()
        .collect()
}

/// Nearest entities within `radius_km` of `origin`, at most `limit` of them.
pub fn nearby(
    entities: &[RankableEntity],
    origin: GeoPoint,
    radius_km: f64,
    limit: usize,
) -> Vec<RankedEntity> {
    rank(entities, &RankingQuery::by_distance_from(origin))
        .into_iter()
        .take_while(|ranked| ranked.distance_km.is_some_and(|d| d <= radius_km))
        .take(limit)
        .collect()
}

pub struct RankingService {
    default_radius_km: f64,
    result_limit: usize,
}

impl RankingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            default_radius_km: config.search_radius_km,
            result_limit: config.nearby_result_limit,
        }
    }

    pub fn rank(
        &self,
        entities: &[RankableEntity],
        query: &RankingQuery,
        available_day: Option<&str>,
    ) -> Vec<RankedEntity> {
        debug!(
            "Ranking {} entities by {:?} (origin known: {})",
            entities.len(),
            query.sort_key,
            query.origin.is_some()
        );

        match available_day.filter(|day| !day.is_empty()) {
            Some(day) => rank(&filter_available_on(entities, day), query),
            None => rank(entities, query),
        }
    }

    pub fn nearby(
        &self,
        entities: &[RankableEntity],
        origin: Option<GeoPoint>,
        radius_km: Option<f64>,
    ) -> Result<Vec<RankedEntity>, SearchError> {
        let origin = origin.ok_or(SearchError::MissingOrigin)?;
        let radius_km = radius_km.unwrap_or(self.default_radius_km);
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(SearchError::InvalidRadius(radius_km));
        }

        let results = nearby(entities, origin, radius_km, self.result_limit);
        debug!(
            "Found {} of {} entities within {} km",
            results.len(),
            entities.len(),
            radius_km
        );

        Ok(results)
    }
}
