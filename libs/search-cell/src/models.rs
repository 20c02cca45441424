// libs/search-cell/src/models.rs
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A WGS-84 coordinate in decimal degrees.
///
/// Also accepts the browser geolocation shape `{lat, lng}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng")]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Directory values arrive as numbers or numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn into_f64(self) -> Option<f64> {
        let value = match self {
            NumberOrText::Number(n) => n,
            NumberOrText::Text(text) => text.trim().parse().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NumberOrText>::deserialize(deserializer)?.and_then(NumberOrText::into_f64))
}

fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?.map(|value| value as i32))
}

/// Unset optional fields come back from the directory as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A doctor, hospital or clinic as returned by the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankableEntity {
    #[serde(default, alias = "_id", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(
        default,
        alias = "hospitalName",
        alias = "clinicName",
        deserialize_with = "null_as_default"
    )]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(default, alias = "experience", deserialize_with = "lenient_f64")]
    pub experience_years: Option<f64>,
    #[serde(default, alias = "consultationFees", alias = "fees", deserialize_with = "lenient_f64")]
    pub consultation_fee: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub established_year: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub available_days: Vec<String>,
}

impl RankableEntity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude: None,
            longitude: None,
            experience_years: None,
            consultation_fee: None,
            rating: None,
            established_year: None,
            available_days: Vec::new(),
        }
    }

    /// Present only when both coordinates are known.
    pub fn location(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.latitude?, self.longitude?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Distance,
    Name,
    #[serde(alias = "fees")]
    Fee,
    Experience,
    Rating,
    #[serde(alias = "year")]
    EstablishedYear,
}

impl SortKey {
    /// Cheapest first for cost; most experienced, best rated and most
    /// recently established first for the rest.
    pub fn direction(&self) -> SortDirection {
        match self {
            SortKey::Distance | SortKey::Name | SortKey::Fee => SortDirection::Ascending,
            SortKey::Experience | SortKey::Rating | SortKey::EstablishedYear => {
                SortDirection::Descending
            }
        }
    }

    /// Numeric sort value, with missing fields counted as zero.
    pub fn numeric_value(&self, entity: &RankableEntity) -> Option<f64> {
        match self {
            SortKey::Fee => Some(entity.consultation_fee.unwrap_or(0.0)),
            SortKey::Experience => Some(entity.experience_years.unwrap_or(0.0)),
            SortKey::Rating => Some(entity.rating.unwrap_or(0.0)),
            SortKey::EstablishedYear => Some(entity.established_year.unwrap_or(0) as f64),
            SortKey::Distance | SortKey::Name => None,
        }
    }

    /// Parses a "Sort By" selection; the empty placeholder means no sorting.
    pub fn parse_selection(raw: Option<&str>) -> Result<Option<SortKey>, SearchError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some),
        }
    }
}

impl FromStr for SortKey {
    type Err = SearchError;

    /// Accepts the same names and aliases as the serde representation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let deserializer: StrDeserializer<'_, ValueError> = s.into_deserializer();
        SortKey::deserialize(deserializer).map_err(|_| SearchError::UnknownSortKey(s.to_string()))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Distance => write!(f, "distance"),
            SortKey::Name => write!(f, "name"),
            SortKey::Fee => write!(f, "fee"),
            SortKey::Experience => write!(f, "experience"),
            SortKey::Rating => write!(f, "rating"),
            SortKey::EstablishedYear => write!(f, "establishedYear"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingQuery {
    pub origin: Option<GeoPoint>,
    pub sort_key: Option<SortKey>,
}

impl RankingQuery {
    pub fn new(origin: Option<GeoPoint>, sort_key: Option<SortKey>) -> Self {
        Self { origin, sort_key }
    }

    pub fn by(sort_key: SortKey) -> Self {
        Self::new(None, Some(sort_key))
    }

    pub fn by_distance_from(origin: GeoPoint) -> Self {
        Self::new(Some(origin), Some(SortKey::Distance))
    }
}

/// An entity in ranked order, with its distance from the origin when known.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntity {
    #[serde(flatten)]
    pub entity: RankableEntity,
    pub distance_km: Option<f64>,
    /// One-decimal rendering of `distance_km`, as shown on result cards.
    pub distance_label: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("Search radius must be a positive number of kilometres, got {0}")]
    InvalidRadius(f64),

    #[error("Latitude and longitude are required")]
    MissingOrigin,
}
