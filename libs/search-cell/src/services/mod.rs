pub mod geo;
pub mod ranking;

pub use geo::{distance_km, format_distance_km};
pub use ranking::{filter_available_on, nearby, rank, RankingService};
