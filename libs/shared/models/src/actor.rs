use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The signed-in patient on whose behalf a booking is made.
///
/// Passed explicitly to whichever component needs identity instead of being
/// read from a session cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentActor {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub image: Option<String>,
}

impl CurrentActor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
