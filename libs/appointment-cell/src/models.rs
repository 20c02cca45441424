// libs/appointment-cell/src/models.rs
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Every bookable slot lasts this long.
pub const SLOT_DURATION_MINUTES: u32 = 30;

/// `HH:MM` wire format for time-of-day values.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<NaiveTime, String> {
        NaiveTime::parse_from_str(raw.trim(), FORMAT)
            .map_err(|_| format!("'{}' is not a valid HH:MM time", raw))
    }
}

// ==============================================================================
// AVAILABILITY MODELS
// ==============================================================================

/// The single daily working window shared by every available weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyWindow {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl DailyWindow {
    /// Builds a window from the directory's raw `HH:MM` strings. Ordering is
    /// not checked here; slot enumeration rejects non-chronological windows.
    pub fn parse(start: &str, end: &str) -> Result<Self, BookingError> {
        Ok(Self {
            start: hhmm::parse(start).map_err(BookingError::InvalidAvailability)?,
            end: hhmm::parse(end).map_err(BookingError::InvalidAvailability)?,
        })
    }

    pub fn is_chronological(&self) -> bool {
        self.start < self.end
    }
}

/// A provider's recurring weekly schedule as the provider directory serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAvailability {
    /// English weekday names ("Monday".."Sunday"), case-sensitive.
    #[serde(default)]
    pub available_days: Vec<String>,
    #[serde(rename = "timeSlots")]
    pub daily_window: DailyWindow,
}

impl WeeklyAvailability {
    pub fn new<I, S>(available_days: I, daily_window: DailyWindow) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            available_days: available_days.into_iter().map(Into::into).collect(),
            daily_window,
        }
    }
}

/// A booking candidate that has passed validation.
///
/// Only the availability engine constructs these, so holding one means the
/// date and start time were offered by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRequest {
    date: NaiveDate,
    #[serde(with = "hhmm")]
    slot_start: NaiveTime,
    #[serde(with = "hhmm")]
    slot_end: NaiveTime,
}

impl SlotRequest {
    pub(crate) fn new(date: NaiveDate, slot_start: NaiveTime) -> Self {
        Self {
            date,
            slot_start,
            slot_end: slot_start + Duration::minutes(SLOT_DURATION_MINUTES as i64),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn slot_start(&self) -> NaiveTime {
        self.slot_start
    }

    pub fn slot_end(&self) -> NaiveTime {
        self.slot_end
    }

    pub fn time_slots(&self) -> TimeSlots {
        TimeSlots {
            start: self.slot_start,
            end: self.slot_end,
        }
    }
}

/// Open/closed status and offered start times for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub is_open: bool,
    pub slots: Vec<String>,
}

// ==============================================================================
// BOOKING MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrganizationType {
    Hospital,
    Clinic,
}

/// A doctor as listed by a hospital or clinic, with its weekly schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderListing {
    pub name: String,
    pub email: String,
    #[serde(alias = "fees")]
    pub consultation_fees: f64,
    pub organization_type: OrganizationType,
    pub organization_name: String,
    pub organization_email: String,
    #[serde(flatten)]
    pub availability: WeeklyAvailability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlots {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "Pending"),
            AppointmentStatus::Confirmed => write!(f, "Confirmed"),
            AppointmentStatus::Cancelled => write!(f, "Cancelled"),
            AppointmentStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// Payload accepted by the remote appointment endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    // Patient
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub age: i32,
    pub image: String,

    // Organization
    pub organization_type: OrganizationType,
    pub organization_name: String,
    pub organization_email: String,

    // Doctor
    pub doctor_name: String,
    pub doctor_email: String,
    pub fees: f64,

    pub appointment_date: NaiveDate,
    pub time_slots: TimeSlots,
    pub status: AppointmentStatus,
}

/// Response envelope used by the remote portal API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("This provider cannot currently be booked: {0}")]
    InvalidAvailability(String),

    #[error("{0} is not an available date for this provider")]
    DateNotAvailable(NaiveDate),

    #[error("Time {0} is not offered for this date, please reselect a time")]
    SlotNotOffered(String),
}

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] BookingError),

    #[error("Booking API unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Booking rejected: {0}")]
    Rejected(String),

    #[error("Booking API is not configured")]
    NotConfigured,
}
