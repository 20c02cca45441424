use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{Local, NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use shared_config::AppConfig;
use shared_models::{AppError, CurrentActor};

use crate::models::{hhmm, BookingError, ProviderListing, SubmissionError, WeeklyAvailability};
use crate::services::availability::MAX_BOOKING_HORIZON_DAYS;
use crate::services::{AvailabilityService, BookingService};

const DEFAULT_BOOKING_HORIZON_DAYS: usize = 30;

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::InvalidAvailability(_) => AppError::Conflict(err.to_string()),
            BookingError::DateNotAvailable(_) | BookingError::SlotNotOffered(_) => {
                AppError::ValidationError(err.to_string())
            }
        }
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation(booking) => booking.into(),
            other => AppError::ExternalService(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsRequest {
    pub availability: WeeklyAvailability,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookableDatesRequest {
    pub availability: WeeklyAvailability,
    pub from: Option<NaiveDate>,
    pub days: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateSlotRequest {
    pub availability: WeeklyAvailability,
    pub date: NaiveDate,
    pub slot_start: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub actor: CurrentActor,
    pub provider: ProviderListing,
    pub date: NaiveDate,
    pub slot_start: String,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A start time that does not even parse cannot be one of the offered slots.
fn parse_slot_start(raw: &str) -> Result<NaiveTime, AppError> {
    hhmm::parse(raw).map_err(|_| BookingError::SlotNotOffered(raw.to_string()).into())
}

#[axum::debug_handler]
pub async fn get_available_slots(
    Json(request): Json<SlotsRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new();
    let date = request.date.unwrap_or_else(today);

    let schedule = service.day_schedule(&request.availability, date, today())?;

    Ok(Json(json!(schedule)))
}

#[axum::debug_handler]
pub async fn get_bookable_dates(
    Json(request): Json<BookableDatesRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new();
    let from = request.from.unwrap_or_else(today).max(today());
    let days = request.days.unwrap_or(DEFAULT_BOOKING_HORIZON_DAYS);
    if days > MAX_BOOKING_HORIZON_DAYS {
        return Err(AppError::BadRequest(format!(
            "days must be at most {}, got {}",
            MAX_BOOKING_HORIZON_DAYS, days
        )));
    }

    let dates = service.bookable_dates(&request.availability, from, days)?;

    Ok(Json(json!({
        "dates": dates,
        "total": dates.len()
    })))
}

#[axum::debug_handler]
pub async fn validate_slot(
    Json(request): Json<ValidateSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new();
    let slot_start = parse_slot_start(&request.slot_start)?;

    let slot = service.validate(&request.availability, request.date, slot_start, today())?;

    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    if !state.is_configured() {
        warn!("Booking requested but BOOKING_API_URL is not configured");
        return Err(SubmissionError::NotConfigured.into());
    }

    let booking_service = BookingService::new(&state);
    let slot_start = parse_slot_start(&request.slot_start)?;

    let appointment = booking_service
        .book(&request.actor, &request.provider, request.date, slot_start)
        .await?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}
