// libs/appointment-cell/src/services/booking.rs
use async_trait::async_trait;
use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info};

use shared_config::AppConfig;
use shared_models::CurrentActor;

use crate::models::{
    ApiEnvelope, AppointmentStatus, BookingRequest, ProviderListing, SlotRequest,
    SubmissionError,
};
use crate::services::availability;

const CREATE_APPOINTMENT_PATH: &str = "/api/appointments/create";

pub struct BookingRequestAssembler;

impl BookingRequestAssembler {
    /// Builds the remote booking payload for an already validated slot.
    ///
    /// Age is the difference of calendar years, matching what the portal
    /// has always sent.
    pub fn assemble(
        actor: &CurrentActor,
        provider: &ProviderListing,
        slot: &SlotRequest,
        today: NaiveDate,
    ) -> BookingRequest {
        BookingRequest {
            first_name: actor.first_name.clone(),
            last_name: actor.last_name.clone(),
            email: actor.email.clone(),
            phone: actor.phone.clone(),
            date_of_birth: actor.date_of_birth,
            age: today.year() - actor.date_of_birth.year(),
            image: actor.image.clone().unwrap_or_default(),
            organization_type: provider.organization_type,
            organization_name: provider.organization_name.clone(),
            organization_email: provider.organization_email.clone(),
            doctor_name: provider.name.clone(),
            doctor_email: provider.email.clone(),
            fees: provider.consultation_fees,
            appointment_date: slot.date(),
            time_slots: slot.time_slots(),
            status: AppointmentStatus::Pending,
        }
    }
}

/// Hands a booking to whatever stores appointments.
#[async_trait]
pub trait BookingSubmitter: Send + Sync {
    async fn submit(&self, request: &BookingRequest) -> Result<Value, SubmissionError>;
}

#[async_trait]
impl<T: BookingSubmitter + ?Sized> BookingSubmitter for Arc<T> {
    async fn submit(&self, request: &BookingRequest) -> Result<Value, SubmissionError> {
        (**self).submit(request).await
    }
}

pub struct HttpBookingSubmitter {
    client: Client,
    base_url: String,
}

impl HttpBookingSubmitter {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.booking_api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BookingSubmitter for HttpBookingSubmitter {
    async fn submit(&self, request: &BookingRequest) -> Result<Value, SubmissionError> {
        if self.base_url.is_empty() {
            return Err(SubmissionError::NotConfigured);
        }

        let url = format!("{}{}", self.base_url, CREATE_APPOINTMENT_PATH);
        debug!("Submitting booking to {}", url);

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let envelope: Option<ApiEnvelope> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            error!("Booking API error ({}): {}", status, body);
            let message = envelope
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("API error ({})", status));
            return Err(SubmissionError::Rejected(message));
        }

        match envelope {
            Some(ApiEnvelope { success: true, data: Some(data), .. }) => Ok(data),
            Some(ApiEnvelope { message, .. }) => Err(SubmissionError::Rejected(
                message.unwrap_or_else(|| "Failed to book appointment".to_string()),
            )),
            None => Err(SubmissionError::Rejected(
                "Unreadable response from booking API".to_string(),
            )),
        }
    }
}

/// Validate, assemble and submit a booking.
pub struct BookingService<S = HttpBookingSubmitter> {
    submitter: S,
}

impl BookingService<HttpBookingSubmitter> {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            submitter: HttpBookingSubmitter::new(config),
        }
    }
}

impl<S: BookingSubmitter> BookingService<S> {
    pub fn with_submitter(submitter: S) -> Self {
        Self { submitter }
    }

    pub async fn book(
        &self,
        actor: &CurrentActor,
        provider: &ProviderListing,
        date: NaiveDate,
        slot_start: NaiveTime,
    ) -> Result<Value, SubmissionError> {
        self.book_on(actor, provider, date, slot_start, Local::now().date_naive())
            .await
    }

    pub async fn book_on(
        &self,
        actor: &CurrentActor,
        provider: &ProviderListing,
        date: NaiveDate,
        slot_start: NaiveTime,
        today: NaiveDate,
    ) -> Result<Value, SubmissionError> {
        debug!("Booking {} with {} on {}", actor.id, provider.name, date);

        let slot = availability::validate_on(&provider.availability, date, slot_start, today)?;
        let request = BookingRequestAssembler::assemble(actor, provider, &slot, today);
        let appointment = self.submitter.submit(&request).await?;

        info!(
            "Appointment booked with {} on {} at {}",
            provider.name,
            slot.date(),
            request.time_slots.start.format("%H:%M")
        );

        Ok(appointment)
    }
}
