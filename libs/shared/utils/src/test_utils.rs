use std::sync::Arc;
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::CurrentActor;

pub struct TestConfig {
    pub booking_api_url: String,
    pub search_radius_km: f64,
    pub nearby_result_limit: usize,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            booking_api_url: "http://localhost:5000".to_string(),
            search_radius_km: 10.0,
            nearby_result_limit: 20,
        }
    }
}

impl TestConfig {
    /// Points the booking client at a mock server.
    pub fn with_booking_api(url: &str) -> Self {
        Self {
            booking_api_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            booking_api_url: self.booking_api_url.clone(),
            port: 0,
            search_radius_km: self.search_radius_km,
            nearby_result_limit: self.nearby_result_limit,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestActor {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
}

impl Default for TestActor {
    fn default() -> Self {
        Self::new("Asha", "Verma", "asha.verma@example.com", 1990)
    }
}

impl TestActor {
    pub fn new(first_name: &str, last_name: &str, email: &str, birth_year: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(birth_year, 6, 15).unwrap(),
        }
    }

    pub fn to_actor(&self) -> CurrentActor {
        CurrentActor {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: "9876543210".to_string(),
            date_of_birth: self.date_of_birth,
            image: None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!(self.to_actor())
    }
}

pub struct MockPortalResponses;

impl MockPortalResponses {
    /// A doctor listing as the provider directory returns it.
    pub fn provider_listing(available_days: &[&str], start: &str, end: &str) -> serde_json::Value {
        json!({
            "name": "Dr. Meera Iyer",
            "email": "meera.iyer@cityhospital.example",
            "consultationFees": 500,
            "organizationType": "Hospital",
            "organizationName": "City Hospital",
            "organizationEmail": "contact@cityhospital.example",
            "availableDays": available_days,
            "timeSlots": { "start": start, "end": end }
        })
    }

    pub fn appointment_created_response(request: &serde_json::Value) -> serde_json::Value {
        let mut data = request.clone();
        if let Some(record) = data.as_object_mut() {
            record.insert("_id".to_string(), json!(Uuid::new_v4().to_string()));
        }
        json!({
            "success": true,
            "data": data
        })
    }

    pub fn error_response(message: &str) -> serde_json::Value {
        json!({
            "success": false,
            "message": message
        })
    }
}
