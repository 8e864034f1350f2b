use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::service::{Route, ServiceType, VehicleType};
use crate::errors::DomainError;

static BOOKING_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(KIR|KR)-[A-Z0-9]{4,6}$").expect("valid booking code pattern"));

static INLINE_BOOKING_CODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(KIR|KR)-[A-Z0-9]{4,6}\b").expect("valid inline booking code pattern")
});

pub const BOOKING_CODE_PREFIX: &str = "KR-";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingCode(pub String);

impl BookingCode {
    pub fn generate() -> Self {
        let suffix = Uuid::new_v4().simple().to_string()[..6].to_ascii_uppercase();
        Self(format!("{BOOKING_CODE_PREFIX}{suffix}"))
    }

    /// Accepts a whole message only when it is exactly one booking code.
    pub fn parse_exact(input: &str) -> Option<Self> {
        let candidate = input.trim().to_ascii_uppercase();
        BOOKING_CODE_PATTERN.is_match(&candidate).then_some(Self(candidate))
    }

    pub fn find_in(text: &str) -> Option<Self> {
        let upper = text.to_ascii_uppercase();
        INLINE_BOOKING_CODE_PATTERN.find(&upper).map(|found| Self(found.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            other => {
                Err(DomainError::UnknownValue { field: "status", value: other.to_string() })
            }
        }
    }
}

/// Everything collected by the dialogue for one trip, ready to be stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripDetails {
    pub name: String,
    pub service: ServiceType,
    pub route: Route,
    pub passengers: u32,
    pub phone: String,
    pub address_pickup: String,
    pub address_dropoff: Option<String>,
    pub flight: Option<String>,
    pub airline: Option<String>,
    pub pickup_time: String,
    pub pickup_date: String,
    pub vehicle: Option<VehicleType>,
    pub rental_hours: Option<u32>,
    pub total_cost: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub code: BookingCode,
    pub status: BookingStatus,
    pub trip: TripDetails,
    /// `None` for rows written before creation times were recorded.
    pub created_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn pending(code: BookingCode, trip: TripDetails, created_at: DateTime<Utc>) -> Self {
        Self { code, status: BookingStatus::Pending, trip, created_at: Some(created_at) }
    }
}
