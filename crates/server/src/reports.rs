use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::SecondsFormat;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use antar_core::domain::booking::Booking;
use antar_core::errors::{ReportError, ReportFailure};
use antar_db::{RepositoryError, ReservationReport, ReservationRepository};

#[derive(Clone)]
pub struct ReportsState {
    reservations: Arc<dyn ReservationRepository>,
}

/// One row of `GET /reservations/`, in the shape the booking dashboard reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReservationRecord {
    pub reservation_id: String,
    pub customer_name: String,
    pub reservation_timestamp: Option<String>,
    pub route_origin: String,
    pub route_destination: String,
    pub reservation_type: String,
    pub num_passengers: u32,
    pub travel_date: String,
    pub pickup_time: String,
    pub pickup_address: String,
    pub dropoff_address: Option<String>,
    pub flight_details: Option<String>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub price: i64,
    pub status: String,
}

impl From<&Booking> for ReservationRecord {
    fn from(booking: &Booking) -> Self {
        let trip = &booking.trip;
        let (route_origin, route_destination) = trip.route.endpoints();
        Self {
            reservation_id: booking.code.0.clone(),
            customer_name: trip.name.clone(),
            reservation_timestamp: booking
                .created_at
                .map(|created_at| created_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            route_origin: route_origin.to_string(),
            route_destination: route_destination.to_string(),
            reservation_type: trip.service.as_str().to_string(),
            num_passengers: trip.passengers,
            travel_date: trip.pickup_date.clone(),
            pickup_time: trip.pickup_time.clone(),
            pickup_address: trip.address_pickup.clone(),
            dropoff_address: trip.address_dropoff.clone(),
            flight_details: trip.flight.clone(),
            notes: None,
            cancellation_reason: None,
            price: trip.total_cost,
            status: booking.status.as_str().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub correlation_id: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

pub fn router(reservations: Arc<dyn ReservationRepository>) -> Router {
    Router::new()
        .route("/reservations/", get(list_reservations))
        .route("/api/reports", get(report))
        .with_state(ReportsState { reservations })
}

pub async fn list_reservations(
    State(state): State<ReportsState>,
) -> Result<Json<Vec<ReservationRecord>>, ApiError> {
    let bookings = state
        .reservations
        .list()
        .await
        .map_err(|error| failed("reservations.list", error))?;
    Ok(Json(bookings.iter().map(ReservationRecord::from).collect()))
}

pub async fn report(
    State(state): State<ReportsState>,
) -> Result<Json<ReservationReport>, ApiError> {
    let report = state
        .reservations
        .report()
        .await
        .map_err(|error| failed("reservations.report", error))?;
    Ok(Json(report))
}

fn failed(operation: &'static str, error: RepositoryError) -> ApiError {
    let failure = match &error {
        RepositoryError::Decode(_) => ReportFailure::UnreadableRecord,
        RepositoryError::Database(_) | RepositoryError::CodeExhausted { .. } => {
            ReportFailure::StoreUnavailable
        }
    };
    let error = ReportError::new(failure, error.to_string(), Uuid::new_v4().to_string());
    warn!(
        event_name = "http.reports.failed",
        correlation_id = %error.correlation_id(),
        operation,
        retryable = error.is_retryable(),
        error = %error,
        "reservation report request failed"
    );

    (
        status_for(error.failure()),
        Json(ErrorBody {
            error: error.user_message(),
            correlation_id: error.correlation_id().to_string(),
        }),
    )
}

fn status_for(failure: ReportFailure) -> StatusCode {
    match failure {
        ReportFailure::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ReportFailure::UnreadableRecord => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
