use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use antar_core::domain::booking::{Booking, BookingCode, TripDetails};

pub mod memory;
pub mod reservation;
pub mod session;

pub use memory::{InMemoryReservationRepository, InMemorySessionStore};
pub use reservation::SqlReservationRepository;
pub use session::{SessionStore, SqlSessionStore};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("could not allocate a unique booking code after {attempts} attempts")]
    CodeExhausted { attempts: u32 },
}

/// Aggregates over every stored reservation.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReservationReport {
    pub total_reservations: i64,
    pub status_counts: BTreeMap<String, i64>,
    pub total_revenue: i64,
    pub avg_booking_value: f64,
}

impl ReservationReport {
    pub fn from_bookings(bookings: &[Booking]) -> Self {
        let mut status_counts = BTreeMap::new();
        for booking in bookings {
            *status_counts.entry(booking.status.as_str().to_string()).or_insert(0) += 1;
        }
        let total_reservations = bookings.len() as i64;
        let total_revenue = bookings.iter().map(|booking| booking.trip.total_cost).sum::<i64>();
        let avg_booking_value = if total_reservations == 0 {
            0.0
        } else {
            total_revenue as f64 / total_reservations as f64
        };

        Self { total_reservations, status_counts, total_revenue, avg_booking_value }
    }
}

/// Number of fresh codes tried before an insert gives up.
pub const CODE_ATTEMPTS: u32 = 5;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Stores a new pending booking under a freshly generated code.
    async fn insert(&self, trip: TripDetails) -> Result<BookingCode, RepositoryError>;
    /// Writes a fully formed booking, replacing any row with the same code.
    async fn save(&self, booking: Booking) -> Result<(), RepositoryError>;
    async fn find_by_code(&self, code: &BookingCode) -> Result<Option<Booking>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Booking>, RepositoryError>;
    async fn report(&self) -> Result<ReservationReport, RepositoryError>;
}

#[async_trait]
impl<T> ReservationRepository for Arc<T>
where
    T: ReservationRepository + ?Sized,
{
    async fn insert(&self, trip: TripDetails) -> Result<BookingCode, RepositoryError> {
        (**self).insert(trip).await
    }

    async fn save(&self, booking: Booking) -> Result<(), RepositoryError> {
        (**self).save(booking).await
    }

    async fn find_by_code(&self, code: &BookingCode) -> Result<Option<Booking>, RepositoryError> {
        (**self).find_by_code(code).await
    }

    async fn list(&self) -> Result<Vec<Booking>, RepositoryError> {
        (**self).list().await
    }

    async fn report(&self) -> Result<ReservationReport, RepositoryError> {
        (**self).report().await
    }
}
