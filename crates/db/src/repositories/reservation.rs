use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::Row;

use antar_core::domain::booking::{Booking, BookingCode, BookingStatus, TripDetails};
use antar_core::domain::service::{Route, ServiceType, VehicleType};

use super::session::timestamp;
use super::{RepositoryError, ReservationReport, ReservationRepository, CODE_ATTEMPTS};
use crate::DbPool;

const SELECT_COLUMNS: &str = "SELECT pnr, name, service, route, passengers, phone, address_pickup,
        address_dropoff, flight, airline, pickup_time, pickup_date, vehicle, rental_hours,
        total_cost, status, created_at
 FROM reservations";

pub struct SqlReservationRepository {
    pool: DbPool,
}

impl SqlReservationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn write(&self, booking: &Booking, upsert: bool) -> Result<(), sqlx::Error> {
        let verb = if upsert { "INSERT OR REPLACE" } else { "INSERT" };
        let statement = format!(
            "{verb} INTO reservations (pnr, name, service, route, passengers, phone,
                address_pickup, address_dropoff, flight, airline, pickup_time, pickup_date,
                vehicle, rental_hours, total_cost, status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
        let trip = &booking.trip;

        sqlx::query(&statement)
            .bind(booking.code.as_str())
            .bind(&trip.name)
            .bind(trip.service.as_str())
            .bind(trip.route.as_str())
            .bind(i64::from(trip.passengers))
            .bind(&trip.phone)
            .bind(&trip.address_pickup)
            .bind(&trip.address_dropoff)
            .bind(&trip.flight)
            .bind(&trip.airline)
            .bind(&trip.pickup_time)
            .bind(&trip.pickup_date)
            .bind(trip.vehicle.map(|vehicle| vehicle.as_str()))
            .bind(trip.rental_hours.map(i64::from))
            .bind(trip.total_cost)
            .bind(booking.status.as_str())
            .bind(booking.created_at.map(timestamp))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn decode<T>(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<T, RepositoryError>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column).map_err(|e| RepositoryError::Decode(e.to_string()))
}

/// Rows written by older tooling store absent optional values as `''`.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn row_to_booking(row: &sqlx::sqlite::SqliteRow) -> Result<Booking, RepositoryError> {
    let code: String = decode(row, "pnr")?;
    let service: String = decode(row, "service")?;
    let route: String = decode(row, "route")?;
    let passengers: i64 = decode(row, "passengers")?;
    let vehicle: Option<String> = decode(row, "vehicle")?;
    let rental_hours: Option<i64> = decode(row, "rental_hours")?;
    let status: String = decode(row, "status")?;
    let created_at: Option<String> = decode(row, "created_at")?;

    let service = service
        .parse::<ServiceType>()
        .map_err(|e| RepositoryError::Decode(format!("reservation {code}: {e}")))?;
    let route = route
        .parse::<Route>()
        .map_err(|e| RepositoryError::Decode(format!("reservation {code}: {e}")))?;
    let status = status
        .parse::<BookingStatus>()
        .map_err(|e| RepositoryError::Decode(format!("reservation {code}: {e}")))?;
    let vehicle = non_empty(vehicle).and_then(|label| VehicleType::from_label(&label));
    let passengers = u32::try_from(passengers)
        .map_err(|_| RepositoryError::Decode(format!("reservation {code}: bad passenger count")))?;
    let rental_hours = rental_hours.and_then(|hours| u32::try_from(hours).ok());
    let created_at = non_empty(created_at)
        .map(|value| {
            DateTime::parse_from_rfc3339(&value)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| RepositoryError::Decode(format!("reservation {code}: {e}")))
        })
        .transpose()?;

    let trip = TripDetails {
        name: decode(row, "name")?,
        service,
        route,
        passengers,
        phone: decode(row, "phone")?,
        address_pickup: decode(row, "address_pickup")?,
        address_dropoff: non_empty(decode(row, "address_dropoff")?),
        flight: non_empty(decode(row, "flight")?),
        airline: non_empty(decode(row, "airline")?),
        pickup_time: decode(row, "pickup_time")?,
        pickup_date: decode(row, "pickup_date")?,
        vehicle,
        rental_hours,
        total_cost: decode(row, "total_cost")?,
    };

    Ok(Booking { code: BookingCode(code), status, trip, created_at })
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait::async_trait]
impl ReservationRepository for SqlReservationRepository {
    async fn insert(&self, trip: TripDetails) -> Result<BookingCode, RepositoryError> {
        for _ in 0..CODE_ATTEMPTS {
            let booking = Booking::pending(BookingCode::generate(), trip.clone(), Utc::now());
            match self.write(&booking, false).await {
                Ok(()) => return Ok(booking.code),
                Err(error) if is_unique_violation(&error) => continue,
                Err(error) => return Err(error.into()),
            }
        }
        Err(RepositoryError::CodeExhausted { attempts: CODE_ATTEMPTS })
    }

    async fn save(&self, booking: Booking) -> Result<(), RepositoryError> {
        self.write(&booking, true).await?;
        Ok(())
    }

    async fn find_by_code(&self, code: &BookingCode) -> Result<Option<Booking>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE pnr = ?"))
            .bind(code.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_booking(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Booking>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> =
            sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY created_at ASC, pnr ASC"))
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(row_to_booking).collect::<Result<Vec<_>, _>>()
    }

    async fn report(&self) -> Result<ReservationReport, RepositoryError> {
        let totals = sqlx::query(
            "SELECT COUNT(*) AS total_reservations,
                    COALESCE(SUM(total_cost), 0) AS total_revenue,
                    COALESCE(AVG(total_cost), 0.0) AS avg_booking_value
             FROM reservations",
        )
        .fetch_one(&self.pool)
        .await?;

        let status_rows = sqlx::query(
            "SELECT status, COUNT(*) AS count FROM reservations GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut status_counts = BTreeMap::new();
        for row in &status_rows {
            let status: String = decode(row, "status")?;
            let count: i64 = decode(row, "count")?;
            status_counts.insert(status, count);
        }

        Ok(ReservationReport {
            total_reservations: decode(&totals, "total_reservations")?,
            status_counts,
            total_revenue: decode(&totals, "total_revenue")?,
            avg_booking_value: decode(&totals, "avg_booking_value")?,
        })
    }
}
