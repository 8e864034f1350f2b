//! Random sample reservations for demos and report testing.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use antar_core::domain::booking::{BookingCode, BookingStatus, TripDetails};
use antar_core::domain::service::{Route, ServiceType, VehicleType};
use antar_core::flows::summary_price_request;
use antar_core::pricing::TariffTable;

use crate::repositories::{RepositoryError, ReservationRepository};

const SAMPLE_NAMES: &[&str] = &[
    "Budi Santoso",
    "Siti Aminah",
    "Joko Widodo",
    "Dewi Lestari",
    "Agus Salim",
    "Rina Marlina",
    "Andi Prasetyo",
    "Lina Marlina",
    "Hendra Gunawan",
    "Sari Dewi",
];

const SAMPLE_ROUTES: &[Route] =
    &[Route::MalangJuanda, Route::JuandaMalang, Route::MalangSurabaya, Route::SurabayaMalang];

const SAMPLE_SERVICES: &[ServiceType] =
    &[ServiceType::Standard, ServiceType::CharterDrop, ServiceType::CharterDaily];

const SAMPLE_STATUSES: &[BookingStatus] =
    &[BookingStatus::Pending, BookingStatus::Confirmed, BookingStatus::Cancelled];

const SAMPLE_PHONE: &str = "+6281234567890";
const QUARTER_HOURS: &[&str] = &["00", "15", "30", "45"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeedResult {
    pub inserted: usize,
    pub codes: Vec<String>,
}

/// A generated trip together with the status it is stored under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SamplePlan {
    pub trip: TripDetails,
    pub status: BookingStatus,
}

#[derive(Clone, Debug)]
pub struct SampleReservations {
    count: usize,
    tariffs: TariffTable,
}

impl SampleReservations {
    pub fn new(count: usize) -> Self {
        Self { count, tariffs: TariffTable::default() }
    }

    pub fn plan<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<SamplePlan> {
        (0..self.count).map(|_| self.sample(rng)).collect()
    }

    /// Inserts every planned reservation, then moves non-pending ones to their sampled status.
    pub async fn seed<S>(&self, repository: &S) -> Result<SeedResult, RepositoryError>
    where
        S: ReservationRepository + ?Sized,
    {
        let plans = self.plan(&mut rand::thread_rng());
        let mut codes = Vec::with_capacity(plans.len());

        for plan in plans {
            let code = repository.insert(plan.trip).await?;
            if plan.status != BookingStatus::Pending {
                mark_status(repository, &code, plan.status).await?;
            }
            codes.push(code.0);
        }

        Ok(SeedResult { inserted: codes.len(), codes })
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SamplePlan {
        let service = *SAMPLE_SERVICES.choose(rng).unwrap_or(&ServiceType::Standard);
        let route = *SAMPLE_ROUTES.choose(rng).unwrap_or(&Route::MalangJuanda);
        let status = *SAMPLE_STATUSES.choose(rng).unwrap_or(&BookingStatus::Pending);
        let name = SAMPLE_NAMES.choose(rng).copied().unwrap_or("Budi Santoso");
        let passengers = rng.gen_range(1..=5);
        let minutes = QUARTER_HOURS.choose(rng).copied().unwrap_or("00");
        let pickup_time = format!("{:02}:{minutes}", rng.gen_range(0..=23u32));
        let pickup_date =
            format!("2025-{:02}-{:02}", rng.gen_range(6..=12u32), rng.gen_range(1..=28u32));

        let vehicle = service.is_charter().then_some(VehicleType::Avanza);
        let rental_hours =
            (service == ServiceType::CharterDaily).then(|| rng.gen_range(4..=12));
        let (address_dropoff, flight, airline) = if rental_hours.is_some() {
            (None, None, None)
        } else {
            (
                Some(format!("Jl. Tujuan No. {}", rng.gen_range(1..=100u32))),
                Some(format!("GA{}", rng.gen_range(100..=999u32))),
                Some("Garuda Indonesia".to_string()),
            )
        };

        // Same request the dialogue summary prices, so reports agree with chat bookings.
        let total_cost = self.tariffs.price(&summary_price_request(service, route, passengers));

        let trip = TripDetails {
            name: name.to_string(),
            service,
            route,
            passengers,
            phone: SAMPLE_PHONE.to_string(),
            address_pickup: format!("Jl. Contoh No. {}", rng.gen_range(1..=100u32)),
            address_dropoff,
            flight,
            airline,
            pickup_time,
            pickup_date,
            vehicle,
            rental_hours,
            total_cost,
        };

        SamplePlan { trip, status }
    }
}

async fn mark_status<S>(
    repository: &S,
    code: &BookingCode,
    status: BookingStatus,
) -> Result<(), RepositoryError>
where
    S: ReservationRepository + ?Sized,
{
    if let Some(mut booking) = repository.find_by_code(code).await? {
        booking.status = status;
        repository.save(booking).await?;
    }
    Ok(())
}
