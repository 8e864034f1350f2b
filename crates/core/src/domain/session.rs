use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::booking::TripDetails;
use crate::domain::service::{Route, ServiceType, VehicleType};
use crate::flows::states::DialogueStep;

/// Typed slot record for one booking conversation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSlots {
    pub service: Option<ServiceType>,
    pub route: Option<Route>,
    pub vehicle: Option<VehicleType>,
    pub name: Option<String>,
    pub passengers: Option<u32>,
    pub phone: Option<String>,
    pub address_pickup: Option<String>,
    pub rental_hours: Option<u32>,
    pub address_dropoff: Option<String>,
    pub flight: Option<String>,
    pub airline: Option<String>,
    pub pickup_time: Option<String>,
    pub pickup_date: Option<String>,
}

impl BookingSlots {
    pub fn for_service(service: ServiceType, route: Route) -> Self {
        Self { service: Some(service), route: Some(route), ..Self::default() }
    }

    /// Drops the collected answers but keeps the trip choice made at the start.
    pub fn restart(&mut self) {
        *self = Self {
            service: self.service,
            route: self.route,
            vehicle: self.vehicle,
            ..Self::default()
        };
    }

    /// Builds the record to persist; `None` until every required slot is filled.
    pub fn to_trip(&self, total_cost: i64) -> Option<TripDetails> {
        Some(TripDetails {
            name: self.name.clone()?,
            service: self.service?,
            route: self.route?,
            passengers: self.passengers?,
            phone: self.phone.clone()?,
            address_pickup: self.address_pickup.clone()?,
            address_dropoff: self.address_dropoff.clone(),
            flight: self.flight.clone(),
            airline: self.airline.clone(),
            pickup_time: self.pickup_time.clone()?,
            pickup_date: self.pickup_date.clone()?,
            vehicle: self.vehicle,
            rental_hours: self.rental_hours,
            total_cost,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub step: Option<DialogueStep>,
    pub slots: BookingSlots,
    pub error_count: u32,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            step: None,
            slots: BookingSlots::default(),
            error_count: 0,
            created_at: now,
            last_seen_at: now,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.step.is_none()
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.last_seen_at > ttl
    }

    pub fn reset(&mut self) {
        self.step = None;
        self.slots = BookingSlots::default();
        self.error_count = 0;
    }
}
