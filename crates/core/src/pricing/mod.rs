pub mod tariff;

use serde::{Deserialize, Serialize};

use crate::domain::service::{Route, ServiceType, VehicleType};

pub use tariff::{
    CharterDailyTariff, CharterDropTariff, HourlyRate, OvertimeBand, StandardTariff, TariffTable,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceRequest<'a> {
    pub service: ServiceType,
    pub route: Route,
    pub passengers: u32,
    pub addresses: u32,
    pub vehicle: Option<VehicleType>,
    pub rental_hours: u32,
    pub pickup_time: Option<&'a str>,
    pub is_holiday: bool,
}

impl<'a> PriceRequest<'a> {
    pub fn new(service: ServiceType, route: Route, passengers: u32) -> Self {
        Self {
            service,
            route,
            passengers,
            addresses: 1,
            vehicle: None,
            rental_hours: 0,
            pickup_time: None,
            is_holiday: false,
        }
    }

    pub fn with_addresses(mut self, addresses: u32) -> Self {
        self.addresses = addresses;
        self
    }

    pub fn with_vehicle(mut self, vehicle: Option<VehicleType>) -> Self {
        self.vehicle = vehicle;
        self
    }

    pub fn with_rental_hours(mut self, rental_hours: u32) -> Self {
        self.rental_hours = rental_hours;
        self
    }

    pub fn with_pickup_time(mut self, pickup_time: Option<&'a str>) -> Self {
        self.pickup_time = pickup_time;
        self
    }

    pub fn on_holiday(mut self, is_holiday: bool) -> Self {
        self.is_holiday = is_holiday;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub base_price: i64,
    pub service_fee: i64,
    pub total_price: i64,
}

impl TariffTable {
    pub fn price(&self, request: &PriceRequest<'_>) -> i64 {
        match request.service {
            ServiceType::Standard => self.standard_price(request),
            ServiceType::CharterDrop => self.charter_drop_price(request),
            ServiceType::CharterDaily => self.charter_daily_price(request),
        }
    }

    pub fn cost(&self, request: &PriceRequest<'_>) -> CostBreakdown {
        let base_price = self.price(request);
        CostBreakdown {
            base_price,
            service_fee: self.service_fee,
            total_price: base_price + self.service_fee,
        }
    }

    fn standard_price(&self, request: &PriceRequest<'_>) -> i64 {
        let tariff = &self.standard;
        let passengers = i64::from(request.passengers);
        let addresses = i64::from(request.addresses);

        if request.passengers > tariff.bulk_threshold && request.addresses > tariff.bulk_threshold
        {
            return tariff.bulk_rate * passengers;
        }

        let mut price = if request.is_holiday { tariff.holiday_base } else { tariff.base };
        if passengers > 1 {
            price += tariff.per_extra_passenger * (passengers - 1);
        }
        if addresses > 1 {
            price += tariff.per_extra_address * (addresses - 1);
        }
        price
    }

    fn charter_drop_price(&self, request: &PriceRequest<'_>) -> i64 {
        let vehicle = request.vehicle.unwrap_or(self.default_vehicle);
        if request.is_holiday && vehicle == VehicleType::Avanza {
            return self.charter_drop.holiday_avanza;
        }
        self.charter_drop.flat_price(vehicle)
    }

    fn charter_daily_price(&self, request: &PriceRequest<'_>) -> i64 {
        let tariff = &self.charter_daily;
        let vehicle = request.vehicle.unwrap_or(self.default_vehicle);
        let rate = tariff.hourly_rate(vehicle, self.default_region);
        let billable = tariff.billable_hours(i64::from(request.rental_hours));

        let overtime =
            request.pickup_time.and_then(pickup_hour).map_or(0, |hour| tariff.overtime_fee(hour));
        rate * billable + overtime
    }
}

/// Hour-of-day of an `HH:MM` string; anything unparseable yields `None`.
fn pickup_hour(pickup_time: &str) -> Option<u32> {
    pickup_time.split(':').next()?.trim().parse().ok()
}
