use serde::{Deserialize, Serialize};

use crate::domain::service::{Region, VehicleType};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardTariff {
    pub base: i64,
    pub holiday_base: i64,
    pub per_extra_passenger: i64,
    pub per_extra_address: i64,
    /// Flat per-passenger rate once both counts exceed `bulk_threshold`.
    pub bulk_rate: i64,
    pub bulk_threshold: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharterDropTariff {
    pub avanza: i64,
    pub innova: i64,
    pub hiace: i64,
    pub holiday_avanza: i64,
}

impl CharterDropTariff {
    pub fn flat_price(&self, vehicle: VehicleType) -> i64 {
        match vehicle {
            VehicleType::Avanza => self.avanza,
            VehicleType::Innova => self.innova,
            VehicleType::Hiace => self.hiace,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRate {
    pub malang_surabaya: i64,
    pub outside_east_java: i64,
}

impl HourlyRate {
    pub fn for_region(&self, region: Region) -> i64 {
        match region {
            Region::MalangSurabaya => self.malang_surabaya,
            Region::OutsideEastJava => self.outside_east_java,
        }
    }
}

/// Surcharge for pickups between `start_hour` and `end_hour`, both inclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeBand {
    pub start_hour: u32,
    pub end_hour: u32,
    pub fee: i64,
}

impl OvertimeBand {
    pub fn contains(&self, hour: u32) -> bool {
        self.start_hour <= hour && hour <= self.end_hour
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharterDailyTariff {
    pub avanza: HourlyRate,
    pub innova: HourlyRate,
    pub hiace: HourlyRate,
    pub bonus_threshold_hours: i64,
    pub bonus_hours: i64,
    pub overtime_bands: Vec<OvertimeBand>,
}

impl CharterDailyTariff {
    pub fn hourly_rate(&self, vehicle: VehicleType, region: Region) -> i64 {
        let rate = match vehicle {
            VehicleType::Avanza => &self.avanza,
            VehicleType::Innova => &self.innova,
            VehicleType::Hiace => &self.hiace,
        };
        rate.for_region(region)
    }

    /// Past the threshold the bonus hours come off the excess, so
    /// 10 requested hours bill as 8 + (10 - 8 - 2) = 8.
    pub fn billable_hours(&self, requested: i64) -> i64 {
        if requested > self.bonus_threshold_hours {
            self.bonus_threshold_hours
                + (requested - self.bonus_threshold_hours - self.bonus_hours)
        } else {
            requested
        }
    }

    pub fn overtime_fee(&self, hour: u32) -> i64 {
        self.overtime_bands.iter().find(|band| band.contains(hour)).map_or(0, |band| band.fee)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffTable {
    pub standard: StandardTariff,
    pub charter_drop: CharterDropTariff,
    pub charter_daily: CharterDailyTariff,
    pub default_vehicle: VehicleType,
    pub default_region: Region,
    pub service_fee: i64,
}

impl Default for TariffTable {
    fn default() -> Self {
        Self {
            standard: StandardTariff {
                base: 180_000,
                holiday_base: 200_000,
                per_extra_passenger: 25_000,
                per_extra_address: 25_000,
                bulk_rate: 150_000,
                bulk_threshold: 3,
            },
            charter_drop: CharterDropTariff {
                avanza: 395_000,
                innova: 900_000,
                hiace: 1_900_000,
                holiday_avanza: 450_000,
            },
            charter_daily: CharterDailyTariff {
                avanza: HourlyRate { malang_surabaya: 650_000, outside_east_java: 750_000 },
                innova: HourlyRate { malang_surabaya: 1_000_000, outside_east_java: 1_100_000 },
                hiace: HourlyRate { malang_surabaya: 1_500_000, outside_east_java: 1_600_000 },
                bonus_threshold_hours: 8,
                bonus_hours: 2,
                overtime_bands: vec![
                    OvertimeBand { start_hour: 18, end_hour: 19, fee: 50_000 },
                    OvertimeBand { start_hour: 20, end_hour: 21, fee: 100_000 },
                    OvertimeBand { start_hour: 22, end_hour: 23, fee: 150_000 },
                ],
            },
            default_vehicle: VehicleType::Avanza,
            default_region: Region::MalangSurabaya,
            service_fee: 10_000,
        }
    }
}
