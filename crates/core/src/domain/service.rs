use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// Shared shuttle, priced per passenger and per address.
    Standard,
    CharterDrop,
    CharterDaily,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "reguler",
            Self::CharterDrop => "charter_drop",
            Self::CharterDaily => "charter_harian",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Standard => "Reguler",
            Self::CharterDrop => "Charter Drop",
            Self::CharterDaily => "Charter Harian",
        }
    }

    pub fn is_charter(&self) -> bool {
        matches!(self, Self::CharterDrop | Self::CharterDaily)
    }

    /// Maps a spoken label, including the known typo spellings, to a service.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "reguler" | "regulerr" => Some(Self::Standard),
            "charter drop" | "charter dropp" | "charter_drop" => Some(Self::CharterDrop),
            "charter harian" | "charter hariann" | "charter_harian" => Some(Self::CharterDaily),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_label(value)
            .ok_or_else(|| DomainError::UnknownValue { field: "service", value: value.to_string() })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    #[serde(rename = "malang-juanda")]
    MalangJuanda,
    #[serde(rename = "juanda-malang")]
    JuandaMalang,
    #[serde(rename = "malang-surabaya")]
    MalangSurabaya,
    #[serde(rename = "surabaya-malang")]
    SurabayaMalang,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalangJuanda => "malang-juanda",
            Self::JuandaMalang => "juanda-malang",
            Self::MalangSurabaya => "malang-surabaya",
            Self::SurabayaMalang => "surabaya-malang",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MalangJuanda => "Malang-Juanda",
            Self::JuandaMalang => "Juanda-Malang",
            Self::MalangSurabaya => "Malang-Surabaya",
            Self::SurabayaMalang => "Surabaya-Malang",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "malang-juanda" | "malang-juandaa" => Some(Self::MalangJuanda),
            "juanda-malang" | "juanda-malangg" => Some(Self::JuandaMalang),
            "malang-surabaya" => Some(Self::MalangSurabaya),
            "surabaya-malang" => Some(Self::SurabayaMalang),
            _ => None,
        }
    }

    /// Origin and destination halves, split on the first `-`.
    pub fn endpoints(&self) -> (&'static str, &'static str) {
        let label = self.as_str();
        label.split_once('-').unwrap_or((label, ""))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_label(value)
            .ok_or_else(|| DomainError::UnknownValue { field: "route", value: value.to_string() })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Avanza,
    Innova,
    Hiace,
}

impl VehicleType {
    pub const ALL: [VehicleType; 3] = [Self::Avanza, Self::Innova, Self::Hiace];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Avanza => "avanza",
            Self::Innova => "innova",
            Self::Hiace => "hiace",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Avanza => "Avanza",
            Self::Innova => "Innova",
            Self::Hiace => "Hiace",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        Self::ALL.into_iter().find(|vehicle| label.contains(vehicle.as_str()))
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_label(value)
            .ok_or_else(|| DomainError::UnknownValue { field: "vehicle", value: value.to_string() })
    }
}

/// Tariff region for daily charters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[default]
    #[serde(rename = "malang-sby")]
    MalangSurabaya,
    #[serde(rename = "luar_jatim")]
    OutsideEastJava,
}
