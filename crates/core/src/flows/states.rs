use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceType;
use crate::errors::DomainError;

pub const DEFAULT_ERROR_THRESHOLD: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueStep {
    VehicleType,
    Name,
    Passengers,
    Phone,
    AddressPickup,
    RentalHours,
    AddressDropoff,
    Flight,
    Airline,
    PickupTime,
    PickupDate,
    Summary,
    NextAction,
    CheckReservation,
}

impl DialogueStep {
    pub const ALL: [DialogueStep; 14] = [
        Self::VehicleType,
        Self::Name,
        Self::Passengers,
        Self::Phone,
        Self::AddressPickup,
        Self::RentalHours,
        Self::AddressDropoff,
        Self::Flight,
        Self::Airline,
        Self::PickupTime,
        Self::PickupDate,
        Self::Summary,
        Self::NextAction,
        Self::CheckReservation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VehicleType => "vehicle_type",
            Self::Name => "name",
            Self::Passengers => "passengers",
            Self::Phone => "phone",
            Self::AddressPickup => "address_pickup",
            Self::RentalHours => "rental_hours",
            Self::AddressDropoff => "address_dropoff",
            Self::Flight => "flight",
            Self::Airline => "airline",
            Self::PickupTime => "pickup_time",
            Self::PickupDate => "pickup_date",
            Self::Summary => "summary",
            Self::NextAction => "next_action",
            Self::CheckReservation => "check_reservation",
        }
    }

    /// Command steps react to keywords instead of filling a slot.
    pub fn is_command(&self) -> bool {
        matches!(self, Self::Summary | Self::NextAction | Self::CheckReservation)
    }

    pub fn definition(&self) -> StepDefinition {
        use crate::flows::prompts as text;

        let (prompt, invalid_prompt) = match self {
            Self::VehicleType => (text::ASK_VEHICLE, text::INVALID_VEHICLE),
            Self::Name => (text::ASK_NAME, text::INVALID_NAME),
            Self::Passengers => (text::ASK_PASSENGERS, text::INVALID_PASSENGERS),
            Self::Phone => (text::ASK_PHONE, text::INVALID_PHONE),
            Self::AddressPickup => (text::ASK_ADDRESS_PICKUP, text::INVALID_ADDRESS_PICKUP),
            Self::RentalHours => (text::ASK_RENTAL_HOURS, text::INVALID_RENTAL_HOURS),
            // Optional slots accept anything, so there is no separate retry text.
            Self::AddressDropoff => (text::ASK_ADDRESS_DROPOFF, text::ASK_ADDRESS_DROPOFF),
            Self::Flight => (text::ASK_FLIGHT, text::ASK_FLIGHT),
            Self::Airline => (text::ASK_AIRLINE, text::ASK_AIRLINE),
            Self::PickupTime => (text::ASK_PICKUP_TIME, text::INVALID_PICKUP_TIME),
            Self::PickupDate => (text::ASK_PICKUP_DATE, text::INVALID_PICKUP_DATE),
            Self::Summary => (text::SUMMARY_COMMANDS, text::SUMMARY_COMMANDS),
            Self::NextAction => (text::NEXT_ACTION_COMMANDS, text::NEXT_ACTION_COMMANDS),
            Self::CheckReservation => (text::ASK_BOOKING_CODE, text::INVALID_BOOKING_CODE),
        };
        StepDefinition { prompt, invalid_prompt }
    }
}

impl FromStr for DialogueStep {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let label = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|step| step.as_str() == label)
            .ok_or_else(|| DomainError::UnknownValue { field: "step", value: value.to_string() })
    }
}

/// Static description of one dialogue step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepDefinition {
    /// May contain a `{service}` placeholder, see [`StepDefinition::render_prompt`].
    pub prompt: &'static str,
    pub invalid_prompt: &'static str,
}

impl StepDefinition {
    pub fn render_prompt(&self, service: Option<ServiceType>) -> String {
        let service = service.unwrap_or(ServiceType::Standard);
        self.prompt.replace("{service}", service.display_name())
    }
}

/// First step after a booking intent names its service.
pub fn first_step(service: ServiceType) -> DialogueStep {
    if service.is_charter() {
        DialogueStep::VehicleType
    } else {
        DialogueStep::Name
    }
}

/// Linear successor of a slot step. Command steps have none; their moves
/// depend on the command typed.
pub fn next_step(step: DialogueStep, service: ServiceType) -> Option<DialogueStep> {
    use DialogueStep::*;

    let next = match step {
        VehicleType => Name,
        Name => Passengers,
        Passengers => Phone,
        Phone => AddressPickup,
        AddressPickup if service == ServiceType::CharterDaily => RentalHours,
        AddressPickup => AddressDropoff,
        RentalHours => PickupTime,
        AddressDropoff => Flight,
        Flight => Airline,
        Airline => PickupTime,
        PickupTime => PickupDate,
        PickupDate => Summary,
        Summary | NextAction | CheckReservation => return None,
    };
    Some(next)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorBudget {
    /// Abandon once the consecutive error count exceeds the bound.
    Bounded(u32),
    Unbounded,
}

impl ErrorBudget {
    pub fn is_exhausted(&self, error_count: u32) -> bool {
        match self {
            Self::Bounded(threshold) => error_count > *threshold,
            Self::Unbounded => false,
        }
    }
}

/// Error budget of every dialogue step. Slot steps start bounded by one
/// shared threshold and command steps start unbounded; any step can be
/// overridden with [`ErrorPolicy::with_budget`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorPolicy {
    budgets: HashMap<DialogueStep, ErrorBudget>,
}

impl ErrorPolicy {
    pub fn new(threshold: u32) -> Self {
        let budgets = DialogueStep::ALL
            .into_iter()
            .map(|step| {
                let budget = if step.is_command() {
                    ErrorBudget::Unbounded
                } else {
                    ErrorBudget::Bounded(threshold)
                };
                (step, budget)
            })
            .collect();
        Self { budgets }
    }

    pub fn with_budget(mut self, step: DialogueStep, budget: ErrorBudget) -> Self {
        self.budgets.insert(step, budget);
        self
    }

    pub fn budget_for(&self, step: DialogueStep) -> ErrorBudget {
        self.budgets.get(&step).copied().unwrap_or(ErrorBudget::Unbounded)
    }
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_THRESHOLD)
    }
}
