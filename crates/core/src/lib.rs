pub mod config;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod normalize;
pub mod pricing;

pub use domain::booking::{Booking, BookingCode, BookingStatus, TripDetails};
pub use domain::service::{Region, Route, ServiceType, VehicleType};
pub use domain::session::{BookingSlots, Session};
pub use errors::{DomainError, ReportError, ReportFailure};
pub use flows::{DialogueEngine, DialogueStep, ErrorBudget, ErrorPolicy, StepOutcome};
pub use pricing::{CostBreakdown, PriceRequest, TariffTable};
