pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect_with_settings, DbPool};
pub use fixtures::{SampleReservations, SeedResult};
pub use repositories::{
    InMemoryReservationRepository, InMemorySessionStore, RepositoryError, ReservationReport,
    ReservationRepository, SessionStore, SqlReservationRepository, SqlSessionStore,
};
