use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use antar_core::domain::booking::{Booking, BookingCode, TripDetails};
use antar_core::domain::session::Session;

use super::{
    RepositoryError, ReservationReport, ReservationRepository, SessionStore, CODE_ATTEMPTS,
};

#[derive(Default)]
pub struct InMemoryReservationRepository {
    bookings: RwLock<HashMap<String, Booking>>,
}

#[async_trait::async_trait]
impl ReservationRepository for InMemoryReservationRepository {
    async fn insert(&self, trip: TripDetails) -> Result<BookingCode, RepositoryError> {
        let mut bookings = self.bookings.write().await;
        for _ in 0..CODE_ATTEMPTS {
            let code = BookingCode::generate();
            if bookings.contains_key(code.as_str()) {
                continue;
            }
            let booking = Booking::pending(code.clone(), trip, Utc::now());
            bookings.insert(code.0.clone(), booking);
            return Ok(code);
        }
        Err(RepositoryError::CodeExhausted { attempts: CODE_ATTEMPTS })
    }

    async fn save(&self, booking: Booking) -> Result<(), RepositoryError> {
        let mut bookings = self.bookings.write().await;
        bookings.insert(booking.code.0.clone(), booking);
        Ok(())
    }

    async fn find_by_code(&self, code: &BookingCode) -> Result<Option<Booking>, RepositoryError> {
        let bookings = self.bookings.read().await;
        Ok(bookings.get(code.as_str()).cloned())
    }

    async fn list(&self) -> Result<Vec<Booking>, RepositoryError> {
        let bookings = self.bookings.read().await;
        let mut listed: Vec<Booking> = bookings.values().cloned().collect();
        listed.sort_by(|a, b| {
            a.created_at.cmp(&b.created_at).then_with(|| a.code.0.cmp(&b.code.0))
        });
        Ok(listed)
    }

    async fn report(&self) -> Result<ReservationReport, RepositoryError> {
        let listed = self.list().await?;
        Ok(ReservationReport::from_bookings(&listed))
    }
}

pub struct InMemorySessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, sessions: RwLock::new(HashMap::new()) }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Session, RepositoryError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(user_id) {
            Some(session) if !session.is_expired(now, self.ttl) => Ok(session.clone()),
            _ => {
                let session = Session::new(user_id, now);
                sessions.insert(user_id.to_string(), session.clone());
                Ok(session)
            }
        }
    }

    async fn update(&self, session: Session) -> Result<(), RepositoryError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.user_id.clone(), session);
        Ok(())
    }

    async fn expire(&self, now: DateTime<Utc>) -> Result<usize, RepositoryError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, self.ttl));
        Ok(before - sessions.len())
    }
}
