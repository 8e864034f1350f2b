use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

use antar_core::domain::session::{BookingSlots, Session};
use antar_core::flows::DialogueStep;

use super::RepositoryError;
use crate::DbPool;

/// Per-user dialogue state keyed by the caller-supplied user id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the live session for `user_id`, replacing a missing or expired one with a fresh
    /// idle session.
    async fn get_or_create(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Session, RepositoryError>;
    async fn update(&self, session: Session) -> Result<(), RepositoryError>;
    /// Drops every session idle for longer than the store's TTL. Returns how many were removed.
    async fn expire(&self, now: DateTime<Utc>) -> Result<usize, RepositoryError>;
}

#[async_trait]
impl<T> SessionStore for Arc<T>
where
    T: SessionStore + ?Sized,
{
    async fn get_or_create(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Session, RepositoryError> {
        (**self).get_or_create(user_id, now).await
    }

    async fn update(&self, session: Session) -> Result<(), RepositoryError> {
        (**self).update(session).await
    }

    async fn expire(&self, now: DateTime<Utc>) -> Result<usize, RepositoryError> {
        (**self).expire(now).await
    }
}

pub(crate) fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("session timestamp `{value}`: {e}")))
}

#[derive(Serialize, Deserialize)]
struct StoredState {
    step: Option<DialogueStep>,
    slots: BookingSlots,
    error_count: u32,
}

pub struct SqlSessionStore {
    pool: DbPool,
    ttl: Duration,
}

impl SqlSessionStore {
    pub fn new(pool: DbPool, ttl: Duration) -> Self {
        Self { pool, ttl }
    }

    async fn load(&self, user_id: &str) -> Result<Option<Session>, RepositoryError> {
        let row = sqlx::query(
            "SELECT user_id, state_json, created_at, last_seen_at
             FROM dialogue_sessions WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let state_json: String =
            row.try_get("state_json").map_err(|e| RepositoryError::Decode(e.to_string()))?;
        let created_at: String =
            row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;
        let last_seen_at: String =
            row.try_get("last_seen_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;
        let state: StoredState = serde_json::from_str(&state_json)
            .map_err(|e| RepositoryError::Decode(format!("session state for {user_id}: {e}")))?;

        Ok(Some(Session {
            user_id: user_id.to_string(),
            step: state.step,
            slots: state.slots,
            error_count: state.error_count,
            created_at: parse_timestamp(&created_at)?,
            last_seen_at: parse_timestamp(&last_seen_at)?,
        }))
    }
}

#[async_trait]
impl SessionStore for SqlSessionStore {
    async fn get_or_create(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Session, RepositoryError> {
        if let Some(session) = self.load(user_id).await? {
            if !session.is_expired(now, self.ttl) {
                return Ok(session);
            }
        }

        let session = Session::new(user_id, now);
        self.update(session.clone()).await?;
        Ok(session)
    }

    async fn update(&self, session: Session) -> Result<(), RepositoryError> {
        let state = StoredState {
            step: session.step,
            slots: session.slots,
            error_count: session.error_count,
        };
        let state_json = serde_json::to_string(&state)
            .map_err(|e| RepositoryError::Decode(format!("session state: {e}")))?;

        sqlx::query(
            "INSERT INTO dialogue_sessions (user_id, state_json, created_at, last_seen_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                state_json = excluded.state_json,
                created_at = excluded.created_at,
                last_seen_at = excluded.last_seen_at",
        )
        .bind(&session.user_id)
        .bind(state_json)
        .bind(timestamp(session.created_at))
        .bind(timestamp(session.last_seen_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn expire(&self, now: DateTime<Utc>) -> Result<usize, RepositoryError> {
        let cutoff = timestamp(now - self.ttl);
        let result = sqlx::query("DELETE FROM dialogue_sessions WHERE last_seen_at < ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() as usize)
    }
}
