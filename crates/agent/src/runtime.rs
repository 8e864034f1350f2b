use chrono::Utc;
use tracing::{debug, info, warn};

use antar_core::domain::session::Session;
use antar_core::flows::prompts::STORE_UNAVAILABLE;
use antar_core::flows::{DialogueEngine, StepOutcome};
use antar_db::{ReservationRepository, SessionStore};

use crate::conversation::{canned_reply, Intent, IntentClassifier};

/// Drives one chat turn: loads the session, runs the dialogue or the intent
/// classifier, performs any store I/O the dialogue asks for, and saves the session.
pub struct AgentRuntime<S, R> {
    sessions: S,
    reservations: R,
    engine: DialogueEngine,
    classifier: IntentClassifier,
}

impl<S, R> AgentRuntime<S, R>
where
    S: SessionStore,
    R: ReservationRepository,
{
    pub fn new(sessions: S, reservations: R, engine: DialogueEngine) -> Self {
        Self { sessions, reservations, engine, classifier: IntentClassifier::new() }
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    pub fn reservations(&self) -> &R {
        &self.reservations
    }

    pub fn engine(&self) -> &DialogueEngine {
        &self.engine
    }

    /// Always produces a reply. Store failures are logged and answered with the
    /// generic unavailable text.
    pub async fn handle_message(&self, user_id: &str, message: &str) -> String {
        let message = message.trim();
        let now = Utc::now();
        info!(
            event_name = "chat.turn_received",
            user_id,
            message_chars = message.chars().count(),
            "chat turn received"
        );
        debug!(
            event_name = "chat.turn_content",
            user_id,
            content = message,
            "chat message content"
        );

        let mut session = match self.sessions.get_or_create(user_id, now).await {
            Ok(session) => session,
            Err(error) => {
                warn!(
                    event_name = "store.session_unavailable",
                    user_id,
                    error = %error,
                    "session store unavailable"
                );
                return STORE_UNAVAILABLE.to_string();
            }
        };

        let reply = if session.is_idle() {
            self.on_idle(&mut session, message).await
        } else {
            let outcome = self.engine.advance(&mut session, message);
            self.execute(&mut session, outcome).await
        };

        let step = session.step.map_or("idle", |step| step.as_str());
        session.last_seen_at = now;
        if let Err(error) = self.sessions.update(session).await {
            warn!(
                event_name = "store.session_write_failed",
                user_id,
                error = %error,
                "session state could not be saved"
            );
        }

        info!(event_name = "chat.turn_answered", user_id, step, "chat turn answered");
        reply
    }

    async fn on_idle(&self, session: &mut Session, message: &str) -> String {
        let intent = self.classifier.classify(message);
        debug!(
            event_name = "chat.intent_classified",
            user_id = %session.user_id,
            intent = intent.as_str(),
            "intent classified"
        );

        match intent {
            Intent::Booking { service, route } => {
                self.engine.start_booking(session, service, route)
            }
            Intent::CheckReservation { code: Some(code) } => {
                self.execute(session, StepOutcome::LookupBooking(code)).await
            }
            Intent::CheckReservation { code: None } => self.engine.start_lookup(session),
            other => canned_reply(&other, self.engine.tariffs()),
        }
    }

    async fn execute(&self, session: &mut Session, outcome: StepOutcome) -> String {
        match outcome {
            StepOutcome::Reply(reply) => reply,
            StepOutcome::Abandoned { step, reply } => {
                info!(
                    event_name = "dialogue.abandoned",
                    user_id = %session.user_id,
                    step = step.as_str(),
                    "dialogue abandoned after repeated invalid input"
                );
                reply
            }
            StepOutcome::PersistBooking(trip) => {
                let service = trip.service.as_str();
                let total_cost = trip.total_cost;
                match self.reservations.insert(trip).await {
                    Ok(code) => {
                        info!(
                            event_name = "booking.persisted",
                            user_id = %session.user_id,
                            booking_code = %code,
                            service,
                            total_cost,
                            "booking persisted"
                        );
                        self.engine.booking_persisted(session, &code)
                    }
                    Err(error) => {
                        warn!(
                            event_name = "store.booking_write_failed",
                            user_id = %session.user_id,
                            error = %error,
                            "booking could not be stored"
                        );
                        self.engine.store_unavailable(session)
                    }
                }
            }
            StepOutcome::LookupBooking(code) => {
                match self.reservations.find_by_code(&code).await {
                    Ok(found) => {
                        debug!(
                            event_name = "booking.lookup",
                            booking_code = %code,
                            found = found.is_some(),
                            "booking lookup completed"
                        );
                        self.engine.lookup_completed(session, found.as_ref())
                    }
                    Err(error) => {
                        warn!(
                            event_name = "store.booking_lookup_failed",
                            booking_code = %code,
                            error = %error,
                            "booking lookup failed"
                        );
                        self.engine.store_unavailable(session)
                    }
                }
            }
        }
    }
}
