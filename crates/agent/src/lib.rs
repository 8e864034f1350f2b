//! Chat agent for shuttle bookings.
//!
//! Each turn goes through [`runtime::AgentRuntime`]:
//! 1. **Session** - the user's dialogue state is loaded from a `SessionStore`
//! 2. **Routing** - an active step goes to the `DialogueEngine`, an idle session to the
//!    keyword [`conversation::IntentClassifier`]
//! 3. **Store I/O** - bookings are persisted or looked up when the engine asks for it
//! 4. **Reply** - the Indonesian response text is returned and the session saved
//!
//! Prices always come from the core tariff table; nothing here computes one.

pub mod conversation;
pub mod runtime;

pub use conversation::{Intent, IntentClassifier};
pub use runtime::AgentRuntime;
