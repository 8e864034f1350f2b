pub mod engine;
pub mod prompts;
pub mod states;

pub use engine::{summary_price_request, DialogueEngine, StepOutcome};
pub use states::{first_step, next_step, DialogueStep, ErrorBudget, ErrorPolicy, StepDefinition};
