//! Guided sleep diagnostic: a short-lived, per-user conversation that
//! collects four ordered answers and derives a recommendation.

mod recommendation;
mod registry;
mod session;

pub use recommendation::{assess, ideal_nap_count, NapVerdict, SleepAssessment, WakeVerdict};
pub use registry::SessionRegistry;
pub use session::{DiagnosticAnswers, DiagnosticSession, Stage, StepOutcome};
