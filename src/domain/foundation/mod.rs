//! Shared value objects used across the domain.

mod ids;
mod timestamp;

pub use ids::{CustomerRef, UserId};
pub use timestamp::Timestamp;
