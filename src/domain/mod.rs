//! Domain layer: entitlement reconciliation and the guided diagnostic.

pub mod diagnostic;
pub mod entitlement;
pub mod foundation;
pub mod user;
