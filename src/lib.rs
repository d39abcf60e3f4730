//! Coach Sommeil - Infant-sleep coaching assistant
//!
//! A conversational assistant that answers fixed questions about infant
//! sleep and gates advanced content behind a Stripe subscription. The
//! interesting parts are the subscription-state reconciliation engine
//! and the guided-diagnostic conversation; everything else is static
//! content selection.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
