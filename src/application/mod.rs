//! Application layer: command routing and reply building.

mod content;
mod replies;
mod router;

pub use router::{CheckoutSettings, Command, CommandRouter, Inbound, DEMO_CALLBACK};
