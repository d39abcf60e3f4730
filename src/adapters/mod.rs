//! Adapters: concrete implementations of the ports against PostgreSQL,
//! Stripe, Telegram and HTTP.

pub mod http;
pub mod store;
pub mod stripe;
pub mod telegram;
