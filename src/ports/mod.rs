//! Ports: contracts between the domain and its adapters.

mod chat;
mod checkout;
mod user_store;

pub use chat::{Button, ChatError, ChatSender, OutgoingMessage};
pub use checkout::{CheckoutError, CheckoutLink, CheckoutProvider, CheckoutRequest};
pub use user_store::{StoreError, UserStore};
