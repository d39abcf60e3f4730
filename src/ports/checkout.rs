//! Checkout provider port for the external payment processor.
//!
//! The only outbound payment call this core makes: create a hosted
//! checkout session and hand the resulting URL to the user. The URL is
//! consumed as-is, never validated.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::UserId;

/// Request to create a hosted checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Domain user starting the checkout; carried as the processor's
    /// client reference so the completion event can be attributed.
    pub user_id: UserId,

    /// Processor price identifier for the subscription plan.
    pub price_ref: String,

    /// Redirect after successful payment.
    pub success_url: String,

    /// Redirect after abandoned payment.
    pub cancel_url: String,
}

/// Hosted checkout session, completed by the user out-of-band.
#[derive(Debug, Clone)]
pub struct CheckoutLink {
    /// URL the user follows to pay.
    pub url: String,
}

/// Errors from checkout-session creation.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Could not reach the processor.
    #[error("payment provider unreachable: {0}")]
    Network(String),

    /// The processor rejected the request.
    #[error("payment provider error: {0}")]
    Provider(String),
}

/// Port for creating checkout sessions with the payment processor.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Creates a checkout session and returns its URL.
    async fn create_checkout_link(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutLink, CheckoutError>;
}
