//! Stripe checkout-session creation.
//!
//! Implements the [`CheckoutProvider`] port with a form-encoded POST to
//! `/v1/checkout/sessions`. The domain user id travels as
//! `client_reference_id` so the completion webhook can be attributed.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::ports::{CheckoutError, CheckoutLink, CheckoutProvider, CheckoutRequest};

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Stripe implementation of the checkout port.
pub struct StripeCheckoutAdapter {
    api_key: SecretString,
    api_base_url: String,
    client: reqwest::Client,
}

impl StripeCheckoutAdapter {
    /// Adapter against the public Stripe API.
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Overrides the API base URL (for testing against a stub server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Subset of the checkout-session response this core consumes.
#[derive(Debug, Deserialize)]
struct CheckoutSessionResponse {
    url: String,
}

#[async_trait]
impl CheckoutProvider for StripeCheckoutAdapter {
    async fn create_checkout_link(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutLink, CheckoutError> {
        let user_ref = request.user_id.to_string();
        let params = [
            ("mode", "subscription"),
            ("line_items[0][price]", request.price_ref.as_str()),
            ("line_items[0][quantity]", "1"),
            ("success_url", request.success_url.as_str()),
            ("cancel_url", request.cancel_url.as_str()),
            ("client_reference_id", user_ref.as_str()),
            ("allow_promotion_codes", "true"),
        ];

        let response = self
            .client
            .post(format!("{}/v1/checkout/sessions", self.api_base_url))
            .bearer_auth(self.api_key.expose_secret())
            .form(&params)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "checkout session creation rejected");
            return Err(CheckoutError::Provider(format!("{status}: {body}")));
        }

        let session: CheckoutSessionResponse = response
            .json()
            .await
            .map_err(|e| CheckoutError::Provider(format!("unreadable response: {e}")))?;

        Ok(CheckoutLink { url: session.url })
    }
}
