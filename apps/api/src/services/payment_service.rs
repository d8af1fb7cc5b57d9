//! Payment provider client.
//!
//! Thin client over the provider's OAuth + orders API. Constructed without
//! any database dependency; credentials come from configuration and the
//! service fails at call time when they are absent.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::services::PaymentConfig;

/// Payment provider client.
pub struct PaymentService {
    config: PaymentConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

impl PaymentService {
    /// Create a new payment service.
    pub fn new(config: PaymentConfig) -> Self {
        PaymentService {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Fetches an OAuth access token from the provider.
    pub async fn get_access_token(&self) -> ApiResult<String> {
        let (client_id, client_secret) = self.credentials()?;

        debug!("Requesting payment provider access token");

        let response = self
            .client
            .post(format!("{}/v1/oauth2/token", self.config.base_url))
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| ApiError::Payment(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ApiError::Payment(format!(
                "token request failed with status {}",
                response.status()
            )));
        }

        let token: AccessTokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Payment(e.to_string()))?;

        Ok(token.access_token)
    }

    /// Creates a checkout order with the provider and returns its raw
    /// representation.
    pub async fn create_order(
        &self,
        amount: Decimal,
        currency: &str,
        description: &str,
    ) -> ApiResult<serde_json::Value> {
        let access_token = self.get_access_token().await?;

        let payload = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "amount": {
                    "currency_code": currency,
                    "value": amount.to_string(),
                },
                "description": description,
            }],
        });

        let response = self
            .client
            .post(format!("{}/v2/checkout/orders", self.config.base_url))
            .bearer_auth(access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ApiError::Payment(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ApiError::Payment(format!(
                "order creation failed with status {}",
                response.status()
            )));
        }

        let order: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiError::Payment(e.to_string()))?;

        info!(
            order_id = %order.get("id").and_then(|v| v.as_str()).unwrap_or("?"),
            "Payment order created"
        );

        Ok(order)
    }

    fn credentials(&self) -> ApiResult<(&str, &str)> {
        match (
            self.config.client_id.as_deref(),
            self.config.client_secret.as_deref(),
        ) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(ApiError::Payment(
                "payment provider credentials are not configured".to_string(),
            )),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn service(client_id: Option<&str>, client_secret: Option<&str>) -> PaymentService {
        PaymentService::new(PaymentConfig {
            base_url: "https://api-m.sandbox.paypal.com".to_string(),
            client_id: client_id.map(str::to_string),
            client_secret: client_secret.map(str::to_string),
        })
    }

    #[test]
    fn test_missing_credentials_fail_at_call_time() {
        assert!(service(None, None).credentials().is_err());
        assert!(service(Some("id"), None).credentials().is_err());
        assert!(service(Some("id"), Some("secret")).credentials().is_ok());
    }
}
