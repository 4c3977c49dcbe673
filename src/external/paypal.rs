use crate::config::PayPalConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct CaptureResponse {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub purchase_units: Vec<CapturePurchaseUnit>,
}

#[derive(Debug, Deserialize)]
pub struct CapturePurchaseUnit {
    pub payments: Option<CapturePayments>,
}

#[derive(Debug, Deserialize)]
pub struct CapturePayments {
    #[serde(default)]
    pub captures: Vec<Capture>,
}

#[derive(Debug, Deserialize)]
pub struct Capture {
    pub id: String,
    pub status: String,
}

/// Flattened capture outcome handed to the settlement engine.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub capture_id: Option<String>,
    pub status: String,
}

/// One order line, one bird.
#[derive(Debug, Clone)]
pub struct OrderLineItem {
    pub name: String,
    pub amount_cents: i64,
}

#[derive(Clone)]
pub struct PayPalService {
    client: Client,
    config: PayPalConfig,
}

impl PayPalService {
    pub fn new(config: PayPalConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    pub async fn get_access_token(&self) -> AppResult<String> {
        let url = format!("{}/v1/oauth2/token", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout())
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if response.status().is_success() {
            let token: AccessTokenResponse = response.json().await?;
            Ok(token.access_token)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(AppError::ExternalServiceError(format!(
                "Failed to obtain gateway access token: {}",
                error_text
            )))
        }
    }

    /// Creates a checkout order for the given total, itemized per bird.
    /// Each call carries a fresh PayPal-Request-Id, so a registration
    /// attempt creates at most one order and is never silently retried.
    pub async fn create_order(
        &self,
        access_token: &str,
        amount_cents: i64,
        items: &[OrderLineItem],
    ) -> AppResult<String> {
        let url = format!("{}/v2/checkout/orders", self.config.base_url);
        let currency = &self.config.currency;

        let item_values: Vec<serde_json::Value> = items
            .iter()
            .map(|item| {
                json!({
                    "name": item.name,
                    "quantity": "1",
                    "unit_amount": {
                        "currency_code": currency,
                        "value": cents_to_amount(item.amount_cents),
                    }
                })
            })
            .collect();

        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "amount": {
                    "currency_code": currency,
                    "value": cents_to_amount(amount_cents),
                    "breakdown": {
                        "item_total": {
                            "currency_code": currency,
                            "value": cents_to_amount(amount_cents),
                        }
                    }
                },
                "items": item_values,
            }],
            "application_context": {
                "return_url": self.config.return_url,
                "cancel_url": self.config.cancel_url,
            }
        });

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout())
            .bearer_auth(access_token)
            .header("PayPal-Request-Id", Uuid::new_v4().to_string())
            .json(&body)
            .send()
            .await?;

        if response.status().is_success() {
            let order: OrderResponse = response.json().await?;
            log::info!("Created gateway order {} ({})", order.id, order.status);
            Ok(order.id)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(AppError::ExternalServiceError(format!(
                "Failed to create gateway order: {}",
                error_text
            )))
        }
    }

    pub async fn capture_order(
        &self,
        access_token: &str,
        order_id: &str,
    ) -> AppResult<CaptureOutcome> {
        let url = format!(
            "{}/v2/checkout/orders/{}/capture",
            self.config.base_url, order_id
        );

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout())
            .bearer_auth(access_token)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        if response.status().is_success() {
            let capture: CaptureResponse = response.json().await?;
            let capture_id = capture
                .purchase_units
                .first()
                .and_then(|pu| pu.payments.as_ref())
                .and_then(|p| p.captures.first())
                .map(|c| c.id.clone());

            Ok(CaptureOutcome {
                capture_id,
                status: capture.status,
            })
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(AppError::ExternalServiceError(format!(
                "Failed to capture gateway order {}: {}",
                order_id, error_text
            )))
        }
    }
}

/// Renders integer cents as a gateway amount string, e.g. 1250 -> "12.50".
pub fn cents_to_amount(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}
