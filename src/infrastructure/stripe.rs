use crate::error::{PayoutError, Result};
use serde::{Deserialize, Serialize};

const STRIPE_API_URL: &str = "https://api.stripe.com";

/// One available-balance bucket on the platform account.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AvailableBalance {
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
}

impl Default for AvailableBalance {
    fn default() -> Self {
        Self {
            amount: 0,
            currency: "usd".into(),
        }
    }
}

#[derive(Deserialize)]
struct BalanceResponse {
    #[serde(default)]
    available: Vec<AvailableBalance>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Read-only probe of the external platform's balance.
///
/// This is the only integration with the payments platform; its failure never
/// touches ledger state. Missing credentials and an unreachable platform are
/// distinct errors so callers can tell them apart.
pub struct BalanceProbe {
    client: reqwest::Client,
    api_url: String,
    secret_key: Option<String>,
}

impl BalanceProbe {
    pub fn new(secret_key: Option<String>) -> Self {
        Self::with_api_url(STRIPE_API_URL, secret_key)
    }

    /// Injectable endpoint for tests.
    pub fn with_api_url(api_url: impl Into<String>, secret_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            secret_key,
        }
    }

    /// Fetches the first available currency bucket, or a zero-usd default
    /// when the account has none.
    pub async fn probe(&self) -> Result<AvailableBalance> {
        let key = self
            .secret_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| PayoutError::Unauthorized("no platform secret key configured".into()))?;

        let response = self
            .client
            .get(format!("{}/v1/balance", self.api_url))
            .bearer_auth(key)
            .send()
            .await
            .map_err(|e| PayoutError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|b| b.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            return Err(PayoutError::Unauthorized(message));
        }
        if !status.is_success() {
            return Err(PayoutError::Unreachable(format!("HTTP {status}")));
        }

        let balance: BalanceResponse = response
            .json()
            .await
            .map_err(|e| PayoutError::Unreachable(format!("balance response: {e}")))?;
        Ok(balance.available.into_iter().next().unwrap_or_default())
    }
}
