use crate::domain::reference;
use crate::error::{PayoutError, Result};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Placeholder shown where a display field has no value.
pub const PLACEHOLDER: &str = "—";

/// A payee with bank details, tracked entirely by this system. No external
/// account is created for it; payouts against it are executed manually.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Recipient {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Account holder name, defaults to `name`.
    pub holder: String,
    /// Uppercased 2-letter country code.
    pub country: String,
    pub bank_name: String,
    // Bank fields: all stored regardless of country; the subset that applies
    // is given by the country's bank format table.
    pub iban: Option<String>,
    pub account_number: Option<String>,
    pub routing_number: Option<String>,
    pub sort_code: Option<String>,
    pub bsb_number: Option<String>,
    pub ifsc: Option<String>,
    pub swift: Option<String>,
    /// Last 4 characters of the IBAN or account number, placeholder if empty.
    pub last4: String,
    pub currency: String,
    pub r#type: String,
    pub status: String,
    /// Unix seconds.
    pub created: i64,
    /// Lifetime minor-unit total transferred to this recipient.
    pub total_paid: i64,
}

/// Input for creating a recipient. Everything beyond name/email/country is
/// optional.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct NewRecipient {
    pub name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub bank_name: Option<String>,
    pub iban: Option<String>,
    pub account_number: Option<String>,
    pub routing_number: Option<String>,
    pub sort_code: Option<String>,
    pub bsb_number: Option<String>,
    pub ifsc: Option<String>,
    pub swift: Option<String>,
    pub currency: Option<String>,
    pub r#type: Option<String>,
    pub holder: Option<String>,
}

impl Recipient {
    /// Builds a recipient from raw input, applying the derivation rules:
    /// `holder` defaults to `name`, `currency` to the country's primary
    /// currency (else usd), `last4` from the IBAN or account number.
    ///
    /// Uniqueness of the email is the ledger's concern, not checked here.
    pub fn create(input: NewRecipient) -> Result<Self> {
        let name = require(input.name, "name")?;
        let email = require(input.email, "email")?;
        let country = require(input.country, "country")?.to_uppercase();

        let last4 = derive_last4(input.iban.as_deref(), input.account_number.as_deref());
        let currency = input
            .currency
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| {
                reference::primary_currency(&country)
                    .unwrap_or("usd")
                    .to_string()
            });

        Ok(Self {
            id: format!("recip_{}", Uuid::new_v4().simple()),
            holder: input.holder.filter(|h| !h.is_empty()).unwrap_or_else(|| name.clone()),
            name,
            email,
            country,
            bank_name: input
                .bank_name
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| PLACEHOLDER.into()),
            iban: non_empty(input.iban),
            account_number: non_empty(input.account_number),
            routing_number: non_empty(input.routing_number),
            sort_code: non_empty(input.sort_code),
            bsb_number: non_empty(input.bsb_number),
            ifsc: non_empty(input.ifsc),
            swift: non_empty(input.swift),
            last4,
            currency,
            r#type: input.r#type.filter(|t| !t.is_empty()).unwrap_or_else(|| "vendor".into()),
            status: "active".into(),
            created: unix_now(),
            total_paid: 0,
        })
    }
}

fn require(value: Option<String>, field: &str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| PayoutError::Validation(format!("{field} is required")))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Strips whitespace and hyphens, then keeps the last 4 characters of the
/// IBAN (preferred) or account number.
fn derive_last4(iban: Option<&str>, account_number: Option<&str>) -> String {
    let raw = iban
        .filter(|s| !s.is_empty())
        .or_else(|| account_number.filter(|s| !s.is_empty()))
        .unwrap_or("");
    let cleaned: Vec<char> = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    if cleaned.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        cleaned[cleaned.len().saturating_sub(4)..].iter().collect()
    }
}

/// Current unix time in whole seconds.
pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> NewRecipient {
        NewRecipient {
            name: Some("Ada Lovelace".into()),
            email: Some("ada@example.com".into()),
            country: Some("gb".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_required_fields() {
        let missing_email = NewRecipient {
            email: None,
            ..base_input()
        };
        assert!(matches!(
            Recipient::create(missing_email),
            Err(PayoutError::Validation(_))
        ));

        let empty_country = NewRecipient {
            country: Some("".into()),
            ..base_input()
        };
        assert!(matches!(
            Recipient::create(empty_country),
            Err(PayoutError::Validation(_))
        ));
    }

    #[test]
    fn test_derivation_defaults() {
        let recipient = Recipient::create(base_input()).unwrap();
        assert_eq!(recipient.country, "GB");
        assert_eq!(recipient.holder, "Ada Lovelace");
        assert_eq!(recipient.bank_name, PLACEHOLDER);
        assert_eq!(recipient.last4, PLACEHOLDER);
        assert_eq!(recipient.currency, "gbp");
        assert_eq!(recipient.r#type, "vendor");
        assert_eq!(recipient.status, "active");
        assert_eq!(recipient.total_paid, 0);
        assert!(recipient.id.starts_with("recip_"));
    }

    #[test]
    fn test_last4_prefers_iban_and_strips_separators() {
        let input = NewRecipient {
            iban: Some("GB29 NWBK 6016-1331 9268 19".into()),
            account_number: Some("00000000".into()),
            ..base_input()
        };
        let recipient = Recipient::create(input).unwrap();
        assert_eq!(recipient.last4, "6819");
    }

    #[test]
    fn test_last4_falls_back_to_account_number() {
        let input = NewRecipient {
            account_number: Some("12345678".into()),
            ..base_input()
        };
        let recipient = Recipient::create(input).unwrap();
        assert_eq!(recipient.last4, "5678");
    }

    #[test]
    fn test_last4_short_value_kept_whole() {
        let input = NewRecipient {
            account_number: Some("42".into()),
            ..base_input()
        };
        let recipient = Recipient::create(input).unwrap();
        assert_eq!(recipient.last4, "42");
    }

    #[test]
    fn test_unknown_country_defaults_to_usd() {
        let input = NewRecipient {
            country: Some("ZZ".into()),
            ..base_input()
        };
        let recipient = Recipient::create(input).unwrap();
        assert_eq!(recipient.currency, "usd");
    }

    #[test]
    fn test_explicit_currency_wins() {
        let input = NewRecipient {
            currency: Some("eur".into()),
            ..base_input()
        };
        let recipient = Recipient::create(input).unwrap();
        assert_eq!(recipient.currency, "eur");
    }
}
