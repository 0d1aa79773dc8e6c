use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// One invoice line. `unit_price` is in minor currency units.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LineItem {
    pub description: String,
    pub quantity: i64,
    pub unit_price: i64,
}

impl LineItem {
    pub fn line_total(&self) -> i64 {
        self.quantity * self.unit_price
    }
}

/// Biller or billee identity on an invoice.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Party {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
}

/// A fully resolved invoice, ready for rendering. Independent of transfer
/// creation, but may reference a transfer id for display.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Invoice {
    pub invoice_number: Option<String>,
    pub transfer_id: Option<String>,
    /// Unix seconds.
    pub issued_date: i64,
    pub due_date: Option<i64>,
    pub sender: Party,
    pub recipient: Party,
    pub items: Vec<LineItem>,
    pub currency: String,
    /// Percentage, e.g. 5 or 7.5.
    pub tax_rate: Decimal,
    pub notes: Option<String>,
}

impl Invoice {
    pub fn subtotal(&self) -> i64 {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// `round(subtotal * tax_rate / 100)`, half-up, in minor units.
    pub fn tax(&self) -> i64 {
        (Decimal::from(self.subtotal()) * self.tax_rate / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(0)
    }

    pub fn total(&self) -> i64 {
        self.subtotal() + self.tax()
    }

    /// Display number: explicit number, else the last 8 characters of the
    /// transfer id uppercased, else a fixed default.
    pub fn number(&self) -> String {
        if let Some(n) = self.invoice_number.as_ref().filter(|n| !n.is_empty()) {
            return n.clone();
        }
        if let Some(id) = self.transfer_id.as_ref().filter(|id| !id.is_empty()) {
            let chars: Vec<char> = id.chars().collect();
            let tail: String = chars[chars.len().saturating_sub(8)..].iter().collect();
            return tail.to_uppercase();
        }
        "INV-001".into()
    }
}

/// Raw invoice request as submitted by the caller.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct InvoiceInput {
    pub transfer_id: Option<String>,
    pub to: Option<String>,
    pub due_date: Option<i64>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub sender: Option<Party>,
    pub recipient: Option<Party>,
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
    pub notes: Option<String>,
    pub currency: Option<String>,
    pub invoice_number: Option<String>,
}
