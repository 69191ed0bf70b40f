//! Transaction — the immutable unit of observed payment traffic.

use serde::{Deserialize, Serialize};

/// Terminal outcome of a processed transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Success,
    SoftFail,
    HardFail,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// Payment rail used for a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
    Wallet,
    NetBanking,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Wallet => "wallet",
            PaymentMethod::NetBanking => "net_banking",
        };
        write!(f, "{s}")
    }
}

/// A single payment transaction signal. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub timestamp: i64,
    pub outcome: Outcome,
    #[serde(default)]
    pub error_code: Option<String>,
    pub latency_ms: f64,
    pub retry_count: u32,
    pub payment_method: PaymentMethod,
    pub issuer: String,
    pub merchant_id: String,
    pub amount: f64,
    #[serde(default)]
    pub geography: Option<String>,
}

impl Transaction {
    /// Dimension key for this transaction's issuer, e.g. `"issuer:HDFC"`.
    pub fn issuer_dimension(&self) -> String {
        format!("issuer:{}", self.issuer)
    }

    /// Dimension key for this transaction's payment method, e.g. `"method:upi"`.
    pub fn method_dimension(&self) -> String {
        format!("method:{}", self.payment_method)
    }
}
