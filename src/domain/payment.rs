use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::client::ClientInfo;
use crate::domain::common::{is_filled, is_filled_opt};

/// Banks offered for corporate account transfers.
pub const BANKS: [&str; 10] = [
    "Banco de la Nación Argentina",
    "Banco Santander",
    "Banco Galicia",
    "Banco BBVA",
    "Banco Macro",
    "Banco HSBC",
    "Banco Credicoop",
    "Banco Ciudad",
    "Banco Provincia",
    "Otro",
];

/// Daily late-payment surcharge, in basis points (1.5%).
pub const DAILY_PENALTY_BPS: u64 = 150;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CorporateAccount,
    CreditCard,
    DebitCard,
    Wallet,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::CorporateAccount,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Wallet,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::CorporateAccount => "Corporate account",
            PaymentMethod::CreditCard => "Credit card",
            PaymentMethod::DebitCard => "Debit card",
            PaymentMethod::Wallet => "Wallet",
        }
    }

    /// Parses `corporate`, `credit`, `debit`, `wallet` and the variant names.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "corporate" | "corporate_account" | "account" => Some(PaymentMethod::CorporateAccount),
            "credit" | "credit_card" => Some(PaymentMethod::CreditCard),
            "debit" | "debit_card" => Some(PaymentMethod::DebitCard),
            "wallet" => Some(PaymentMethod::Wallet),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Deferred payment against the company's current account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorporateAccountPayment {
    pub holder: String,
    pub bank: String,
    pub account_number: String,
    /// National bank code (CBU).
    pub bank_code: String,
    /// Sum of the per-vehicle service prices, kept in sync by the wizard.
    pub total: u64,
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub reference: String,
    /// Name of the attached proof-of-payment file.
    #[serde(default)]
    pub proof_of_payment: Option<String>,
}

impl CorporateAccountPayment {
    /// Blank sub-record with holder and tax id taken from the client.
    pub fn for_client(client: &ClientInfo) -> Self {
        let tax_id = match client.document_type {
            Some(kind) if kind.is_company() => client.document_number.clone(),
            _ => String::new(),
        };
        Self {
            holder: client.display_name().to_string(),
            tax_id,
            ..Self::default()
        }
    }

    pub fn has_proof_of_payment(&self) -> bool {
        is_filled_opt(self.proof_of_payment.as_deref())
    }

    /// Names of the required fields still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !is_filled(&self.bank) {
            missing.push("bank");
        }
        if !is_filled(&self.account_number) {
            missing.push("account_number");
        }
        if !is_filled(&self.bank_code) {
            missing.push("bank_code");
        }
        if self.due_date.is_none() {
            missing.push("due_date");
        }
        if !self.has_proof_of_payment() {
            missing.push("proof_of_payment");
        }
        missing
    }

    /// Surcharge owed when paying `days_late` days after the due date.
    pub fn late_penalty(&self, days_late: u32) -> u64 {
        self.total * DAILY_PENALTY_BPS * u64::from(days_late) / 10_000
    }
}
