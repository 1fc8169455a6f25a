use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::account::LoanAccount;
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::loan::Loan;
use crate::types::AmortizationMethod;

/// account configuration, typically loaded from json
///
/// ```json
/// {
///   "principal": "10000.00",
///   "annual_rate_percent": "5",
///   "term_months": 24,
///   "method": "equal-monthly-payments",
///   "start_date": "2024-01-15"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub principal: Money,
    pub annual_rate_percent: Decimal,
    pub term_months: u32,
    #[serde(default)]
    pub method: AmortizationMethod,
    pub start_date: NaiveDate,
}

impl AccountConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// validated loan terms
    pub fn loan(&self) -> Result<Loan> {
        Loan::new(
            self.principal,
            Rate::from_percentage(self.annual_rate_percent),
            self.term_months,
        )
    }

    /// check the terms without opening an account
    pub fn validate(&self) -> Result<()> {
        self.loan().map(|_| ()).map_err(|e| LoanError::InvalidConfiguration {
            message: e.to_string(),
        })
    }

    pub fn open_account(&self) -> Result<LoanAccount> {
        LoanAccount::open(self.loan()?, self.method, self.start_date)
    }
}
