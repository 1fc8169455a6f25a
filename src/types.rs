use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::decimal::Money;

/// unique identifier for a loan account
pub type AccountId = Uuid;

/// amortization method used to build a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AmortizationMethod {
    /// annuity: equal payment amounts throughout term
    #[default]
    EqualMonthlyPayments,
    /// equal principal installments, interest on the original principal
    EqualInterest,
}

impl AmortizationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AmortizationMethod::EqualMonthlyPayments => "equal-monthly-payments",
            AmortizationMethod::EqualInterest => "equal-interest",
        }
    }
}

impl fmt::Display for AmortizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmortizationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "equal-monthly-payments" | "emp" | "annuity" => Ok(AmortizationMethod::EqualMonthlyPayments),
            "equal-interest" | "ei" => Ok(AmortizationMethod::EqualInterest),
            other => Err(format!("unknown amortization method: {}", other)),
        }
    }
}

/// account repayment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    /// installments still outstanding
    Active,
    /// cursor has reached the end of the schedule
    Repaid,
}

/// what a single repayment did to the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepaymentOutcome {
    /// repayment dated before the installment due date; nothing changed
    EarlyRepaymentIgnored {
        month: u32,
        due_date: chrono::NaiveDate,
    },
    /// installment settled and cursor advanced; excess is not credited
    InstallmentPaid {
        month: u32,
        amount_due: Money,
        excess: Money,
    },
    /// amount fell short; remaining schedule regenerated
    PartialRepayment {
        month: u32,
        amount_due: Money,
        shortfall: Money,
        regenerated: usize,
    },
}

impl RepaymentOutcome {
    /// schedule month the repayment was evaluated against
    pub fn month(&self) -> u32 {
        match self {
            RepaymentOutcome::EarlyRepaymentIgnored { month, .. }
            | RepaymentOutcome::InstallmentPaid { month, .. }
            | RepaymentOutcome::PartialRepayment { month, .. } => *month,
        }
    }

    pub fn advanced(&self) -> bool {
        matches!(self, RepaymentOutcome::InstallmentPaid { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!(
            "equal-monthly-payments".parse::<AmortizationMethod>().unwrap(),
            AmortizationMethod::EqualMonthlyPayments
        );
        assert_eq!(
            "Equal_Interest".parse::<AmortizationMethod>().unwrap(),
            AmortizationMethod::EqualInterest
        );
        assert!("balloon".parse::<AmortizationMethod>().is_err());
    }

    #[test]
    fn test_method_serde_kebab_case() {
        let json = serde_json::to_string(&AmortizationMethod::EqualInterest).unwrap();
        assert_eq!(json, "\"equal-interest\"");
        let back: AmortizationMethod = serde_json::from_str("\"equal-monthly-payments\"").unwrap();
        assert_eq!(back, AmortizationMethod::EqualMonthlyPayments);
    }
}
