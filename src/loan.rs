use serde::Serialize;

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};

/// immutable loan terms a schedule is generated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Loan {
    principal: Money,
    annual_interest_rate: Rate,
    term_months: u32,
}

impl Loan {
    /// create validated loan terms
    pub fn new(principal: Money, annual_interest_rate: Rate, term_months: u32) -> Result<Self> {
        if !principal.is_positive() {
            return Err(LoanError::InvalidPrincipal { principal });
        }

        if annual_interest_rate.is_negative() {
            return Err(LoanError::InvalidInterestRate {
                rate: annual_interest_rate,
            });
        }

        if term_months == 0 {
            return Err(LoanError::InvalidTerm { term_months });
        }

        Ok(Self {
            principal,
            annual_interest_rate,
            term_months,
        })
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn annual_interest_rate(&self) -> Rate {
        self.annual_interest_rate
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    /// terms for refinancing the outstanding balance over fewer months
    pub fn refinance(&self, principal: Money, term_months: u32) -> Result<Self> {
        Loan::new(principal, self.annual_interest_rate, term_months)
    }
}
