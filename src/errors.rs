use thiserror::Error;

use crate::decimal::{Money, Rate};

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("invalid argument: {message}")]
    InvalidArgument {
        message: String,
    },

    #[error("invalid principal: {principal} must be greater than zero")]
    InvalidPrincipal {
        principal: Money,
    },

    #[error("invalid interest rate: {rate} must not be negative")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("invalid term: {term_months} months must be greater than zero")]
    InvalidTerm {
        term_months: u32,
    },

    #[error("invalid repayment amount: {amount}")]
    InvalidRepaymentAmount {
        amount: Money,
    },

    #[error("arithmetic error: {message}")]
    Arithmetic {
        message: String,
    },

    #[error("loan already repaid: repayment index {index} of {len} installments")]
    TerminalState {
        index: usize,
        len: usize,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoanError {
    pub(crate) fn arithmetic(message: impl Into<String>) -> Self {
        LoanError::Arithmetic {
            message: message.into(),
        }
    }

    /// true for the rejected-construction family of errors
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            LoanError::InvalidArgument { .. }
                | LoanError::InvalidPrincipal { .. }
                | LoanError::InvalidInterestRate { .. }
                | LoanError::InvalidTerm { .. }
                | LoanError::InvalidRepaymentAmount { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
