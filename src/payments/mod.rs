pub mod amortization;
pub mod repayment;

use chrono::NaiveDate;

use crate::account::LoanAccount;
use crate::decimal::Money;
use crate::errors::Result;
use crate::types::RepaymentOutcome;

pub use amortization::{
    add_months, generate_amortization_schedule, AmortizationScheduleEntry, AmortizationStrategy,
    EqualInterest, EqualMonthlyPayments, ScheduleGenerator, ScheduleSummary,
};
pub use repayment::RepaymentProcessor;

/// apply a repayment with the default processor
pub fn apply_repayment(
    account: &mut LoanAccount,
    amount: Money,
    date: NaiveDate,
) -> Result<RepaymentOutcome> {
    RepaymentProcessor::new().apply_repayment(account, amount, date)
}
