use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::{round_half_up, Money, RATE_SCALE};
use crate::errors::{LoanError, Result};
use crate::loan::Loan;
use crate::types::AmortizationMethod;

/// one month of an amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationScheduleEntry {
    pub month: u32,
    pub principal_payment: Money,
    pub interest_payment: Money,
    pub remaining_balance: Money,
    pub due_date: NaiveDate,
}

impl AmortizationScheduleEntry {
    /// total installment due (principal + interest)
    pub fn payment(&self) -> Money {
        self.principal_payment + self.interest_payment
    }
}

/// computes a single schedule entry; implementations hold no state
pub trait AmortizationStrategy {
    fn method(&self) -> AmortizationMethod;

    fn calculate_entry(
        &self,
        month: u32,
        loan: &Loan,
        remaining_balance: Money,
        due_date: NaiveDate,
    ) -> Result<AmortizationScheduleEntry>;
}

/// annuity method: one fixed payment, interest on the declining balance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EqualMonthlyPayments;

impl EqualMonthlyPayments {
    /// fixed installment from the annuity formula
    ///
    /// `payment = P * r / (1 - (1 + r)^-n)` with `r` at 10 fractional digits,
    /// the discount factor rounded to 10 digits and the result to cents.
    /// A zero monthly rate leaves a zero divisor and is an arithmetic error.
    pub fn monthly_payment(loan: &Loan) -> Result<Money> {
        let principal = loan.principal();
        let months = loan.term_months();
        let monthly_rate = loan.annual_interest_rate().monthly_rate();

        let base = Decimal::ONE + monthly_rate;
        let mut compound = Decimal::ONE;
        for _ in 0..months {
            compound = compound.checked_mul(base).ok_or_else(|| {
                LoanError::arithmetic(format!(
                    "compound factor overflow at rate {} over {} months",
                    monthly_rate, months
                ))
            })?;
        }

        let discount = Decimal::ONE
            .checked_div(compound)
            .ok_or_else(|| LoanError::arithmetic("zero compound factor"))?;
        let divisor = Decimal::ONE - round_half_up(discount, RATE_SCALE);
        if divisor.is_zero() {
            return Err(LoanError::arithmetic("annuity divisor is zero"));
        }

        principal
            .as_decimal()
            .checked_mul(monthly_rate)
            .and_then(|numerator| numerator.checked_div(divisor))
            .map(Money::from_decimal)
            .ok_or_else(|| LoanError::arithmetic("annuity payment overflow"))
    }
}

impl AmortizationStrategy for EqualMonthlyPayments {
    fn method(&self) -> AmortizationMethod {
        AmortizationMethod::EqualMonthlyPayments
    }

    fn calculate_entry(
        &self,
        month: u32,
        loan: &Loan,
        remaining_balance: Money,
        due_date: NaiveDate,
    ) -> Result<AmortizationScheduleEntry> {
        check_month(month, loan)?;

        let monthly_rate = loan.annual_interest_rate().monthly_rate();
        let payment = Self::monthly_payment(loan)?;
        let interest_payment = remaining_balance
            .checked_mul(monthly_rate)
            .ok_or_else(|| LoanError::arithmetic("interest overflow"))?;

        Ok(close_entry(
            month,
            loan,
            payment - interest_payment,
            interest_payment,
            remaining_balance,
            due_date,
        ))
    }
}

/// equal principal installments, interest charged on the original principal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EqualInterest;

impl AmortizationStrategy for EqualInterest {
    fn method(&self) -> AmortizationMethod {
        AmortizationMethod::EqualInterest
    }

    fn calculate_entry(
        &self,
        month: u32,
        loan: &Loan,
        remaining_balance: Money,
        due_date: NaiveDate,
    ) -> Result<AmortizationScheduleEntry> {
        check_month(month, loan)?;

        let monthly_rate = loan.annual_interest_rate().monthly_rate();
        let interest_payment = loan
            .principal()
            .checked_mul(monthly_rate)
            .ok_or_else(|| LoanError::arithmetic("interest overflow"))?;
        let principal_payment = loan
            .principal()
            .checked_div(Decimal::from(loan.term_months()))
            .ok_or_else(|| LoanError::arithmetic("division by zero term"))?;

        Ok(close_entry(
            month,
            loan,
            principal_payment,
            interest_payment,
            remaining_balance,
            due_date,
        ))
    }
}

impl AmortizationStrategy for AmortizationMethod {
    fn method(&self) -> AmortizationMethod {
        *self
    }

    fn calculate_entry(
        &self,
        month: u32,
        loan: &Loan,
        remaining_balance: Money,
        due_date: NaiveDate,
    ) -> Result<AmortizationScheduleEntry> {
        match self {
            AmortizationMethod::EqualMonthlyPayments => {
                EqualMonthlyPayments.calculate_entry(month, loan, remaining_balance, due_date)
            }
            AmortizationMethod::EqualInterest => {
                EqualInterest.calculate_entry(month, loan, remaining_balance, due_date)
            }
        }
    }
}

fn check_month(month: u32, loan: &Loan) -> Result<()> {
    if month == 0 || month > loan.term_months() {
        return Err(LoanError::InvalidArgument {
            message: format!("month {} outside term of {} months", month, loan.term_months()),
        });
    }
    Ok(())
}

/// build the entry; the final month absorbs whatever balance is left so the
/// schedule always closes at exactly zero
fn close_entry(
    month: u32,
    loan: &Loan,
    principal_payment: Money,
    interest_payment: Money,
    remaining_balance: Money,
    due_date: NaiveDate,
) -> AmortizationScheduleEntry {
    let (principal_payment, remaining_balance) = if month == loan.term_months() {
        (remaining_balance, Money::ZERO)
    } else {
        (principal_payment, remaining_balance - principal_payment)
    };

    AmortizationScheduleEntry {
        month,
        principal_payment,
        interest_payment,
        remaining_balance,
        due_date,
    }
}

/// drives the month loop for a strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleGenerator<S> {
    strategy: S,
}

impl<S: AmortizationStrategy> ScheduleGenerator<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    /// generate the full schedule for `loan`, first installment one month
    /// after `start_date`
    pub fn generate(&self, loan: &Loan, start_date: NaiveDate) -> Result<Vec<AmortizationScheduleEntry>> {
        generate_amortization_schedule(loan, &self.strategy, start_date)
    }
}

/// generate an amortization schedule of exactly `loan.term_months()` entries
pub fn generate_amortization_schedule<S: AmortizationStrategy + ?Sized>(
    loan: &Loan,
    strategy: &S,
    start_date: NaiveDate,
) -> Result<Vec<AmortizationScheduleEntry>> {
    let term = loan.term_months();
    let mut schedule = Vec::with_capacity(term as usize);
    let mut balance = loan.principal();

    for month in 1..=term {
        let due_date = add_months(start_date, month)?;
        let entry = strategy.calculate_entry(month, loan, balance, due_date)?;
        balance = entry.remaining_balance;
        schedule.push(entry);
    }

    debug!(
        method = %strategy.method(),
        principal = %loan.principal(),
        rate = %loan.annual_interest_rate(),
        term,
        "generated amortization schedule"
    );

    Ok(schedule)
}

/// add calendar months, clamping to the last day of shorter months
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| LoanError::InvalidDate {
            message: format!("{} + {} months is out of range", date, months),
        })
}

/// totals over a schedule or part of one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub installments: usize,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl ScheduleSummary {
    pub fn from_entries(entries: &[AmortizationScheduleEntry]) -> Self {
        let total_principal: Money = entries.iter().map(|e| e.principal_payment).sum();
        let total_interest: Money = entries.iter().map(|e| e.interest_payment).sum();

        Self {
            installments: entries.len(),
            total_principal,
            total_interest,
            total_payment: total_principal + total_interest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use rust_decimal_macros::dec;

    fn money(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn reference_loan() -> Loan {
        Loan::new(money("10000.00"), Rate::from_percentage(5), 24).unwrap()
    }

    #[test]
    fn test_annuity_payment() {
        let payment = EqualMonthlyPayments::monthly_payment(&reference_loan()).unwrap();
        assert_eq!(payment, money("438.71"));
    }

    #[test]
    fn test_equal_monthly_payments_schedule() {
        let loan = reference_loan();
        let schedule = generate_amortization_schedule(&loan, &EqualMonthlyPayments, start()).unwrap();

        assert_eq!(schedule.len(), 24);

        let first = &schedule[0];
        assert_eq!(first.month, 1);
        assert_eq!(first.interest_payment, money("41.67"));
        assert_eq!(first.principal_payment, money("397.04"));
        assert_eq!(first.remaining_balance, money("9602.96"));
        assert_eq!(first.due_date, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());

        // identical installment on every month but the last
        for entry in &schedule[..23] {
            assert_eq!(entry.payment(), money("438.71"));
        }

        let last = &schedule[23];
        assert_eq!(last.month, 24);
        assert_eq!(last.principal_payment, money("437.00"));
        assert_eq!(last.interest_payment, money("1.82"));
        assert_eq!(last.payment(), money("438.82"));
        assert_eq!(last.remaining_balance, Money::ZERO);
        assert_eq!(last.due_date, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());

        let summary = ScheduleSummary::from_entries(&schedule);
        assert_eq!(summary.total_principal, loan.principal());
        assert_eq!(summary.total_payment, summary.total_principal + summary.total_interest);
    }

    #[test]
    fn test_equal_interest_schedule() {
        let loan = reference_loan();
        let schedule = generate_amortization_schedule(&loan, &EqualInterest, start()).unwrap();

        assert_eq!(schedule.len(), 24);

        for entry in &schedule[..23] {
            assert_eq!(entry.principal_payment, money("416.67"));
        }

        // interest is charged on the original principal every month
        for entry in &schedule {
            assert_eq!(entry.interest_payment, money("41.67"));
        }

        let last = &schedule[23];
        assert_eq!(last.principal_payment, money("416.59"));
        assert_eq!(last.remaining_balance, Money::ZERO);

        let total: Money = schedule.iter().map(|e| e.principal_payment).sum();
        assert_eq!(total, loan.principal());
    }

    #[test]
    fn test_months_strictly_increasing() {
        let loan = Loan::new(money("2500.00"), Rate::from_percentage(dec!(3.75)), 7).unwrap();
        for method in [AmortizationMethod::EqualMonthlyPayments, AmortizationMethod::EqualInterest] {
            let schedule = generate_amortization_schedule(&loan, &method, start()).unwrap();
            let months: Vec<u32> = schedule.iter().map(|e| e.month).collect();
            assert_eq!(months, (1..=7).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_method_dispatch_matches_strategy() {
        let loan = reference_loan();
        let via_method =
            generate_amortization_schedule(&loan, &AmortizationMethod::EqualInterest, start()).unwrap();
        let via_strategy = ScheduleGenerator::new(EqualInterest).generate(&loan, start()).unwrap();
        assert_eq!(via_method, via_strategy);
    }

    #[test]
    fn test_dyn_strategy() {
        let strategies: Vec<Box<dyn AmortizationStrategy>> =
            vec![Box::new(EqualMonthlyPayments), Box::new(EqualInterest)];
        for strategy in &strategies {
            let schedule = generate_amortization_schedule(&reference_loan(), strategy.as_ref(), start()).unwrap();
            assert_eq!(schedule.last().unwrap().remaining_balance, Money::ZERO);
        }
    }

    #[test]
    fn test_zero_rate_annuity_is_arithmetic_error() {
        let loan = Loan::new(money("1200.00"), Rate::ZERO, 12).unwrap();
        let err = generate_amortization_schedule(&loan, &EqualMonthlyPayments, start()).unwrap_err();
        assert!(matches!(err, LoanError::Arithmetic { .. }));
        assert!(matches!(
            EqualMonthlyPayments::monthly_payment(&loan),
            Err(LoanError::Arithmetic { .. })
        ));
    }

    #[test]
    fn test_zero_rate_equal_interest_is_straight_line() {
        let loan = Loan::new(money("1200.00"), Rate::ZERO, 12).unwrap();
        let schedule = generate_amortization_schedule(&loan, &EqualInterest, start()).unwrap();
        for entry in &schedule {
            assert_eq!(entry.principal_payment, money("100.00"));
            assert_eq!(entry.interest_payment, Money::ZERO);
        }
        assert_eq!(schedule[11].remaining_balance, Money::ZERO);
    }

    #[test]
    fn test_tiny_principal_equal_interest_overshoots_mid_schedule() {
        // 0.05 over 10 months rounds each installment up to 0.01
        let loan = Loan::new(money("0.05"), Rate::from_percentage(12), 10).unwrap();
        let schedule = generate_amortization_schedule(&loan, &EqualInterest, start()).unwrap();

        assert_eq!(schedule[4].remaining_balance, Money::ZERO);
        assert_eq!(schedule[5].remaining_balance, money("-0.01"));
        assert_eq!(schedule[9].principal_payment, money("-0.04"));
        assert_eq!(schedule[9].remaining_balance, Money::ZERO);

        let total: Money = schedule.iter().map(|e| e.principal_payment).sum();
        assert_eq!(total, loan.principal());
    }

    #[test]
    fn test_single_month_term() {
        let loan = Loan::new(money("500.00"), Rate::from_percentage(12), 1).unwrap();
        let schedule = generate_amortization_schedule(&loan, &EqualMonthlyPayments, start()).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].principal_payment, money("500.00"));
        assert_eq!(schedule[0].interest_payment, money("5.00"));
        assert_eq!(schedule[0].remaining_balance, Money::ZERO);
    }

    #[test]
    fn test_compound_overflow_is_arithmetic_error() {
        let loan = Loan::new(money("1000.00"), Rate::from_percentage(120_000), 360).unwrap();
        let err = generate_amortization_schedule(&loan, &EqualMonthlyPayments, start()).unwrap_err();
        assert!(matches!(err, LoanError::Arithmetic { .. }));
    }

    #[test]
    fn test_month_outside_term_rejected() {
        let loan = reference_loan();
        assert!(EqualInterest.calculate_entry(0, &loan, loan.principal(), start()).is_err());
        assert!(EqualMonthlyPayments.calculate_entry(25, &loan, loan.principal(), start()).is_err());
    }

    #[test]
    fn test_due_dates_clamp_to_month_end() {
        let jan_31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(add_months(jan_31, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(add_months(jan_31, 2).unwrap(), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(add_months(jan_31, 13).unwrap(), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }
}
