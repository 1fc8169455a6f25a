use chrono::{NaiveDate, Utc};
use hourglass_rs::SafeTimeProvider;
use tracing::info;
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::events::{Event, EventStore};
use crate::loan::Loan;
use crate::payments::{generate_amortization_schedule, AmortizationScheduleEntry, ScheduleSummary};
use crate::types::{AccountId, AccountStatus, AmortizationMethod};

/// a loan, its current schedule and the cursor of the next installment due
///
/// The schedule is owned exclusively by the account and only changes through
/// [`RepaymentProcessor`](crate::payments::RepaymentProcessor).
#[derive(Debug, Clone)]
pub struct LoanAccount {
    pub(crate) id: AccountId,
    pub(crate) loan: Loan,
    pub(crate) method: AmortizationMethod,
    pub(crate) start_date: NaiveDate,
    pub(crate) schedule: Vec<AmortizationScheduleEntry>,
    pub(crate) current_repayment_index: usize,
    pub(crate) events: EventStore,
}

impl LoanAccount {
    /// open an account with a freshly generated schedule
    pub fn open(loan: Loan, method: AmortizationMethod, start_date: NaiveDate) -> Result<Self> {
        let schedule = generate_amortization_schedule(&loan, &method, start_date)?;
        let id = Uuid::new_v4();

        let mut events = EventStore::new();
        if let Some(first) = schedule.first() {
            events.emit(Event::AccountOpened {
                account_id: id,
                principal: loan.principal(),
                term_months: loan.term_months(),
                method,
                first_due_date: first.due_date,
            });
        }

        info!(
            account_id = %id,
            principal = %loan.principal(),
            term_months = loan.term_months(),
            %method,
            "loan account opened"
        );

        Ok(Self {
            id,
            loan,
            method,
            start_date,
            schedule,
            current_repayment_index: 0,
            events,
        })
    }

    /// open an account starting on the provider's current date
    pub fn open_with_time(
        loan: Loan,
        method: AmortizationMethod,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        Self::open(loan, method, time_provider.now().date_naive())
    }

    /// builder for creating accounts
    pub fn builder<'a>() -> LoanAccountBuilder<'a> {
        LoanAccountBuilder::new()
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    /// original loan terms; a partial-repayment refinance does not replace them
    pub fn loan(&self) -> &Loan {
        &self.loan
    }

    /// method the initial schedule was generated with
    pub fn method(&self) -> AmortizationMethod {
        self.method
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn schedule(&self) -> &[AmortizationScheduleEntry] {
        &self.schedule
    }

    pub fn current_repayment_index(&self) -> usize {
        self.current_repayment_index
    }

    /// next installment due, `None` once repaid
    pub fn current_entry(&self) -> Option<&AmortizationScheduleEntry> {
        self.schedule.get(self.current_repayment_index)
    }

    /// installments not yet settled, starting with the current one
    pub fn remaining_installments(&self) -> &[AmortizationScheduleEntry] {
        self.schedule
            .get(self.current_repayment_index..)
            .unwrap_or_default()
    }

    pub fn is_repaid(&self) -> bool {
        self.current_repayment_index >= self.schedule.len()
    }

    pub fn status(&self) -> AccountStatus {
        if self.is_repaid() {
            AccountStatus::Repaid
        } else {
            AccountStatus::Active
        }
    }

    /// principal still owed before the current installment
    pub fn outstanding_balance(&self) -> Money {
        if self.is_repaid() {
            return Money::ZERO;
        }
        match self.current_repayment_index.checked_sub(1) {
            Some(previous) => self.schedule[previous].remaining_balance,
            None => self.loan.principal(),
        }
    }

    /// totals over the whole schedule
    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary::from_entries(&self.schedule)
    }

    /// totals over the installments not yet settled
    pub fn remaining_summary(&self) -> ScheduleSummary {
        ScheduleSummary::from_entries(self.remaining_installments())
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    /// get json representation of current state
    pub fn to_json_pretty(&self) -> String {
        use crate::serialization::AccountView;

        AccountView::from_account(self)
            .to_json_pretty()
            .unwrap_or_else(|e| format!("JSON error: {}", e))
    }

    /// short alias for json output
    pub fn json(&self) -> String {
        self.to_json_pretty()
    }
}

/// create a loan account (free-function form of [`LoanAccount::open`])
pub fn create_loan_account(
    loan: Loan,
    method: AmortizationMethod,
    start_date: NaiveDate,
) -> Result<LoanAccount> {
    LoanAccount::open(loan, method, start_date)
}

/// builder for loan accounts
#[derive(Default)]
pub struct LoanAccountBuilder<'a> {
    principal: Option<Money>,
    rate: Option<Rate>,
    term_months: Option<u32>,
    term_years: Option<u32>,
    method: AmortizationMethod,
    start_date: Option<NaiveDate>,
    time_provider: Option<&'a SafeTimeProvider>,
}

impl<'a> LoanAccountBuilder<'a> {
    pub fn new() -> Self {
        Self {
            principal: None,
            rate: None,
            term_months: None,
            term_years: None,
            method: AmortizationMethod::default(),
            start_date: None,
            time_provider: None,
        }
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn rate(mut self, rate: Rate) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn term_months(mut self, months: u32) -> Self {
        self.term_months = Some(months);
        self.term_years = None;
        self
    }

    /// term in whole years, converted to months on build
    pub fn term_years(mut self, years: u32) -> Self {
        self.term_years = Some(years);
        self.term_months = None;
        self
    }

    pub fn method(mut self, method: AmortizationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// take the start date from the provider unless one is set explicitly
    pub fn set_time(mut self, time: &'a SafeTimeProvider) -> Self {
        self.time_provider = Some(time);
        self
    }

    pub fn build(self) -> Result<LoanAccount> {
        let principal = self.principal.ok_or_else(|| LoanError::InvalidConfiguration {
            message: "principal is required".to_string(),
        })?;
        let rate = self.rate.ok_or_else(|| LoanError::InvalidConfiguration {
            message: "interest rate is required".to_string(),
        })?;
        let term_months = match (self.term_months, self.term_years) {
            (Some(months), _) => months,
            (None, Some(years)) => years.checked_mul(12).ok_or_else(|| LoanError::InvalidConfiguration {
                message: format!("term of {} years is out of range", years),
            })?,
            (None, None) => {
                return Err(LoanError::InvalidConfiguration {
                    message: "term is required".to_string(),
                })
            }
        };

        let start_date = match (self.start_date, self.time_provider) {
            (Some(date), _) => date,
            (None, Some(time)) => time.now().date_naive(),
            (None, None) => Utc::now().date_naive(),
        };

        let loan = Loan::new(principal, rate, term_months)?;
        LoanAccount::open(loan, self.method, start_date)
    }
}
