/// serialization support for loan accounts and schedules
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::account::LoanAccount;
use crate::decimal::{Money, Rate};
use crate::payments::{AmortizationScheduleEntry, ScheduleSummary};
use crate::types::{AccountId, AccountStatus, AmortizationMethod};

/// serializable view of a single installment, with the derived payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryView {
    pub month: u32,
    pub due_date: NaiveDate,
    pub payment: Money,
    pub principal_payment: Money,
    pub interest_payment: Money,
    pub remaining_balance: Money,
}

impl From<&AmortizationScheduleEntry> for EntryView {
    fn from(entry: &AmortizationScheduleEntry) -> Self {
        EntryView {
            month: entry.month,
            due_date: entry.due_date,
            payment: entry.payment(),
            principal_payment: entry.principal_payment,
            interest_payment: entry.interest_payment,
            remaining_balance: entry.remaining_balance,
        }
    }
}

/// serializable view of a schedule and its totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleView {
    pub summary: ScheduleSummary,
    pub entries: Vec<EntryView>,
}

impl ScheduleView {
    pub fn from_entries(entries: &[AmortizationScheduleEntry]) -> Self {
        ScheduleView {
            summary: ScheduleSummary::from_entries(entries),
            entries: entries.iter().map(EntryView::from).collect(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// serializable view of an account's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: AccountId,
    pub status: AccountStatus,
    pub principal: Money,
    pub annual_interest_rate: Rate,
    pub term_months: u32,
    pub method: AmortizationMethod,
    pub start_date: NaiveDate,
    pub current_repayment_index: usize,
    pub outstanding_balance: Money,
    pub next_due: Option<EntryView>,
    pub remaining: ScheduleSummary,
    pub schedule: ScheduleView,
}

impl AccountView {
    pub fn from_account(account: &LoanAccount) -> Self {
        let loan = account.loan();

        AccountView {
            id: account.id(),
            status: account.status(),
            principal: loan.principal(),
            annual_interest_rate: loan.annual_interest_rate(),
            term_months: loan.term_months(),
            method: account.method(),
            start_date: account.start_date(),
            current_repayment_index: account.current_repayment_index(),
            outstanding_balance: account.outstanding_balance(),
            next_due: account.current_entry().map(EntryView::from),
            remaining: account.remaining_summary(),
            schedule: ScheduleView::from_entries(account.schedule()),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
