use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{AccountId, AmortizationMethod};

/// all events that can be emitted by a loan account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    AccountOpened {
        account_id: AccountId,
        principal: Money,
        term_months: u32,
        method: AmortizationMethod,
        first_due_date: NaiveDate,
    },
    LoanRepaid {
        account_id: AccountId,
        final_month: u32,
        date: NaiveDate,
    },

    // repayment events
    InstallmentPaid {
        account_id: AccountId,
        month: u32,
        amount: Money,
        amount_due: Money,
        date: NaiveDate,
    },
    OverpaymentDiscarded {
        account_id: AccountId,
        month: u32,
        excess: Money,
    },
    EarlyRepaymentIgnored {
        account_id: AccountId,
        month: u32,
        amount: Money,
        date: NaiveDate,
        due_date: NaiveDate,
    },
    PartialRepaymentReceived {
        account_id: AccountId,
        month: u32,
        amount: Money,
        amount_due: Money,
        date: NaiveDate,
    },
    ScheduleRecalculated {
        account_id: AccountId,
        from_month: u32,
        principal: Money,
        term_months: u32,
        new_payment: Option<Money>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default, Clone)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_take_events_drains() {
        let mut store = EventStore::new();
        let account_id = Uuid::new_v4();
        store.emit(Event::OverpaymentDiscarded {
            account_id,
            month: 3,
            excess: Money::from_major(5),
        });
        assert_eq!(store.len(), 1);

        let taken = store.take_events();
        assert_eq!(taken.len(), 1);
        assert!(store.is_empty());
    }
}
