use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use tracing::{debug, info, warn};

use crate::account::LoanAccount;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::events::Event;
use crate::types::RepaymentOutcome;

use super::amortization::{AmortizationScheduleEntry, EqualMonthlyPayments, ScheduleGenerator};

/// applies repayments to a loan account, one installment at a time
///
/// A repayment covering the current installment advances the cursor by one.
/// A shortfall refinances the installment's closing balance over the months
/// left in the original term, always with equal monthly payments, and splices
/// the new entries in after the cursor. The cursor itself stays put.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepaymentProcessor {
    recalculation: ScheduleGenerator<EqualMonthlyPayments>,
}

impl RepaymentProcessor {
    pub fn new() -> Self {
        Self {
            recalculation: ScheduleGenerator::new(EqualMonthlyPayments),
        }
    }

    /// apply `amount` paid on `date` against the account's current installment
    pub fn apply_repayment(
        &self,
        account: &mut LoanAccount,
        amount: Money,
        date: NaiveDate,
    ) -> Result<RepaymentOutcome> {
        let cursor = account.current_repayment_index;
        let entry = match account.schedule.get(cursor) {
            Some(entry) => entry.clone(),
            None => {
                return Err(LoanError::TerminalState {
                    index: cursor,
                    len: account.schedule.len(),
                })
            }
        };

        if !amount.is_positive() {
            return Err(LoanError::InvalidRepaymentAmount { amount });
        }

        // repayments ahead of the due date are recognised but not applied
        if date < entry.due_date {
            warn!(
                account_id = %account.id,
                month = entry.month,
                %amount,
                %date,
                due_date = %entry.due_date,
                "early repayment ignored"
            );
            account.events.emit(Event::EarlyRepaymentIgnored {
                account_id: account.id,
                month: entry.month,
                amount,
                date,
                due_date: entry.due_date,
            });
            return Ok(RepaymentOutcome::EarlyRepaymentIgnored {
                month: entry.month,
                due_date: entry.due_date,
            });
        }

        let amount_due = entry.payment();

        if amount >= amount_due {
            Ok(self.settle_installment(account, &entry, amount, amount_due, date))
        } else {
            self.recalculate(account, cursor, &entry, amount, amount_due, date)
        }
    }

    /// apply a repayment dated at the provider's current date
    pub fn apply_repayment_now(
        &self,
        account: &mut LoanAccount,
        amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<RepaymentOutcome> {
        self.apply_repayment(account, amount, time_provider.now().date_naive())
    }

    fn settle_installment(
        &self,
        account: &mut LoanAccount,
        entry: &AmortizationScheduleEntry,
        amount: Money,
        amount_due: Money,
        date: NaiveDate,
    ) -> RepaymentOutcome {
        account.current_repayment_index += 1;
        let excess = amount - amount_due;

        account.events.emit(Event::InstallmentPaid {
            account_id: account.id,
            month: entry.month,
            amount,
            amount_due,
            date,
        });

        if excess.is_positive() {
            debug!(account_id = %account.id, month = entry.month, %excess, "overpayment discarded");
            account.events.emit(Event::OverpaymentDiscarded {
                account_id: account.id,
                month: entry.month,
                excess,
            });
        }

        debug!(
            account_id = %account.id,
            month = entry.month,
            cursor = account.current_repayment_index,
            "installment paid"
        );

        if account.is_repaid() {
            info!(account_id = %account.id, final_month = entry.month, "loan repaid");
            account.events.emit(Event::LoanRepaid {
                account_id: account.id,
                final_month: entry.month,
                date,
            });
        }

        RepaymentOutcome::InstallmentPaid {
            month: entry.month,
            amount_due,
            excess,
        }
    }

    fn recalculate(
        &self,
        account: &mut LoanAccount,
        cursor: usize,
        entry: &AmortizationScheduleEntry,
        amount: Money,
        amount_due: Money,
        date: NaiveDate,
    ) -> Result<RepaymentOutcome> {
        account.events.emit(Event::PartialRepaymentReceived {
            account_id: account.id,
            month: entry.month,
            amount,
            amount_due,
            date,
        });

        let shortfall = amount_due - amount;
        let settled = u32::try_from(cursor + 1)
            .map_err(|_| LoanError::arithmetic("repayment index exceeds term range"))?;
        let remaining_term = account.loan.term_months().saturating_sub(settled);
        let balance = entry.remaining_balance;

        let regenerated = if remaining_term == 0 {
            // partial payment on the last installment: nothing left to spread over
            warn!(account_id = %account.id, month = entry.month, %shortfall, "partial repayment on final installment");
            0
        } else if !balance.is_positive() {
            account.schedule.truncate(cursor + 1);
            0
        } else {
            let refinanced = account.loan.refinance(balance, remaining_term)?;
            let mut entries = self.recalculation.generate(&refinanced, entry.due_date)?;
            for next in entries.iter_mut() {
                next.month += entry.month;
            }

            account.events.emit(Event::ScheduleRecalculated {
                account_id: account.id,
                from_month: entry.month + 1,
                principal: balance,
                term_months: remaining_term,
                new_payment: entries.first().map(|e| e.payment()),
            });

            let count = entries.len();
            account.schedule.truncate(cursor + 1);
            account.schedule.extend(entries);
            count
        };

        info!(
            account_id = %account.id,
            month = entry.month,
            %amount,
            %shortfall,
            regenerated,
            "partial repayment, schedule recalculated"
        );

        Ok(RepaymentOutcome::PartialRepayment {
            month: entry.month,
            amount_due,
            shortfall,
            regenerated,
        })
    }
}
