//! Property tests for schedule generation and repayment recalculation.
//!
//! Every valid loan must produce exactly `term` entries, close at a zero
//! balance, and repay exactly its principal, whichever method is used.

use chrono::NaiveDate;
use loan_amortization_rs::{
    generate_amortization_schedule, AmortizationMethod, Loan, LoanAccount, Money, Rate,
    RepaymentOutcome, RepaymentProcessor,
};
use proptest::prelude::*;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
}

fn method_strategy() -> impl Strategy<Value = AmortizationMethod> {
    prop_oneof![
        Just(AmortizationMethod::EqualMonthlyPayments),
        Just(AmortizationMethod::EqualInterest),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn schedule_has_term_entries_in_month_order(
        cents in 1i64..100_000_000i64,
        bps in 1u32..3_000u32,
        term in 1u32..120u32,
        method in method_strategy(),
    ) {
        let loan = Loan::new(Money::from_minor(cents), Rate::from_bps(bps), term).unwrap();
        let schedule = generate_amortization_schedule(&loan, &method, start()).unwrap();

        prop_assert_eq!(schedule.len(), term as usize);
        for (index, entry) in schedule.iter().enumerate() {
            prop_assert_eq!(entry.month, index as u32 + 1);
        }
        for pair in schedule.windows(2) {
            prop_assert!(pair[0].due_date < pair[1].due_date);
        }
    }

    #[test]
    fn schedule_closes_at_zero_and_repays_principal(
        cents in 1i64..100_000_000i64,
        bps in 1u32..3_000u32,
        term in 1u32..120u32,
        method in method_strategy(),
    ) {
        let loan = Loan::new(Money::from_minor(cents), Rate::from_bps(bps), term).unwrap();
        let schedule = generate_amortization_schedule(&loan, &method, start()).unwrap();

        prop_assert_eq!(schedule.last().unwrap().remaining_balance, Money::ZERO);

        let repaid: Money = schedule.iter().map(|e| e.principal_payment).sum();
        prop_assert_eq!(repaid, loan.principal());
    }

    #[test]
    fn annuity_payment_constant_before_final_month(
        cents in 1i64..100_000_000i64,
        bps in 1u32..3_000u32,
        term in 2u32..120u32,
    ) {
        let loan = Loan::new(Money::from_minor(cents), Rate::from_bps(bps), term).unwrap();
        let schedule =
            generate_amortization_schedule(&loan, &AmortizationMethod::EqualMonthlyPayments, start()).unwrap();

        let payment = schedule[0].payment();
        for entry in &schedule[..schedule.len() - 1] {
            prop_assert_eq!(entry.payment(), payment);
        }
    }

    #[test]
    fn equal_interest_installments_constant(
        cents in 1i64..100_000_000i64,
        bps in 0u32..3_000u32,
        term in 2u32..120u32,
    ) {
        let loan = Loan::new(Money::from_minor(cents), Rate::from_bps(bps), term).unwrap();
        let schedule =
            generate_amortization_schedule(&loan, &AmortizationMethod::EqualInterest, start()).unwrap();

        let principal = schedule[0].principal_payment;
        let interest = schedule[0].interest_payment;
        for entry in &schedule[..schedule.len() - 1] {
            prop_assert_eq!(entry.principal_payment, principal);
        }
        for entry in &schedule {
            prop_assert_eq!(entry.interest_payment, interest);
        }
    }

    #[test]
    fn partial_repayment_regenerates_closing_suffix(
        major in 1_000i64..1_000_000i64,
        bps in 1u32..3_000u32,
        term in 2u32..120u32,
        seed in any::<u32>(),
        method in method_strategy(),
    ) {
        let loan = Loan::new(Money::from_major(major), Rate::from_bps(bps), term).unwrap();
        let mut account = LoanAccount::open(loan, method, start()).unwrap();
        let processor = RepaymentProcessor::new();

        let settled = (seed % (term - 1)) as usize;
        for entry in account.schedule()[..settled].to_vec() {
            processor.apply_repayment(&mut account, entry.payment(), entry.due_date).unwrap();
        }

        let current = account.current_entry().unwrap().clone();
        let outcome = processor
            .apply_repayment(&mut account, Money::CENT, current.due_date)
            .unwrap();

        let expected = term as usize - settled - 1;
        let is_partial = matches!(outcome, RepaymentOutcome::PartialRepayment { regenerated, .. } if regenerated == expected);
        prop_assert!(is_partial);
        prop_assert_eq!(account.current_repayment_index(), settled);
        prop_assert_eq!(account.schedule().len(), term as usize);

        let suffix = &account.schedule()[settled + 1..];
        prop_assert_eq!(suffix.last().unwrap().remaining_balance, Money::ZERO);
        let refinanced: Money = suffix.iter().map(|e| e.principal_payment).sum();
        prop_assert_eq!(refinanced, current.remaining_balance);
    }
}
