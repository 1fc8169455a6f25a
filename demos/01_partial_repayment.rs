/// partial repayment - short payments refinance the rest of the schedule
use loan_amortization_rs::chrono::NaiveDate;
use loan_amortization_rs::{
    AmortizationMethod, Loan, LoanAccount, Money, Rate, RepaymentOutcome, RepaymentProcessor,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== partial repayment ===\n");

    let loan = Loan::new(Money::from_major(10_000), Rate::from_percentage(5), 24)?;
    let start = NaiveDate::from_ymd_opt(2024, 1, 15).ok_or("bad date")?;
    let mut account = LoanAccount::open(loan, AmortizationMethod::EqualInterest, start)?;
    let processor = RepaymentProcessor::new();

    // settle the first three installments on time
    for entry in account.schedule()[..3].to_vec() {
        processor.apply_repayment(&mut account, entry.payment(), entry.due_date)?;
    }
    println!("after 3 installments: outstanding {}", account.outstanding_balance());

    // the fourth installment comes in short
    let fourth = account.current_entry().ok_or("loan already repaid")?.clone();
    println!("month 4 due {} on {}", fourth.payment(), fourth.due_date);

    let outcome = processor.apply_repayment(&mut account, Money::from_major(200), fourth.due_date)?;
    if let RepaymentOutcome::PartialRepayment { shortfall, regenerated, .. } = outcome {
        println!("short by {}, {} installments recalculated as equal payments", shortfall, regenerated);
    }

    println!("\nrecalculated schedule:");
    for entry in &account.schedule()[4..] {
        println!(
            "month {:>2} | payment {} | interest {} | balance {}",
            entry.month,
            entry.payment(),
            entry.interest_payment,
            entry.remaining_balance
        );
    }

    println!("\nevents:");
    for event in account.events() {
        println!("  {:?}", event);
    }

    Ok(())
}
