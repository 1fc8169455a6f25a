/// quick start - minimal example to get started
use loan_amortization_rs::chrono::NaiveDate;
use loan_amortization_rs::{AmortizationMethod, LoanAccount, Money, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a $10,000 loan at 5% over two years
    let mut account = LoanAccount::builder()
        .principal(Money::from_major(10_000))
        .rate(Rate::from_percentage(5))
        .term_months(24)
        .method(AmortizationMethod::EqualMonthlyPayments)
        .start_date(NaiveDate::from_ymd_opt(2024, 1, 15).ok_or("bad date")?)
        .build()?;

    for entry in account.schedule() {
        println!(
            "month {:>2} | due {} | payment {} | principal {} | interest {} | balance {}",
            entry.month,
            entry.due_date,
            entry.payment(),
            entry.principal_payment,
            entry.interest_payment,
            entry.remaining_balance
        );
    }

    // pay the first installment on its due date
    let first = account.schedule()[0].clone();
    let outcome = loan_amortization_rs::apply_repayment(&mut account, first.payment(), first.due_date)?;
    println!("\n{:?}", outcome);
    println!("outstanding: {}", account.outstanding_balance());

    Ok(())
}
