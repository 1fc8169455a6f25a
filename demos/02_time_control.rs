/// time control - deterministic repayment dates with a controlled clock
use loan_amortization_rs::{
    AmortizationMethod, LoanAccount, Money, Rate, RepaymentProcessor, SafeTimeProvider, TimeSource,
};
use chrono::{Duration, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== time control example ===\n");

    // create controlled time for testing
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    println!("starting date: {}", time.now().format("%Y-%m-%d"));

    let mut account = LoanAccount::builder()
        .principal(Money::from_major(12_000))
        .rate(Rate::from_percentage(6))
        .term_months(12)
        .method(AmortizationMethod::EqualMonthlyPayments)
        .set_time(&time)
        .build()?;
    let processor = RepaymentProcessor::new();

    // paying on day one is ahead of the first due date
    let due = account.current_entry().ok_or("nothing due")?.payment();
    let outcome = processor.apply_repayment_now(&mut account, due, &time)?;
    println!("{}: {:?}", time.now().format("%Y-%m-%d"), outcome);

    // pay each installment a month at a time
    while !account.is_repaid() {
        controller.advance(Duration::days(31));
        let due = account.current_entry().ok_or("nothing due")?.payment();
        let outcome = processor.apply_repayment_now(&mut account, due, &time)?;
        println!("{}: {:?}", time.now().format("%Y-%m-%d"), outcome);
    }

    println!("\nloan fully repaid, status {:?}", account.status());

    Ok(())
}
