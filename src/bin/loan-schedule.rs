use chrono::{NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use loan_amortization_rs::{
    AccountConfig, AccountView, AmortizationMethod, Decimal, LoanAccount, LoanError, Money,
    RepaymentOutcome, RepaymentProcessor, Result, ScheduleSummary,
};
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Method {
    EqualMonthlyPayments,
    EqualInterest,
}

impl From<Method> for AmortizationMethod {
    fn from(m: Method) -> Self {
        match m {
            Method::EqualMonthlyPayments => AmortizationMethod::EqualMonthlyPayments,
            Method::EqualInterest => AmortizationMethod::EqualInterest,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "loan-schedule", version, about = "Print a loan amortization schedule and apply repayments")]
struct Cli {
    /// Json account config; command line terms override it
    #[arg(short = 'c', long = "config")]
    config: Option<String>,

    /// Loan principal, e.g. 10000.00
    #[arg(short = 'p', long = "principal", value_parser = parse_money)]
    principal: Option<Money>,

    /// Annual interest rate in percent, e.g. 5
    #[arg(short = 'r', long = "rate")]
    rate: Option<Decimal>,

    /// Term in months
    #[arg(short = 't', long = "term")]
    term: Option<u32>,

    /// Amortization method
    #[arg(short = 'm', long = "method", value_enum)]
    method: Option<Method>,

    /// Start date (YYYY-MM-DD); first installment is due a month later
    #[arg(short = 's', long = "start")]
    start: Option<NaiveDate>,

    /// Repayment as AMOUNT@YYYY-MM-DD; may be repeated
    #[arg(long = "repay", value_parser = parse_repayment)]
    repayments: Vec<(Money, NaiveDate)>,

    /// Print the account as json instead of a table
    #[arg(long = "json")]
    json: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long = "log-level", default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = resolve_config(&cli)?;
    config.validate()?;

    let mut account = config.open_account()?;
    let processor = RepaymentProcessor::new();

    for (amount, date) in &cli.repayments {
        let outcome = processor.apply_repayment(&mut account, *amount, *date)?;
        if !cli.json {
            println!("{}", describe(&outcome, *amount, *date));
        }
    }

    if cli.json {
        println!("{}", AccountView::from_account(&account).to_json_pretty()?);
    } else {
        print_table(&account);
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_config(cli: &Cli) -> Result<AccountConfig> {
    let base = match &cli.config {
        Some(path) => Some(AccountConfig::from_path(path)?),
        None => None,
    };

    let missing = |what: &str| LoanError::InvalidConfiguration {
        message: format!("{} is required (pass --{} or --config)", what, what),
    };

    Ok(AccountConfig {
        principal: cli
            .principal
            .or(base.as_ref().map(|c| c.principal))
            .ok_or_else(|| missing("principal"))?,
        annual_rate_percent: cli
            .rate
            .or(base.as_ref().map(|c| c.annual_rate_percent))
            .ok_or_else(|| missing("rate"))?,
        term_months: cli
            .term
            .or(base.as_ref().map(|c| c.term_months))
            .ok_or_else(|| missing("term"))?,
        method: cli
            .method
            .map(AmortizationMethod::from)
            .or(base.as_ref().map(|c| c.method))
            .unwrap_or_default(),
        start_date: cli
            .start
            .or(base.as_ref().map(|c| c.start_date))
            .unwrap_or_else(|| Utc::now().date_naive()),
    })
}

fn parse_money(s: &str) -> std::result::Result<Money, String> {
    Money::from_str(s).map_err(|e| format!("invalid amount '{}': {}", s, e))
}

fn parse_repayment(s: &str) -> std::result::Result<(Money, NaiveDate), String> {
    let (amount, date) = s
        .split_once('@')
        .ok_or_else(|| format!("expected AMOUNT@YYYY-MM-DD, got '{}'", s))?;
    let amount = parse_money(amount)?;
    let date = NaiveDate::from_str(date.trim()).map_err(|e| format!("invalid date '{}': {}", date, e))?;
    Ok((amount, date))
}

fn describe(outcome: &RepaymentOutcome, amount: Money, date: NaiveDate) -> String {
    match outcome {
        RepaymentOutcome::EarlyRepaymentIgnored { month, due_date } => format!(
            "{} paid {}: before month {} due {}, ignored",
            date, amount, month, due_date
        ),
        RepaymentOutcome::InstallmentPaid { month, amount_due, excess } => format!(
            "{} paid {}: month {} settled ({} due, {} excess discarded)",
            date, amount, month, amount_due, excess
        ),
        RepaymentOutcome::PartialRepayment { month, amount_due, shortfall, regenerated } => format!(
            "{} paid {}: month {} short by {} of {}, {} installments recalculated",
            date, amount, month, shortfall, amount_due, regenerated
        ),
    }
}

fn print_table(account: &LoanAccount) {
    let loan = account.loan();
    println!(
        "principal {} | rate {} | term {} months | {}",
        loan.principal(),
        loan.annual_interest_rate(),
        loan.term_months(),
        account.method()
    );
    println!(
        "{:>5}  {:>10}  {:>12}  {:>12}  {:>12}  {:>14}",
        "month", "due", "payment", "principal", "interest", "balance"
    );

    for (index, entry) in account.schedule().iter().enumerate() {
        let marker = if index == account.current_repayment_index() { '>' } else { ' ' };
        println!(
            "{}{:>4}  {:>10}  {:>12}  {:>12}  {:>12}  {:>14}",
            marker,
            entry.month,
            entry.due_date.to_string(),
            entry.payment().to_string(),
            entry.principal_payment.to_string(),
            entry.interest_payment.to_string(),
            entry.remaining_balance.to_string()
        );
    }

    let ScheduleSummary { total_principal, total_interest, total_payment, .. } = account.summary();
    println!(
        "total payment {} | principal {} | interest {} | {} of {} installments settled",
        total_payment,
        total_principal,
        total_interest,
        account.current_repayment_index(),
        account.schedule().len()
    );
}
