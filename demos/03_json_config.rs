/// json config - open an account from configuration and dump its state
use loan_amortization_rs::AccountConfig;

const CONFIG: &str = r#"{
    "principal": "25000.00",
    "annual_rate_percent": "4.25",
    "term_months": 36,
    "method": "equal-interest",
    "start_date": "2024-03-31"
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== json config ===\n");

    let config = AccountConfig::from_json(CONFIG)?;
    config.validate()?;

    let account = config.open_account()?;
    println!("{}", account.json());

    Ok(())
}
