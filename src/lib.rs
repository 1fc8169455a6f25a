pub mod account;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod loan;
pub mod payments;
pub mod serialization;
pub mod types;

// re-export key types
pub use account::{create_loan_account, LoanAccount, LoanAccountBuilder};
pub use config::AccountConfig;
pub use decimal::{Money, Rate};
pub use errors::{LoanError, Result};
pub use events::{Event, EventStore};
pub use loan::Loan;
pub use payments::{
    apply_repayment, generate_amortization_schedule, AmortizationScheduleEntry,
    AmortizationStrategy, EqualInterest, EqualMonthlyPayments, RepaymentProcessor,
    ScheduleGenerator, ScheduleSummary,
};
pub use serialization::{AccountView, EntryView, ScheduleView};
pub use types::{AccountId, AccountStatus, AmortizationMethod, RepaymentOutcome};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
