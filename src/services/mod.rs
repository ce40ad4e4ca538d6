pub mod account;

pub use account::{extract_native_balance, AccountService};
