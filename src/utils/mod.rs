pub mod config;
mod validation;
pub mod formatting;
pub mod timeout;

pub use config::KitConfig;
pub use validation::Validator;
pub use formatting::{format_address, format_passphrase};
pub use timeout::{false_after_deadline, with_timeout};
