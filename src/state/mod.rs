mod store;

pub use store::{SessionSnapshot, SessionState};
