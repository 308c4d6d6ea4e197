pub mod accounts;

pub use accounts::{AccountService, LoginOutcome, LoginRequest, SignupRequest};
