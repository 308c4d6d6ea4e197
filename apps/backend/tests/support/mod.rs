#![allow(dead_code)]

pub mod http;

pub use app_builder::create_test_app;
pub use state::build_test_state;
