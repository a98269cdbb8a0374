#![allow(dead_code)]

pub mod backends;
pub mod test_app;

pub use backends::{FailingBackend, GatedBackend, SlowBackend};
pub use test_app::TestApp;
