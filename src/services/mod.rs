pub mod authentication;
pub mod ivr;
