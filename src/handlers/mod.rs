pub mod health;
pub mod ivr;
