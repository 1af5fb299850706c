// server/src/services/mod.rs

pub mod auth;
pub mod payment_mock;
pub mod sessions;
