// server/src/web/mod.rs

pub mod handlers;
pub mod identity;
pub mod routes;
