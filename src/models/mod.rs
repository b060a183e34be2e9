//! Domain models

pub mod equipment;
pub mod user;
