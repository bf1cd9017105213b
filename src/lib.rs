// src/lib.rs

pub mod record;
pub mod validate;
pub mod store;
pub mod console;
pub mod config;
pub mod logging;
