#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

pub mod config;
pub mod contact;
pub mod directory;
pub mod districts;
pub mod error;
pub mod geocoding;
pub mod http;
pub mod lookup;
pub mod matcher;
pub mod rest;
pub mod session;
