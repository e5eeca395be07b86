//! Session service module
//!
//! Signs users in and up against the accounts API, keeps the returned
//! credentials in the store and signs out by clearing them.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::SessionServiceConfig;
pub use service::SessionService;
