//! Persistent credential stores

mod file;

pub use file::FileCredentialStore;
