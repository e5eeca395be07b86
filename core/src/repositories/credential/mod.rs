mod memory;
mod r#trait;

pub use memory::InMemoryCredentialStore;
pub use r#trait::CredentialStore;
