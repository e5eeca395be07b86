//! Utility functions

pub mod mask;

pub use mask::mask_token;
