//! Tests for the refresh coordinator

pub(crate) mod mocks;
