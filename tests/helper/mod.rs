//! Shared helpers for integration tests

pub mod pypi;

pub use pypi::{mock_missing_package, mock_package, pypi_base_url, render};
