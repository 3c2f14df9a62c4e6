//! Concrete registry implementations

pub mod pypi;

pub use pypi::{DEFAULT_PYPI_URL, PypiRegistry};
