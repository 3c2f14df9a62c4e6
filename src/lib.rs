//! pin-drift - report how far pinned requirements lag behind their registry
//!
//! # Modules
//!
//! - [`parser`]: Reads pinned packages out of requirements files
//! - [`version`]: Registry access, latest-version lookup and drift comparison
//! - [`check`]: Concurrent resolution of a whole manifest and reporting
//! - [`config`]: Defaults and the JSON configuration file
//! - [`logging`]: Tracing subscriber setup

pub mod check;
pub mod config;
pub mod logging;
pub mod parser;
pub mod version;
