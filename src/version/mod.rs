//! Version resolution layer for pinned packages
//!
//! This module provides the core functionality for fetching published versions
//! from a registry and measuring how far a pinned version lags behind.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│   Lookup    │────▶│   Compare   │
//! │  (fetch)    │     │(max version)│     │   (drift)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ Registries  │
//! │   (PyPI)    │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`compare`]: Dotted numeric version comparison and drift classification
//! - [`lookup`]: Latest-version lookup for a single package, with deadline
//! - [`registry`]: Registry trait for fetching versions from remote sources
//! - [`registries`]: Concrete registry implementations (PyPI)
//! - [`error`]: Error types for registry operations
//! - [`types`]: Common types like `PackageVersions`

pub mod compare;
pub mod error;
pub mod lookup;
pub mod registries;
pub mod registry;
pub mod types;
