//! Parser layer
//! - traits.rs: Parser trait definition
//! - types.rs: Common types (PackageSpec)
//! - requirements_txt.rs: requirements.txt parser

pub mod requirements_txt;
pub mod traits;
pub mod types;

pub use requirements_txt::RequirementsTxtParser;
pub use traits::{ParseError, Parser};
pub use types::PackageSpec;
