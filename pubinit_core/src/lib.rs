//! `pubinit_core` synthesizes `public` memberwise initializers for Swift
//! `struct` and `class` declarations marked with `@PublicInit`.
//!
//! Swift only generates a memberwise initializer with `internal` access, so a
//! public type used from another module needs a hand-written `public init`.
//! This crate writes that initializer from the declaration's stored fields.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Swift source
//!   -> Lexer (logos tokens with line/column positions)
//!   -> Parser (type declarations, members, attributes)
//!   -> Validator (public struct or class only)
//!   -> Classifier (stored fields that need a parameter)
//!   -> Resolver (parameter type and default per field)
//!   -> Synthesizer (the `public init` declaration)
//!   -> Diagnostics (why a declaration was rejected)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: loading `pubinit.toml`, attribute aliases, indent and scan
//!   settings.
//! - [`project`]: walking a project and expanding every annotated file.
//!
//! ## Key Types
//!
//! - [`TypeDeclaration`]: a parsed type with its members.
//! - [`SynthesizedInitializer`]: the generated initializer, renderable as
//!   Swift source.
//! - [`Diagnostic`]: a structured report of a rejected declaration.
//! - [`PubInitConfig`]: configuration loaded from `pubinit.toml`.
//!
//! ## Quick Start
//!
//! ```rust
//! use pubinit_core::PubInitConfig;
//! use pubinit_core::expand_source;
//!
//! let source = "@PublicInit\npublic struct Point {\n    let x: Int\n}\n";
//! let expansion = expand_source(source, &PubInitConfig::default()).unwrap();
//!
//! assert!(expansion.is_ok());
//! assert!(expansion.output.contains("public init(\n        x: Int\n    ) {"));
//! ```

pub use attributes::*;
pub use classifier::*;
pub use config::*;
pub use diagnostic::*;
pub use engine::*;
pub use error::*;
pub use parser::*;
pub use position::*;
pub use project::*;
pub use resolver::*;
pub use syntax::*;
pub use synthesizer::*;
pub use validator::*;

mod attributes;
mod classifier;
pub mod config;
mod diagnostic;
mod engine;
#[allow(unused_assignments)]
mod error;
pub mod lexer;
mod parser;
mod position;
pub mod project;
mod resolver;
mod syntax;
mod synthesizer;
pub mod tokens;
mod validator;

#[cfg(test)]
mod __fixtures;
