//! Build-time schema synthesis.
//!
//! Merge a base JSON Schema with an optional overlay, persist a normalized
//! copy, compile it to TypeScript declarations and derive an input-defaults
//! module from the generated declaration.
//!
//! ```text
//! schema JSON ─ load ─ merge (+order) ─ allowlist ─▶ normalized schema
//!                                                      │
//!                                  TypeCompiler ◀──────┘
//!                                      │
//!                     params (structured or parsed) ─ synthesize ─▶ defaults module
//! ```

pub mod allowlist;
pub mod cli;
pub mod codegen;
pub mod compiler;
pub mod config;
pub mod defaults;
pub mod error;
pub mod ir;
pub mod lower;
pub mod merge;
pub mod params;
pub mod path_de;
pub mod pipeline;
pub mod schema;

pub use compiler::{BuiltinCompiler, CommandCompiler, Compiled, TypeCompiler};
pub use config::Settings;
pub use defaults::{synthesize, DefaultsSpec, HostEnv};
pub use error::{Result, SynthError};
pub use merge::{merge, MergePolicy};
pub use params::{parse_params, ParsedParam};
