//! Binding-signature generator for introspectable operation registries.
//!
//! Walks the operation class tree of a registry and produces one C++ member
//! declaration per concrete operation, in the style of the libvips `VImage`
//! bindings:
//!
//! ```text
//! VImage add( VImage right, VOption *options = 0 );
//! ```
//!
//! ## Pipeline
//!
//! - `registry`: read-only registry interface plus a manifest-backed adapter
//! - `classify`: required set, priority order, receiver and result selection
//! - `codegen`: type resolution into the declaration IR
//! - `emit`: declaration IR -> text (via the `Emit` trait)
//! - `walk`: pre-order traversal with nickname deduplication
//! - `sink`: where the lines go

pub mod classify;
pub mod codegen;
pub mod config;
pub mod emit;
pub mod error;
pub mod registry;
pub mod sink;
pub mod types;
pub mod walk;

pub use config::GeneratorConfig;
pub use error::{GenerateError, Result};
pub use registry::manifest::{Manifest, ManifestRegistry};
pub use registry::{ArgumentFlags, OperationRegistry, Property, ValueTypeKind};
pub use sink::{DeclarationSink, WriterSink};
pub use types::TypeMapper;
pub use walk::{GenerationContext, GenerationReport, Generator, generate};
