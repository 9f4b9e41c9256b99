//! Platform code generation for Prism.
//!
//! Turns a validated [`prism_core::TokenSchema`] into source artifacts for one
//! target platform:
//!
//! - type mapping from abstract descriptors to each target's type syntax
//! - template resolution (Handlebars) with fallback to built-in generators
//! - token, theme and helper emission per platform
//! - artifact assembly into a file manifest
//!
//! Each built-in platform is a [`PlatformBackend`] strategy driven by the
//! generic [`StandardAdapter`]. Adapters live in an [`AdapterRegistry`].
//!
//! # Example
//!
//! ```ignore
//! use prism_codegen::{AdapterRegistry, NoTemplates, TransformOptions};
//! use std::sync::Arc;
//!
//! let registry = AdapterRegistry::with_builtins(Arc::new(NoTemplates));
//! let adapter = registry.resolve("react")?;
//! let result = adapter.transform(&schema, &TransformOptions::default()).await?;
//! for file in &result.files.files {
//!     println!("{}", file.path);
//! }
//! ```

pub mod adapter;
pub mod assemble;
pub mod backend;
pub mod context;
pub mod error;
pub mod recommendations;
pub mod registry;
pub mod resolve;
pub mod result;
pub mod source;
pub mod templates;
pub mod typemap;
pub mod values;

pub use adapter::{GeneratedComponent, PlatformAdapter, StandardAdapter};
pub use assemble::{ArtifactAssembler, ArtifactKind, FileManifest, ManifestEntry};
pub use backend::{Artifact, PlatformBackend};
pub use context::ComponentContext;
pub use error::{CodegenError, Result, UnmappableTypeError};
pub use recommendations::Recommendations;
pub use registry::AdapterRegistry;
pub use resolve::{CodeOrigin, ResolvedCode, TemplateResolver};
pub use result::{ComponentFailure, TransformOptions, TransformationResult};
pub use source::{FsTemplateSource, MemoryTemplateSource, NoTemplates, TemplateSource};
pub use templates::TemplateEngine;
pub use typemap::{map_type, mapper_for, TypeMapper};
