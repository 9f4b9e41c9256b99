//! Transformation engine for Prism.
//!
//! The [`Orchestrator`] turns a Universal Token Schema into a
//! [`TransformationResult`] for one target platform. Results are memoized in
//! a content-addressed LRU ([`TransformCache`]); concurrent identical requests
//! share a single computation.
//!
//! # Example
//!
//! ```ignore
//! use prism_engine::{init_tracing, EngineConfig, Orchestrator};
//!
//! let config = EngineConfig::load(None)?;
//! init_tracing(&config);
//! let engine = Orchestrator::from_config(&config);
//! let result = engine.transform(&schema, "ios-swift").await?;
//! println!("{}", result.components["Button"]);
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod orchestrator;

pub use cache::{CacheKey, CacheStats, TransformCache};
pub use config::{ConfigError, EngineConfig};
pub use error::{EngineError, Result};
pub use logging::init_tracing;
pub use orchestrator::Orchestrator;

pub use prism_codegen::{
    AdapterRegistry, ArtifactKind, FileManifest, PlatformAdapter, TransformOptions,
    TransformationResult,
};
pub use prism_core::{PlatformId, TokenSchema};
