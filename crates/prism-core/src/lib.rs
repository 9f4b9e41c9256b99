//! Core intermediate representation for the Prism design-system engine.
//!
//! This crate holds everything that is independent of a target platform:
//!
//! - the Universal Token Schema (design tokens plus component specifications)
//! - abstract prop type descriptors
//! - token tree flattening and reference resolution
//! - shape validation of schemas and component specifications
//!
//! # Example
//!
//! ```ignore
//! use prism_core::{FlatTokens, TokenSchema};
//!
//! let schema = TokenSchema::from_json(json)?;
//! let tokens = FlatTokens::resolve(&schema.tokens)?;
//! for (name, value) in tokens.pairs() {
//!     println!("--{}: {};", name, value);
//! }
//! ```

pub mod errors;
pub mod platform;
pub mod schema;
pub mod tokens;
pub mod types;
pub mod validate;

pub use errors::{SchemaError, SpecError};
pub use platform::{BuiltinPlatform, PlatformFamily, PlatformId};
pub use schema::{
    AccessibilitySpec, ComponentCategory, ComponentSpec, CompoundVariant, DesignTokens,
    Deprecation, KeyboardInteraction, PlatformSupport, PropDefinition, TokenLayer, TokenSchema,
    Variants,
};
pub use tokens::{flatten, FlatToken, FlatTokens, TokenGroup, TokenNode, TokenValue, SEPARATOR};
pub use types::{
    value_label, ComplexType, CustomType, DescriptorKind, FunctionSignature, PrimitiveType,
    TypeDescriptor,
};
pub use validate::{validate_component, validate_schema, ValidatedSchema};
