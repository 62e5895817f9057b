//! Handles, errors, configuration, and name pattern parsing for cppdecl.
//!
//! This crate provides:
//! - [`DeclId`] - Generational declaration handles
//! - [`Error`] - Rich error types with context
//! - [`PatternParser`] - Bracket-aware splitting of template and call names
//! - [`ContainerTraits`] - Standard container recognition at the name level
//! - [`ModelConfig`] / [`QueryConfig`] - Tree and query configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod containers;
pub mod error;
pub mod id;
pub mod location;
pub mod pattern;

pub use config::{ModelConfig, QueryConfig};
pub use containers::{
    ALL_CONTAINER_TRAITS, ContainerKind, ContainerTraits, DefaultEraser, STD_NAMESPACES,
    find_container_traits, is_std_ostream_name, is_std_string_name, is_std_wostream_name,
    is_std_wstring_name,
};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use id::DeclId;
pub use location::{Location, is_absolute_path, normalize_path};
pub use pattern::{PatternParser, Split, is_call_invocation, is_instantiation};
