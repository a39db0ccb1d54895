//! s3h-core: Core library for the s3helper client
//!
//! This crate provides the SDK-independent parts of s3helper:
//! - Configuration management
//! - The ObjectStore trait for bucket, object and policy operations
//! - Bucket policy documents and templates
//! - Path helpers for uploads
//!
//! Nothing here talks to the network, so the helper can be exercised
//! against a test double of [`ObjectStore`].

pub mod config;
pub mod error;
pub mod path;
pub mod policy;
pub mod traits;

pub use config::{ClientConfig, Config, ConfigManager, DemoConfig, PolicyConfig};
pub use error::{Error, Result};
pub use path::object_key_for_upload;
pub use policy::{Effect, PolicyDocument, PolicyTemplate, Principal, Statement};
pub use traits::{BucketInfo, ListResult, ObjectInfo, ObjectStore};

#[cfg(any(test, feature = "mock"))]
pub use traits::MockObjectStore;
