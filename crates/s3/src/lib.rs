//! s3h-s3: aws-sdk-s3 adapter for s3helper
//!
//! Implements [`s3h_core::ObjectStore`] on top of the AWS SDK for Rust and
//! maps SDK errors onto [`s3h_core::Error`].

mod client;
mod error;

pub use client::S3Client;
