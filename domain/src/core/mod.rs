//! Core domain concepts shared across all subdomains.
//!
//! - [`image::ImageReference`]: the scan a session evaluates
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod image;
pub mod string;
