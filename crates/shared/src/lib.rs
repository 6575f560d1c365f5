//! Shared utilities for the storefront backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic utilities (webhook signatures, secret comparison)
//! - Common validation logic
//! - Slug handling

pub mod crypto;
pub mod validation;
