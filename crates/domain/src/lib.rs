//! Domain layer for the storefront backend.
//!
//! This crate contains:
//! - Domain models (Product, Collection, Order, Testimonial, Notice)
//! - Business rules: licence durations, currency normalization, download links
//! - The payment gateway abstraction

pub mod models;
pub mod services;
