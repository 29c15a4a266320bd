//! Core building blocks shared across the crate

pub mod error;
