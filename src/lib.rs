//! # Livra
//!
//! Schema validation and request normalization middleware for Axum APIs.
//!
//! ## Features
//!
//! - **Declarative Schemas**: Build object schemas from reusable field
//!   validators and normalization filters
//! - **Parse, Don't Validate**: On success the raw request data is replaced
//!   with the schema-normalized value
//! - **Three Sources**: Validate the JSON body, the query string, or the
//!   path parameters of a request
//! - **Structured Rejections**: Schema violations answer `400` with a uniform
//!   JSON shape carrying dotted field paths and per-field messages
//! - **Fault Isolation**: Unexpected engine faults are never swallowed into
//!   the 400 shape; they reach a generic fault handler intact
//! - **Stateless Middleware**: A built layer is cloneable and safely shared
//!   across routes and concurrent requests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use livra::prelude::*;
//!
//! let schema = ObjectSchema::new()
//!     .field(
//!         "name",
//!         FieldSchema::required()
//!             .filter(trim())
//!             .validate(non_empty()),
//!     )
//!     .field(
//!         "age",
//!         FieldSchema::required()
//!             .validate(integer())
//!             .validate(min_value(0.0)),
//!     );
//!
//! let app = Router::new().route(
//!     "/orders",
//!     post(create_order).layer(ValidateLayer::new(schema)),
//! );
//!
//! async fn create_order(Validated { value, .. }: Validated) -> Json<Value> {
//!     // `value` is already validated and normalized
//!     Json(value)
//! }
//! ```

pub mod core;
pub mod schema;
pub mod validate;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Errors ===
    pub use crate::core::error::{FieldError, LivraError, ValidationRejection};

    // === Schema engine ===
    pub use crate::schema::{
        FieldSchema, ObjectSchema, Schema, SchemaError,
        filters::{lowercase, round_decimals, trim, uppercase},
        validators::{
            date_format, in_list, integer, matches, max_value, min_value, non_empty, optional,
            positive, required, string_length, uuid_format,
        },
    };

    // === Validation pipeline ===
    pub use crate::validate::{
        RequestData, RequestValidator, Source, StageOutcome,
        layer::{Validated, ValidateLayer},
    };

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};

    // === Axum ===
    pub use axum::{
        Json, Router,
        routing::{delete, get, post, put},
    };
}
