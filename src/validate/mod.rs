//! Request validation pipeline stage
//!
//! [`RequestValidator`] gates a request on conformance of one data source
//! (body, query string, or path parameters) to a declared schema. It is
//! stateless once built: clone it freely and share it across routes and
//! concurrent requests.
//!
//! The per-request contract, expressed as [`StageOutcome`]:
//!
//! - `Proceed`: the selected source has been replaced with its normalized
//!   form; continue down the pipeline.
//! - `Rejected`: the input violates the schema; answer 400 with the ordered
//!   field errors and do not continue.
//! - `Failed`: the engine faulted; nothing was written, the intact error is
//!   for a generic error handler further down the pipeline.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::core::error::FieldError;
use crate::schema::{Schema, SchemaError};

pub mod layer;

/// Which request data source a validator examines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Source {
    /// The JSON request body
    #[default]
    Body,
    /// The URL query string
    Query,
    /// The router path parameters
    Params,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Body => "body",
            Source::Query => "query",
            Source::Params => "params",
        }
    }
}

/// Per-request state: the three independent data slots a validator can target
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestData {
    pub body: Value,
    pub query: Value,
    pub params: Value,
}

impl RequestData {
    pub fn get(&self, source: Source) -> &Value {
        match source {
            Source::Body => &self.body,
            Source::Query => &self.query,
            Source::Params => &self.params,
        }
    }

    pub fn set(&mut self, source: Source, value: Value) {
        match source {
            Source::Body => self.body = value,
            Source::Query => self.query = value,
            Source::Params => self.params = value,
        }
    }
}

/// Result of running a validator against one request
#[derive(Debug)]
pub enum StageOutcome {
    /// Validation passed; the selected source was normalized in place
    Proceed,
    /// The input violates the schema; field errors in engine order
    Rejected(Vec<FieldError>),
    /// The engine faulted; the error is carried intact for a generic handler
    Failed(anyhow::Error),
}

/// A reusable pipeline stage validating one request data source
#[derive(Clone)]
pub struct RequestValidator {
    schema: Arc<dyn Schema>,
    source: Source,
}

impl RequestValidator {
    /// Build a validator for the request body
    pub fn new(schema: impl Schema + 'static) -> Self {
        Self::from_arc(Arc::new(schema))
    }

    pub fn from_arc(schema: Arc<dyn Schema>) -> Self {
        Self {
            schema,
            source: Source::default(),
        }
    }

    /// Select which data source this validator examines
    pub fn source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    pub fn source_kind(&self) -> Source {
        self.source
    }

    /// Validate one request's data
    ///
    /// On success exactly the selected slot of `data` is overwritten with the
    /// normalized value; the other two are untouched. On any failure `data`
    /// is left as-is.
    pub async fn run(&self, data: &mut RequestData) -> StageOutcome {
        let raw = data.get(self.source).clone();
        match self.schema.parse(raw).await {
            Ok(normalized) => {
                data.set(self.source, normalized);
                debug!(source = self.source.as_str(), "request data validated");
                StageOutcome::Proceed
            }
            Err(SchemaError::Invalid(errors)) => {
                warn!(
                    source = self.source.as_str(),
                    violations = errors.len(),
                    "request data rejected"
                );
                StageOutcome::Rejected(errors)
            }
            Err(SchemaError::Engine(err)) => StageOutcome::Failed(err),
        }
    }
}
