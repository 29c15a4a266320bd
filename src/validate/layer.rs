//! Tower middleware wiring [`RequestValidator`] into an Axum router
//!
//! [`ValidateLayer`] is attached per-route. For each request it extracts the
//! selected data source, runs the validator, and either forwards the request
//! with the normalized data, answers 400 with the structured rejection, or
//! hands an unexpected fault to the configured fault handler.
//!
//! Handlers read the normalized value through the [`Validated`] extractor.
//! When the source is the body, the request body itself is also rewritten
//! with the normalized JSON so plain `Json<T>` extractors observe it too.

use std::collections::HashMap;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::Json;
use axum::body::{Body, to_bytes};
use axum::extract::{FromRequestParts, Query, RawPathParams, Request};
use axum::http::{HeaderValue, StatusCode, header, request::Parts};
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;
use serde_json::{Map, Value, json};
use tower::{Layer, Service};

use crate::core::error::{FieldError, LivraError, ValidationRejection};
use crate::schema::Schema;
use crate::validate::{RequestData, RequestValidator, Source, StageOutcome};

type FaultHandler = Arc<dyn Fn(anyhow::Error) -> Response + Send + Sync>;

/// Normalized request data, exposed to handlers as a request extension
#[derive(Debug, Clone)]
pub struct Validated {
    pub source: Source,
    pub value: Value,
}

impl<S> FromRequestParts<S> for Validated
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Validated>().cloned().ok_or_else(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Validated extractor used on a route without a ValidateLayer"
                })),
            )
                .into_response()
        })
    }
}

/// Per-route validation middleware
///
/// Cloneable and stateless once built; attach the same layer to any number of
/// routes.
#[derive(Clone)]
pub struct ValidateLayer {
    validator: RequestValidator,
    on_fault: FaultHandler,
}

impl ValidateLayer {
    /// Validate the JSON request body against `schema`
    pub fn new(schema: impl Schema + 'static) -> Self {
        Self::with_validator(RequestValidator::new(schema))
    }

    pub fn with_validator(validator: RequestValidator) -> Self {
        Self {
            validator,
            on_fault: Arc::new(|err| LivraError::Internal(err).into_response()),
        }
    }

    /// Select which data source to validate
    pub fn source(mut self, source: Source) -> Self {
        self.validator = self.validator.source(source);
        self
    }

    /// Replace the handler invoked for unexpected engine faults
    ///
    /// The default logs the fault and answers a generic 500 without internal
    /// detail.
    pub fn on_fault(
        mut self,
        handler: impl Fn(anyhow::Error) -> Response + Send + Sync + 'static,
    ) -> Self {
        self.on_fault = Arc::new(handler);
        self
    }
}

impl<S> Layer<S> for ValidateLayer {
    type Service = ValidateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ValidateService {
            inner,
            validator: self.validator.clone(),
            on_fault: self.on_fault.clone(),
        }
    }
}

/// The service produced by [`ValidateLayer`]
#[derive(Clone)]
pub struct ValidateService<S> {
    inner: S,
    validator: RequestValidator,
    on_fault: FaultHandler,
}

impl<S> Service<Request> for ValidateService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let validator = self.validator.clone();
        let on_fault = self.on_fault.clone();

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();

            let query = query_value(&parts);
            let params = params_value(&mut parts).await;

            // The body is buffered only when it is the validated source; for
            // the other sources it passes through byte-identical.
            let source = validator.source_kind();
            let (body_value, passthrough) = if source == Source::Body {
                let bytes = match to_bytes(body, usize::MAX).await {
                    Ok(bytes) => bytes,
                    Err(err) => return Ok(on_fault(anyhow::Error::new(err))),
                };
                if bytes.is_empty() {
                    (Value::Null, None)
                } else {
                    match serde_json::from_slice(&bytes) {
                        Ok(value) => (value, None),
                        Err(err) => {
                            let rejection = ValidationRejection::new(vec![FieldError::root(
                                format!("JSON invalide: {}", err),
                            )]);
                            return Ok(rejection.into_response());
                        }
                    }
                }
            } else {
                (Value::Null, Some(body))
            };

            let mut data = RequestData {
                body: body_value,
                query,
                params,
            };

            match validator.run(&mut data).await {
                StageOutcome::Proceed => {
                    let body = match passthrough {
                        Some(body) => body,
                        None => {
                            let bytes = match serde_json::to_vec(&data.body) {
                                Ok(bytes) => bytes,
                                Err(err) => return Ok(on_fault(anyhow::Error::new(err))),
                            };
                            parts.headers.insert(
                                header::CONTENT_TYPE,
                                HeaderValue::from_static("application/json"),
                            );
                            parts
                                .headers
                                .insert(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()));
                            Body::from(bytes)
                        }
                    };
                    parts.extensions.insert(Validated {
                        source,
                        value: data.get(source).clone(),
                    });
                    inner.call(Request::from_parts(parts, body)).await
                }
                StageOutcome::Rejected(errors) => {
                    Ok(ValidationRejection::new(errors).into_response())
                }
                StageOutcome::Failed(err) => Ok(on_fault(err)),
            }
        })
    }
}

/// Parse the query string into a JSON object of string values
fn query_value(parts: &Parts) -> Value {
    match Query::<HashMap<String, String>>::try_from_uri(&parts.uri) {
        Ok(Query(map)) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        ),
        Err(_) => Value::Object(Map::new()),
    }
}

/// Collect the router path parameters into a JSON object of string values
///
/// Empty when the request did not go through a router (or the route has no
/// parameters).
async fn params_value(parts: &mut Parts) -> Value {
    match RawPathParams::from_request_parts(parts, &()).await {
        Ok(params) => Value::Object(
            params
                .iter()
                .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
                .collect(),
        ),
        Err(_) => Value::Object(Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts_for(uri: &str) -> Parts {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request")
            .into_parts()
            .0
    }

    #[test]
    fn test_query_value_parses_pairs() {
        let parts = parts_for("/search?q=couscous&page=2");
        let value = query_value(&parts);
        assert_eq!(value["q"], "couscous");
        assert_eq!(value["page"], "2");
    }

    #[test]
    fn test_query_value_empty_without_query() {
        let parts = parts_for("/search");
        assert_eq!(query_value(&parts), serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_params_value_empty_without_router() {
        let mut parts = parts_for("/orders/7");
        assert_eq!(params_value(&mut parts).await, serde_json::json!({}));
    }

    #[tokio::test]
    async fn test_validated_extractor_requires_layer() {
        let mut parts = parts_for("/orders");
        let result = Validated::from_request_parts(&mut parts, &()).await;
        assert!(result.is_err());
    }
}
