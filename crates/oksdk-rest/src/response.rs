//! Response contract and adapters.
//!
//! The remote side reports every call as `(status, data, error)`. The
//! adapters here fold that into a success branch and a failure branch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RestError, Result};

/// Status literal reported by the remote endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Ok,
    Error,
}

impl CallStatus {
    /// Interpret a status literal. Only `"ok"` is success.
    pub fn from_literal(literal: &str) -> Self {
        if literal == "ok" {
            CallStatus::Ok
        } else {
            CallStatus::Error
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Ok => "ok",
            CallStatus::Error => "error",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CallStatus::Ok)
    }
}

/// Raw completion handler: receives `(status, data, error)` once.
pub type RestHandler = Box<dyn FnOnce(CallStatus, Value, Value) + Send + 'static>;

/// Success branch of a wrapped callback.
pub type SuccessHandler<T> = Box<dyn FnOnce(T) + Send + 'static>;

/// Failure branch of a wrapped callback; receives the error payload.
pub type FailureHandler = Box<dyn FnOnce(Value) + Send + 'static>;

/// Box a closure as a [`RestHandler`].
pub fn handler<F>(f: F) -> RestHandler
where
    F: FnOnce(CallStatus, Value, Value) + Send + 'static,
{
    Box::new(f)
}

/// A completed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestResponse {
    pub status: CallStatus,
    pub data: Value,
    pub error: Value,
}

impl RestResponse {
    pub fn new(status: CallStatus, data: Value, error: Value) -> Self {
        Self { status, data, error }
    }

    /// `Ok(data)` on success, `Err(RestError::Remote(error))` otherwise.
    pub fn into_result(self) -> Result<Value> {
        match self.status {
            CallStatus::Ok => Ok(self.data),
            CallStatus::Error => Err(RestError::Remote(self.error)),
        }
    }
}

/// Adapt success/failure handlers into a [`RestHandler`].
pub fn wrap_callback(
    success: Option<SuccessHandler<Value>>,
    failure: Option<FailureHandler>,
) -> RestHandler {
    wrap_callback_with(success, failure, Ok)
}

/// Like [`wrap_callback`], transforming the data before the success branch.
///
/// A processor that rejects the data routes its `Err` payload to the
/// failure branch.
pub fn wrap_callback_with<T, P>(
    success: Option<SuccessHandler<T>>,
    failure: Option<FailureHandler>,
    processor: P,
) -> RestHandler
where
    T: 'static,
    P: FnOnce(Value) -> std::result::Result<T, Value> + Send + 'static,
{
    Box::new(move |status: CallStatus, data: Value, error: Value| {
        let outcome = match status {
            CallStatus::Ok => processor(data),
            CallStatus::Error => Err(error),
        };
        match outcome {
            Ok(value) => {
                if let Some(success) = success {
                    success(value);
                }
            }
            Err(error) => {
                if let Some(failure) = failure {
                    failure(error);
                }
            }
        }
    })
}

/// Render a payload for messages: strings verbatim, anything else as JSON.
pub fn payload_to_string(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_status_literal() {
        assert_eq!(CallStatus::from_literal("ok"), CallStatus::Ok);
        assert_eq!(CallStatus::from_literal("error"), CallStatus::Error);
        assert_eq!(CallStatus::from_literal("OK"), CallStatus::Error);
        assert_eq!(CallStatus::Ok.as_str(), "ok");
    }

    #[test]
    fn test_wrap_routes_success() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let handler = wrap_callback(
            Some(Box::new(move |data: Value| *sink.lock().unwrap() = Some(data))),
            Some(Box::new(|_: Value| panic!("failure branch must not run"))),
        );

        handler(CallStatus::Ok, json!({"uid": "1"}), Value::Null);
        assert_eq!(*seen.lock().unwrap(), Some(json!({"uid": "1"})));
    }

    #[test]
    fn test_wrap_routes_failure() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let handler = wrap_callback(
            Some(Box::new(|_: Value| panic!("success branch must not run"))),
            Some(Box::new(move |error: Value| *sink.lock().unwrap() = Some(error))),
        );

        handler(CallStatus::Error, Value::Null, json!({"error_code": 100}));
        assert_eq!(*seen.lock().unwrap(), Some(json!({"error_code": 100})));
    }

    #[test]
    fn test_missing_handlers_are_noops() {
        wrap_callback(None, None)(CallStatus::Ok, json!(1), Value::Null);
        wrap_callback(None, None)(CallStatus::Error, Value::Null, json!("boom"));
    }

    fn counting_handler(seen: &Arc<Mutex<Vec<String>>>) -> RestHandler {
        let sink = Arc::clone(seen);
        let fail_sink = Arc::clone(seen);
        let on_ok: SuccessHandler<u64> =
            Box::new(move |n: u64| sink.lock().unwrap().push(format!("ok:{n}")));
        let on_err: FailureHandler =
            Box::new(move |e: Value| fail_sink.lock().unwrap().push(format!("err:{e}")));
        wrap_callback_with(Some(on_ok), Some(on_err), |data: Value| {
            data.as_u64().ok_or_else(|| json!("not a number"))
        })
    }

    #[test]
    fn test_processor_transforms_and_rejects() {
        let seen = Arc::new(Mutex::new(Vec::new()));

        counting_handler(&seen)(CallStatus::Ok, json!(7), Value::Null);
        counting_handler(&seen)(CallStatus::Ok, json!("seven"), Value::Null);
        counting_handler(&seen)(CallStatus::Error, Value::Null, json!(3));

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["ok:7", "err:\"not a number\"", "err:3"]
        );
    }

    #[test]
    fn test_into_result() {
        let ok = RestResponse::new(CallStatus::Ok, json!([1, 2]), Value::Null);
        assert_eq!(ok.into_result().unwrap(), json!([1, 2]));

        let err = RestResponse::new(CallStatus::Error, Value::Null, json!("denied"));
        assert!(matches!(err.into_result(), Err(RestError::Remote(v)) if v == json!("denied")));
    }

    #[test]
    fn test_payload_to_string() {
        assert_eq!(payload_to_string(&json!("plain")), "plain");
        assert_eq!(payload_to_string(&json!({"a": 1})), "{\"a\":1}");
    }
}
