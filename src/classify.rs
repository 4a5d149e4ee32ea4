//! Turning an HTTP response into a decoded value or a typed error.
//!
//! Classification is a pure function of the status, the raw body and the
//! configured username. It keeps no state between calls.
//!
//! ### Rules
//! ```text
//! 2xx          => body must be JSON, returned as is
//! 204          => empty body is allowed and yields null
//! 403          => Unauthorized, body never read
//! anything else => body must be JSON with error_code and message
//! ```

use reqwest::StatusCode;
use serde_derive::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result, ResponseError};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error_code: i64,
    message: String,
}

/// Classify one response.
///
/// `username` only changes the message of an [`Error::Unauthorized`].
///
/// ### Example
/// ```rust
/// use kafka_rest::prelude::{classify, StatusCode};
///
/// let value = classify(StatusCode::OK, br#"{"brokers":[1,2,3]}"#, None).unwrap();
/// assert_eq!(value["brokers"][0], 1);
/// ```
pub fn classify(status: StatusCode, body: &[u8], username: Option<&str>) -> Result<Value> {
    if status.is_success() {
        if status == StatusCode::NO_CONTENT && body.is_empty() {
            return Ok(Value::Null);
        }
        return parse_json(body);
    }

    if status == StatusCode::FORBIDDEN {
        let message = match username {
            None => "Unauthorized".to_string(),
            Some(username) => format!("User `{}` failed to authenticate", username),
        };
        return Err(Error::Unauthorized {
            code: status.as_u16(),
            message,
        });
    }

    let data = parse_json(body)?;
    let ErrorBody {
        error_code,
        message,
    } = serde_json::from_value(data).map_err(|err| Error::MalformedResponse(err.to_string()))?;

    Err(Error::Response(ResponseError::new(error_code, message)))
}

fn parse_json(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body).map_err(|err| {
        tracing::trace!("Failed parsing body {:?}", String::from_utf8_lossy(body));
        Error::MalformedResponse(err.to_string())
    })
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::error::ResponseErrorKind;

    fn response_error(status: u16, body: &str) -> ResponseError {
        let status = StatusCode::from_u16(status).unwrap();
        match classify(status, body.as_bytes(), None) {
            Err(Error::Response(err)) => err,
            other => panic!("expected a response error, got {:?}", other),
        }
    }

    #[test]
    fn success_returns_body_unchanged() {
        let value = classify(StatusCode::OK, br#"{"brokers":[1,2,3]}"#, None).unwrap();
        assert_eq!(value, json!({"brokers": [1, 2, 3]}));
    }

    #[test]
    fn success_does_not_check_shape() {
        let value = classify(StatusCode::OK, b"42", None).unwrap();
        assert_eq!(value, json!(42));
    }

    #[test]
    fn success_with_invalid_json_is_malformed() {
        let err = classify(StatusCode::OK, b"<html>", None).unwrap_err();
        match err {
            Error::MalformedResponse(msg) => assert!(msg.contains("expected value")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn empty_body_is_malformed_unless_no_content() {
        assert!(matches!(
            classify(StatusCode::OK, b"", None),
            Err(Error::MalformedResponse(_))
        ));
        assert_eq!(
            classify(StatusCode::NO_CONTENT, b"", None).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn forbidden_without_username() {
        let err = classify(StatusCode::FORBIDDEN, b"", None).unwrap_err();
        assert_eq!(err.to_string(), "Unauthorized (error code 403)");
    }

    #[test]
    fn forbidden_with_username() {
        let err = classify(StatusCode::FORBIDDEN, b"not json", Some("alice")).unwrap_err();
        assert!(matches!(err, Error::Unauthorized { code: 403, .. }));
        assert_eq!(
            err.to_string(),
            "User `alice` failed to authenticate (error code 403)"
        );
    }

    #[test]
    fn forbidden_ignores_error_body() {
        let body = br#"{"error_code":40401,"message":"Topic not found"}"#;
        let err = classify(StatusCode::FORBIDDEN, body, None).unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));
    }

    #[test]
    fn topic_not_found() {
        let err = response_error(404, r#"{"error_code":40401,"message":"Topic not found"}"#);
        assert_eq!(err.kind, ResponseErrorKind::TopicNotFound);
        assert_eq!(err.code, 40401);
        assert_eq!(err.to_string(), "Topic not found (error code 40401)");
    }

    #[test]
    fn every_known_code_maps_to_its_kind() {
        let table = [
            (404, 40401, ResponseErrorKind::TopicNotFound),
            (404, 40402, ResponseErrorKind::PartitionNotFound),
            (422, 422, ResponseErrorKind::UnprocessableEntity),
            (500, 50001, ResponseErrorKind::ZookeeperError),
            (500, 50002, ResponseErrorKind::KafkaError),
            (500, 50003, ResponseErrorKind::RetriableKafkaError),
            (500, 50101, ResponseErrorKind::SslEndpointError),
        ];
        for (status, code, kind) in table {
            let body = json!({"error_code": code, "message": "boom"}).to_string();
            let err = response_error(status, &body);
            assert_eq!(err.kind, kind);
            assert_eq!(err.code, code);
            assert_eq!(err.message, "boom");
        }
    }

    #[test]
    fn unknown_code_is_generic() {
        let err = response_error(500, r#"{"error_code":99999,"message":"oops"}"#);
        assert_eq!(err.kind, ResponseErrorKind::Generic);
        assert_eq!(err.code, 99999);
        assert_eq!(err.to_string(), "oops (error code 99999)");
    }

    #[test]
    fn code_table_ignores_http_status() {
        // a known code on an unusual status still maps by code
        let err = response_error(400, r#"{"error_code":50003,"message":"retry"}"#);
        assert_eq!(err.kind, ResponseErrorKind::RetriableKafkaError);
    }

    #[test]
    fn error_status_with_invalid_json_is_malformed() {
        let err = classify(StatusCode::INTERNAL_SERVER_ERROR, b"Bad Gateway", None).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn error_status_with_missing_fields_is_malformed() {
        for body in [
            r#"{"message":"no code"}"#,
            r#"{"error_code":40401}"#,
            r#"{"error_code":"40401","message":"string code"}"#,
            "[]",
        ] {
            let err = classify(StatusCode::NOT_FOUND, body.as_bytes(), None).unwrap_err();
            assert!(
                matches!(err, Error::MalformedResponse(_)),
                "{} gave {:?}",
                body,
                err
            );
        }
    }

    #[test]
    fn classification_is_repeatable() {
        let body = br#"{"error_code":50002,"message":"Kafka error"}"#;
        let first = classify(StatusCode::INTERNAL_SERVER_ERROR, body, None).unwrap_err();
        for _ in 0..10 {
            let again = classify(StatusCode::INTERNAL_SERVER_ERROR, body, None).unwrap_err();
            assert_eq!(again.response_error(), first.response_error());
        }

        let ok = classify(StatusCode::OK, br#"["a","b"]"#, None).unwrap();
        assert_eq!(classify(StatusCode::OK, br#"["a","b"]"#, None).unwrap(), ok);
    }
}
