//! Cloud Controller error taxonomy.
//!
//! Statuses 401, 403 and 404 always map to the same variant whatever the body says; the
//! rest are refined by the `error_code` (v2) or `errors[].title` (v3) in the body.

use serde::Deserialize;
use thiserror::Error;

/// One entry of a v3 `{"errors": [...]}` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct V3ErrorDetail {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CcError {
    #[error("{message}")]
    Request { message: String },

    #[error("x509: certificate signed by unknown authority ({url})")]
    UnverifiedServer { url: String },

    #[error("Hostname does not match SSL Certificate ({message})")]
    SslValidationHostname { message: String },

    #[error("Unable to find a Cloud Foundry API at {url}")]
    ApiNotFound { url: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("{message}")]
    ResourceNotFound { message: String },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    NotStaged { message: String },

    #[error("{message}")]
    InstancesError { message: String },

    #[error("{message}")]
    InvalidRelation { message: String },

    #[error("{message}")]
    AppStoppedStats { message: String },

    #[error("{message}")]
    OrganizationNameTaken { message: String },

    #[error("{message}")]
    SpaceNameTaken { message: String },

    #[error("{message}")]
    ServiceInstanceNameTaken { message: String },

    #[error("{message}")]
    UnprocessableEntity { message: String },

    #[error("{message}")]
    TaskWorkersUnavailable { message: String },

    #[error("{message}")]
    ServiceBrokerCatalogInvalid { message: String },

    #[error("{message}")]
    ServiceBrokerRequestRejected { message: String },

    #[error("{message}")]
    ServiceBrokerBadResponse { message: String },

    #[error("Unexpected Response\nResponse code: {status}\nCC error code: {error_code}\nDescription:   {description}")]
    V2UnexpectedResponse {
        status: u16,
        description: String,
        error_code: String,
    },

    #[error("Unexpected Response\nResponse code: {status}\n{}", summarize(.errors))]
    V3UnexpectedResponse {
        status: u16,
        errors: Vec<V3ErrorDetail>,
    },

    #[error("Multiple errors occurred:\n{}", summarize(.errors))]
    MultiError {
        status: u16,
        errors: Vec<V3ErrorDetail>,
    },

    #[error("Request error: status {status}, body: {body}")]
    UnknownHttpSource { status: u16, body: String },

    #[error("Invalid JSON response from server: {message}")]
    Json { message: String },
}

fn summarize(errors: &[V3ErrorDetail]) -> String {
    errors
        .iter()
        .map(|e| format!("Code: {}, Title: {}, Detail: {}", e.code, e.title, e.detail))
        .collect::<Vec<_>>()
        .join("\n")
}

impl CcError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CcError::ResourceNotFound { .. })
    }
}

#[derive(Deserialize)]
struct V2ErrorBody {
    #[serde(default)]
    description: String,
    #[serde(default)]
    error_code: String,
}

#[derive(Deserialize)]
struct V3ErrorBody {
    #[serde(default)]
    errors: Vec<V3ErrorDetail>,
}

/// Maps a failed `/v2` response to an error.
pub fn v2_error(status: u16, body: &str) -> CcError {
    match status {
        401 => return CcError::Unauthorized { message: body.to_string() },
        403 => return CcError::Forbidden { message: body.to_string() },
        404 => return CcError::ResourceNotFound { message: body.to_string() },
        _ => {}
    }

    let Ok(parsed) = serde_json::from_str::<V2ErrorBody>(body) else {
        return CcError::UnknownHttpSource {
            status,
            body: body.to_string(),
        };
    };
    let message = parsed.description.clone();

    match (status, parsed.error_code.as_str()) {
        (400, "CF-NotStaged") => CcError::NotStaged { message },
        (400, "CF-InstancesError") => CcError::InstancesError { message },
        (400, "CF-InvalidRelation") => CcError::InvalidRelation { message },
        (400, "CF-AppStoppedStatsError") => CcError::AppStoppedStats { message },
        (400, "CF-OrganizationNameTaken") => CcError::OrganizationNameTaken { message },
        (400, "CF-SpaceNameTaken") => CcError::SpaceNameTaken { message },
        (400, "CF-ServiceInstanceNameTaken") => CcError::ServiceInstanceNameTaken { message },
        (400, _) => CcError::BadRequest { message },
        (422, _) => CcError::UnprocessableEntity { message },
        (502, "CF-ServiceBrokerCatalogInvalid") => CcError::ServiceBrokerCatalogInvalid { message },
        (502, "CF-ServiceBrokerRequestRejected") => {
            CcError::ServiceBrokerRequestRejected { message }
        }
        (502, "CF-ServiceBrokerBadResponse") => CcError::ServiceBrokerBadResponse { message },
        _ => CcError::V2UnexpectedResponse {
            status,
            description: parsed.description,
            error_code: parsed.error_code,
        },
    }
}

/// Maps a failed `/v3` response to an error.
pub fn v3_error(status: u16, body: &str) -> CcError {
    match status {
        401 => return CcError::Unauthorized { message: body.to_string() },
        403 => return CcError::Forbidden { message: body.to_string() },
        404 => return CcError::ResourceNotFound { message: body.to_string() },
        _ => {}
    }

    let errors = match serde_json::from_str::<V3ErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed.errors,
        _ => {
            return CcError::UnknownHttpSource {
                status,
                body: body.to_string(),
            }
        }
    };

    if errors.len() > 1 {
        return CcError::MultiError { status, errors };
    }

    let title = errors[0].title.clone();
    let message = errors[0].detail.clone();
    match (status, title.as_str()) {
        (422, "CF-TaskWorkersUnavailable") => CcError::TaskWorkersUnavailable { message },
        (422, _) => CcError::UnprocessableEntity { message },
        (400, _) => CcError::BadRequest { message },
        _ => CcError::V3UnexpectedResponse { status, errors },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_regardless_of_body() {
        let body = r#"{"code": 10003, "description": "whatever", "error_code": "CF-NotStaged"}"#;
        assert!(matches!(v2_error(401, body), CcError::Unauthorized { .. }));
        assert!(matches!(v2_error(403, body), CcError::Forbidden { .. }));
        assert!(v2_error(404, "not even json").is_not_found());
        assert!(v3_error(404, "").is_not_found());
    }

    #[test]
    fn bad_request_is_refined_by_error_code() {
        let body = r#"{"code": 170002, "description": "App has not finished staging", "error_code": "CF-NotStaged"}"#;
        assert_eq!(
            v2_error(400, body),
            CcError::NotStaged {
                message: "App has not finished staging".into()
            }
        );

        let body = r#"{"code": 1, "description": "nope", "error_code": "CF-Something"}"#;
        assert_eq!(
            v2_error(400, body),
            CcError::BadRequest {
                message: "nope".into()
            }
        );
    }

    #[test]
    fn unknown_status_keeps_cc_codes() {
        let body = r#"{"code": 10001, "description": "teapot", "error_code": "CF-Teapot"}"#;
        assert_eq!(
            v2_error(418, body),
            CcError::V2UnexpectedResponse {
                status: 418,
                description: "teapot".into(),
                error_code: "CF-Teapot".into(),
            }
        );
    }

    #[test]
    fn non_json_body_is_unknown_source() {
        assert_eq!(
            v2_error(500, "<html>oops</html>"),
            CcError::UnknownHttpSource {
                status: 500,
                body: "<html>oops</html>".into()
            }
        );
    }

    #[test]
    fn v3_unprocessable_entity_uses_detail() {
        let body = r#"{"errors": [{"code": 10008, "title": "CF-UnprocessableEntity", "detail": "Task must have a droplet."}]}"#;
        assert_eq!(
            v3_error(422, body),
            CcError::UnprocessableEntity {
                message: "Task must have a droplet.".into()
            }
        );
    }

    #[test]
    fn v3_task_workers_unavailable() {
        let body = r#"{"errors": [{"code": 170020, "title": "CF-TaskWorkersUnavailable", "detail": "fooo: Banana Pants"}]}"#;
        assert!(matches!(
            v3_error(422, body),
            CcError::TaskWorkersUnavailable { .. }
        ));
    }

    #[test]
    fn v3_several_errors_is_multi_error() {
        let body = r#"{"errors": [
            {"code": 1, "title": "CF-A", "detail": "a"},
            {"code": 2, "title": "CF-B", "detail": "b"}
        ]}"#;
        match v3_error(500, body) {
            CcError::MultiError { status, errors } => {
                assert_eq!(status, 500);
                assert_eq!(errors.len(), 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
