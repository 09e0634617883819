use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use snafu::Snafu;
use std::{fmt, io, net::SocketAddr, num::ParseIntError};

pub type StudentResult<T> = Result<T, StudentError>;
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StudentError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("A student with ID {:?} already exists", student_id))]
    DuplicateStudent { student_id: String },
    #[snafu(display("Error migrating DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse port from env var `{}`", name))]
    ParsePort {
        source: ParseIntError,
        name: &'static str,
    },
    #[snafu(display("Unable to listen on {}", addr))]
    BindListener { source: io::Error, addr: SocketAddr },
    #[snafu(display("Error serving app"))]
    Serve { source: io::Error },
}

/// The five student operations, used to pick the message clients see when the store fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Get,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create student",
            Self::List => "fetch students",
            Self::Get => "fetch student",
            Self::Update => "update student",
            Self::Delete => "delete student",
        })
    }
}

/// Everything a handler can fail with. The display string is exactly what ends up in the
/// `error` field of the response body, so store details stay in the `source` and out of it.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ApiError {
    #[snafu(display("{}", body_rejection_message(source)))]
    InvalidBody { source: JsonRejection },
    #[snafu(display("Missing required fields"))]
    MissingRequiredFields,
    #[snafu(display("Invalid date in `{}`", field))]
    InvalidDate {
        source: time::error::Parse,
        field: &'static str,
    },
    #[snafu(display("Student not found"))]
    StudentNotFound { student_id: String },
    #[snafu(display("Failed to {}", operation))]
    StoreFault {
        operation: Operation,
        source: StudentError,
    },
}

fn body_rejection_message(rejection: &JsonRejection) -> &'static str {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        "Request body too large"
    } else {
        "Invalid request body"
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input
        const TL: StatusCode = StatusCode::PAYLOAD_TOO_LARGE; //too large

        match self {
            Self::InvalidBody { source } if source.status() == TL => TL,
            Self::InvalidBody { .. } | Self::MissingRequiredFields | Self::InvalidDate { .. } => BI,
            Self::StudentNotFound { .. } => NF,
            Self::StoreFault { .. } => ISE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        match &self {
            Self::StoreFault { operation, source } => {
                error!(?source, %operation, "Store fault");
            }
            _ => debug!(?self, "Rejected request"),
        }

        (status_code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
