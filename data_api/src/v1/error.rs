use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Serialize, Serializer};
use shared::database::queries::QueryError;
use shared::geo::GeoError;
use shared::smp::UnknownColumnError;
use thiserror::Error;
use tracing::{debug, warn};

const STORE_NOT_BUILT: &str = "station store has not been built yet";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    #[serde(serialize_with = "serialize_status")]
    pub status_code: StatusCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Geo(#[from] GeoError),
    #[error(transparent)]
    UnknownColumn(#[from] UnknownColumnError),
    #[error("station store has not been built yet")]
    StoreNotBuilt,
    #[error("{0}")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Query(e) => match e {
                QueryError::Sql(e) => {
                    warn!(error = ?e, "sql error");
                    ErrorMessage::from((StatusCode::INTERNAL_SERVER_ERROR, "")).into_response()
                }
                QueryError::IllegalArgs(e) => {
                    debug!(error = e, "illegal arguments for Db query");
                    ErrorMessage::from((StatusCode::BAD_REQUEST, e)).into_response()
                }
            },
            ApiError::Geo(e) => {
                debug!(error = %e, "invalid nearby query");
                ErrorMessage::from((StatusCode::BAD_REQUEST, e.to_string())).into_response()
            }
            ApiError::UnknownColumn(e) => {
                debug!(column = e.0, "unknown column requested");
                ErrorMessage::from((StatusCode::BAD_REQUEST, e.to_string())).into_response()
            }
            ApiError::StoreNotBuilt => {
                warn!("station table missing, ingestion has not run yet");
                ErrorMessage::from((StatusCode::SERVICE_UNAVAILABLE, STORE_NOT_BUILT)).into_response()
            }
            ApiError::NotFound(msg) => {
                ErrorMessage::from((StatusCode::NOT_FOUND, msg)).into_response()
            }
        }
    }
}

fn serialize_status<S>(value: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(value.as_u16())
}

impl From<(StatusCode, String)> for ErrorMessage {
    fn from((status_code, message): (StatusCode, String)) -> Self {
        Self {
            status_code,
            message,
        }
    }
}

impl From<(StatusCode, &str)> for ErrorMessage {
    fn from((status_code, message): (StatusCode, &str)) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ErrorMessage {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}
