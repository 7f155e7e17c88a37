use crate::common::error::{AppError, ServiceResult};
use crate::settings::DataSource;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::str::FromStr;
use uuid::Uuid;

pub const VIEWER_HEADER: &str = "X-User-Id";
pub const DATA_SOURCE_HEADER: &str = "X-Data-Source";

/// The authenticated caller, as forwarded by the auth gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerId(pub Uuid);

fn get_viewer_id(parts: &Parts) -> ServiceResult<ViewerId> {
    let Some(value) = parts.headers.get(VIEWER_HEADER) else {
        return Err(AppError::Unauthorized);
    };
    let value = value.to_str().map_err(|_| AppError::Unauthorized)?;
    let user_id = Uuid::from_str(value.trim()).map_err(|_| AppError::Unauthorized)?;
    Ok(ViewerId(user_id))
}

/// Reads an explicit data source override, if the request carries one.
pub fn get_data_source_override(parts: &Parts) -> ServiceResult<Option<DataSource>> {
    match parts.headers.get(DATA_SOURCE_HEADER) {
        Some(value) => {
            let value = value.to_str().map_err(|_| AppError::DecodingRequestFailed)?;
            let data_source =
                DataSource::from_str(value).map_err(|_| AppError::DecodingRequestFailed)?;
            Ok(Some(data_source))
        }
        None => Ok(None),
    }
}

impl<S: Sync + Send> FromRequestParts<S> for ViewerId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        get_viewer_id(parts)
    }
}
