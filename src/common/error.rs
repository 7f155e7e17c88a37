use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

pub type ServiceResult<T> = Result<T, AppError>;
pub type ServiceResponse<T> = ServiceResult<Json<T>>;

#[track_caller]
pub fn unexpected<T, E: Into<anyhow::Error>>(e: E) -> ServiceResult<T> {
    let caller = std::panic::Location::caller();
    error!("An unexpected error has occurred at {caller}: {}", e.into());
    Err(AppError::Unexpected)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppError {
    Unexpected,
    Unauthorized,
    DecodingRequestFailed,
    InternalServerError(&'static str),
    DataSourceUnavailable,

    ConversationsNotFound,
    ConversationsSameParticipant,
    ConversationsNotParticipant,

    MessagesEmpty,
    MessagesTooLong,
    MessagesInvalidAttachment,

    ContractorsNotFound,
    ManagersNotFound,
    UsersNotFound,

    QuoteRequestsInvalidBudget,
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    #[track_caller]
    fn from(e: E) -> Self {
        unexpected::<(), E>(e).unwrap_err()
    }
}

impl AppError {
    pub const fn as_str(&self) -> &str {
        self.code()
    }

    pub const fn code(&self) -> &'static str {
        match self {
            AppError::Unexpected => "unexpected",
            AppError::Unauthorized => "unauthorized",
            AppError::DecodingRequestFailed => "decoding_request_failed",
            AppError::InternalServerError(_) => "internal_server_error",
            AppError::DataSourceUnavailable => "data_source_unavailable",

            AppError::ConversationsNotFound => "conversations.not_found",
            AppError::ConversationsSameParticipant => "conversations.same_participant",
            AppError::ConversationsNotParticipant => "conversations.not_participant",

            AppError::MessagesEmpty => "messages.empty",
            AppError::MessagesTooLong => "messages.too_long",
            AppError::MessagesInvalidAttachment => "messages.invalid_attachment",

            AppError::ContractorsNotFound => "contractors.not_found",
            AppError::ManagersNotFound => "managers.not_found",
            AppError::UsersNotFound => "users.not_found",

            AppError::QuoteRequestsInvalidBudget => "quote_requests.invalid_budget",
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            AppError::Unexpected => "An unexpected error has occurred.",
            AppError::Unauthorized => "You are not authorized to perform this action.",
            AppError::DecodingRequestFailed => "Failed to decode request",
            AppError::InternalServerError(_) => "An internal server error has occurred.",
            AppError::DataSourceUnavailable => "The requested data source is not available.",

            AppError::ConversationsNotFound => "Conversation not found",
            AppError::ConversationsSameParticipant => {
                "A conversation needs two different participants."
            }
            AppError::ConversationsNotParticipant => {
                "You are not a participant of this conversation."
            }

            AppError::MessagesEmpty => "A message needs text or at least one attachment.",
            AppError::MessagesTooLong => "Your message was too long. It has not been sent.",
            AppError::MessagesInvalidAttachment => "One of the attachments could not be accepted.",

            AppError::ContractorsNotFound => "This contractor could not be found.",
            AppError::ManagersNotFound => "This property manager could not be found.",
            AppError::UsersNotFound => "This user does not exist.",

            AppError::QuoteRequestsInvalidBudget => {
                "The minimum budget must not exceed the maximum budget."
            }
        }
    }

    pub const fn http_status_code(&self) -> StatusCode {
        match self {
            AppError::DecodingRequestFailed
            | AppError::ConversationsSameParticipant
            | AppError::MessagesEmpty
            | AppError::MessagesTooLong
            | AppError::MessagesInvalidAttachment
            | AppError::QuoteRequestsInvalidBudget => StatusCode::BAD_REQUEST,

            AppError::Unauthorized => StatusCode::UNAUTHORIZED,

            AppError::ConversationsNotParticipant => StatusCode::FORBIDDEN,

            AppError::ConversationsNotFound
            | AppError::ContractorsNotFound
            | AppError::ManagersNotFound
            | AppError::UsersNotFound => StatusCode::NOT_FOUND,

            AppError::DataSourceUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            AppError::Unexpected | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub const fn response_parts(&self) -> (StatusCode, Json<ErrorResponse>) {
        let status = self.http_status_code();
        let response = ErrorResponse {
            code: self.code(),
            message: self.message(),
        };
        (status, Json(response))
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.response_parts().into_response()
    }
}
