use serde::Serialize;

/// Success envelope shared by every JSON endpoint: `{success, data?, total?, message?}`.
/// Failures are rendered by `AppError` with the same `success` flag.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            total: None,
            message: None,
        }
    }

    pub fn list(data: T, total: usize) -> Self {
        ApiResponse {
            total: Some(total),
            ..ApiResponse::data(data)
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            data: None,
            total: None,
            message: Some(message.into()),
        }
    }
}
