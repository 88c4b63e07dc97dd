//! Response envelopes.
//!
//! Every body carries `success`. Errors are `{success: false, message}`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// `{success, data}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { success: true, data }
    }
}

/// `{success, count, data}`
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// `{success, message, data?}`
#[derive(Debug, Serialize)]
pub struct MessageResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> MessageResponse<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl MessageResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_envelopes() {
        assert_eq!(
            serde_json::to_value(ErrorResponse::new("Server error")).unwrap(),
            json!({"success": false, "message": "Server error"})
        );
        assert_eq!(
            serde_json::to_value(ListResponse::new(vec![1, 2])).unwrap(),
            json!({"success": true, "count": 2, "data": [1, 2]})
        );
        assert_eq!(
            serde_json::to_value(MessageResponse::message("User deleted successfully")).unwrap(),
            json!({"success": true, "message": "User deleted successfully"})
        );
    }
}
