// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::repositories::crawl_task_repository::RepositoryError;
use crate::queue::task_queue::QueueError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    /// 资源不存在
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(anyhow::Error::new(RepositoryError::NotFound).context(msg.into()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();

        let status = if let Some(repo_err) = self.0.downcast_ref::<RepositoryError>() {
            match repo_err {
                RepositoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
            }
        } else if let Some(queue_err) = self.0.downcast_ref::<QueueError>() {
            match queue_err {
                QueueError::Duplicate(_) => StatusCode::CONFLICT,
                QueueError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
                QueueError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if error_message.contains("cannot be empty")
            || error_message.contains("invalid")
            || error_message.contains("required")
            || error_message.contains("validation")
            || error_message.contains("Validation")
        {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = Json(json!({
            "code": status.as_u16(),
            "msg": error_message,
        }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
