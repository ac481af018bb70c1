// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::envelope::{ApiResponse, PageDto};
use crate::application::dto::task_dto::{TaskDto, TaskListQuery};
use crate::domain::repositories::crawl_task_repository::{CrawlTaskRepository, TaskQueryParams};
use crate::domain::repositories::ranking_repository::RankingRepository;
use crate::presentation::errors::AppError;
use axum::extract::{Extension, Path, Query};
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// 任务列表处理器
///
/// 支持按状态与榜单key过滤，按创建时间倒序
pub async fn list_tasks<R: CrawlTaskRepository, K: RankingRepository>(
    Extension(task_repo): Extension<Arc<R>>,
    Extension(ranking_repo): Extension<Arc<K>>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<ApiResponse<PageDto<TaskDto>>>, AppError> {
    if let Err(errors) = query.validate() {
        return Err(AppError::from(anyhow::anyhow!(
            "Validation error: {:?}",
            errors
        )));
    }

    let statuses = match &query.status {
        Some(raw) => {
            let status = raw.parse().map_err(|_| {
                AppError::from(anyhow::anyhow!("Validation error: invalid status '{raw}'"))
            })?;
            Some(vec![status])
        }
        None => None,
    };

    let ranking_id = match &query.ranking {
        Some(key) => {
            let ranking = ranking_repo
                .find_by_key(key)
                .await?
                .ok_or_else(|| AppError::not_found(format!("ranking '{}' not found", key)))?;
            Some(ranking.id)
        }
        None => None,
    };

    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(20);

    let (tasks, total) = task_repo
        .query_tasks(TaskQueryParams {
            ranking_id,
            statuses,
            triggers: None,
            created_after: None,
            created_before: None,
            limit: page_size,
            offset: (page - 1) * page_size,
        })
        .await?;

    Ok(Json(ApiResponse::ok(PageDto {
        items: tasks.into_iter().map(TaskDto::from).collect(),
        total,
        page,
        page_size,
    })))
}

/// 任务详情处理器
pub async fn get_task<R: CrawlTaskRepository>(
    Extension(task_repo): Extension<Arc<R>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TaskDto>>, AppError> {
    let task = task_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("task {} not found", id)))?;
    Ok(Json(ApiResponse::ok(task.into())))
}
