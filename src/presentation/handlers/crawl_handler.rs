// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::application::dto::crawl_request::{CrawlTriggerRequestDto, CrawlTriggerResponseDto};
use crate::application::dto::envelope::ApiResponse;
use crate::config::settings::Settings;
use crate::domain::models::crawl_task::TaskTrigger;
use crate::domain::repositories::ranking_repository::RankingRepository;
use crate::presentation::errors::AppError;
use crate::queue::task_queue::{QueueError, TaskQueue};
use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use tracing::info;

/// 手动触发抓取处理器
///
/// 为指定榜单（或全部启用的榜单）创建手动抓取任务并立即入队。
/// 单个榜单已有未完成任务时返回409；all模式下跳过并在响应中列出。
pub async fn trigger_crawl<Q: TaskQueue, K: RankingRepository>(
    Extension(queue): Extension<Arc<Q>>,
    Extension(ranking_repo): Extension<Arc<K>>,
    Extension(settings): Extension<Arc<Settings>>,
    Json(request): Json<CrawlTriggerRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<CrawlTriggerResponseDto>>), AppError> {
    let max_retries = settings.scheduler.task_max_retries;

    let mut task_ids = Vec::new();
    let mut skipped = Vec::new();

    if request.all.unwrap_or(false) {
        for ranking in ranking_repo.list(true).await? {
            match queue
                .enqueue(ranking.id, TaskTrigger::Manual, max_retries)
                .await
            {
                Ok(task) => {
                    info!(ranking = %ranking.key, task_id = %task.id, "manual crawl enqueued");
                    task_ids.push(task.id);
                }
                Err(QueueError::Duplicate(_)) => skipped.push(ranking.key),
                Err(e) => return Err(e.into()),
            }
        }
    } else if let Some(key) = &request.ranking {
        let ranking = ranking_repo
            .find_by_key(key)
            .await?
            .ok_or_else(|| AppError::not_found(format!("ranking '{}' not found", key)))?;

        let task = queue
            .enqueue(ranking.id, TaskTrigger::Manual, max_retries)
            .await?;
        info!(ranking = %ranking.key, task_id = %task.id, "manual crawl enqueued");
        task_ids.push(task.id);
    } else {
        return Err(AppError::from(anyhow::anyhow!(
            "Validation error: either 'ranking' or 'all' is required"
        )));
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::ok(CrawlTriggerResponseDto {
            task_ids,
            skipped,
        })),
    ))
}
