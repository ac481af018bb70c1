// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 榜单实体
///
/// 来源站点上一个周期性更新的书籍有序列表。榜单定义来自
/// urls.json，启动时同步进数据库；每次抓取产生一个榜单快照。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ranking {
    /// 榜单唯一标识符
    pub id: Uuid,
    /// 榜单key，与urls.json中的定义一致
    pub key: String,
    /// 榜单显示名称
    pub name: String,
    /// 榜单列表页URL
    pub source_url: String,
    /// 更新周期（分钟）
    pub interval_minutes: i32,
    /// 是否启用
    pub enabled: bool,
    /// 最后一次成功抓取时间
    pub last_crawled_at: Option<DateTime<FixedOffset>>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

impl Ranking {
    /// 创建新榜单
    pub fn new(key: String, name: String, source_url: String, interval_minutes: i32) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            key,
            name,
            source_url,
            interval_minutes,
            enabled: true,
            last_crawled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 判断榜单是否到达下一次抓取时间
    ///
    /// 从未抓取过的榜单立即到期
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.last_crawled_at {
            None => true,
            Some(last) => {
                let next = last + Duration::minutes(i64::from(self.interval_minutes));
                now >= next.with_timezone(&Utc)
            }
        }
    }
}

/// 榜单快照
///
/// 一次抓取捕获到的整个榜单状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingSnapshot {
    /// 快照唯一标识符
    pub id: Uuid,
    /// 所属榜单ID
    pub ranking_id: Uuid,
    /// 快照条目数量
    pub entry_count: i32,
    /// 产生此快照的抓取任务ID
    pub task_id: Option<Uuid>,
    /// 捕获时间
    pub captured_at: DateTime<FixedOffset>,
}

/// 榜单快照条目
///
/// 快照内的一个名次，冗余保存评分与人气便于直接渲染
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingSnapshotEntry {
    /// 条目唯一标识符
    pub id: Uuid,
    /// 所属快照ID
    pub snapshot_id: Uuid,
    /// 名次，从1开始
    pub position: i32,
    /// 书籍ID
    pub book_id: Uuid,
    /// 评分
    pub score: Option<f64>,
    /// 人气值
    pub popularity: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_due_never_crawled() {
        let ranking = Ranking::new(
            "hot".to_string(),
            "热销榜".to_string(),
            "https://example.com/rank/hot".to_string(),
            60,
        );
        assert!(ranking.is_due(Utc::now()));
    }

    #[test]
    fn test_is_due_respects_interval() {
        let mut ranking = Ranking::new(
            "hot".to_string(),
            "热销榜".to_string(),
            "https://example.com/rank/hot".to_string(),
            60,
        );
        let now = Utc::now();
        ranking.last_crawled_at = Some((now - Duration::minutes(30)).into());
        assert!(!ranking.is_due(now));

        ranking.last_crawled_at = Some((now - Duration::minutes(61)).into());
        assert!(ranking.is_due(now));
    }
}
