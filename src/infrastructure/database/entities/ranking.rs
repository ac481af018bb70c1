// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rankings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub key: String,
    pub name: String,
    pub source_url: String,
    pub interval_minutes: i32,
    pub enabled: bool,
    pub last_crawled_at: Option<ChronoDateTimeWithTimeZone>,
    pub created_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ranking_snapshot::Entity")]
    RankingSnapshot,
}

impl Related<super::ranking_snapshot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RankingSnapshot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
