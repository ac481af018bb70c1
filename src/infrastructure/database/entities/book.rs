// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub source_book_id: String,
    pub title: String,
    pub author: String,
    pub category: Option<String>,
    pub status: String,
    pub cover_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub intro: Option<String>,
    pub first_seen_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book_snapshot::Entity")]
    BookSnapshot,
}

impl Related<super::book_snapshot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookSnapshot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
