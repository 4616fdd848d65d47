//! Publication entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a publication record came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationSource {
    Manual,
    GoogleScholar,
    IeeeXplore,
}

impl PublicationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationSource::Manual => "manual",
            PublicationSource::GoogleScholar => "google_scholar",
            PublicationSource::IeeeXplore => "ieee_xplore",
        }
    }
}

impl fmt::Display for PublicationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublicationSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(PublicationSource::Manual),
            "google_scholar" => Ok(PublicationSource::GoogleScholar),
            "ieee_xplore" => Ok(PublicationSource::IeeeXplore),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "publications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub faculty_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    /// JSON array of author names
    #[sea_orm(column_type = "JsonBinary")]
    pub authors: Json,

    #[sea_orm(column_type = "Text", nullable)]
    pub venue: Option<String>,

    pub year: Option<i32>,

    pub citations: i32,

    #[sea_orm(column_type = "Text", nullable)]
    pub url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub source: String,

    /// Extensible metadata (DOI, keywords)
    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: Json,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::FacultyId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Faculty,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Faculty.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
