use chrono::{NaiveTime, Weekday};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "shipping_methods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub is_active: bool,
    pub start_time: Time,
    pub end_time: Time,
    pub max_km: f64,
    pub available_monday: bool,
    pub available_tuesday: bool,
    pub available_wednesday: bool,
    pub available_thursday: bool,
    pub available_friday: bool,
    pub available_saturday: bool,
    pub available_sunday: bool,
    #[serde(skip_deserializing)]
    pub created_at: DateTime,
    #[serde(skip_deserializing)]
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::quote::Entity")]
    Quote,
}

impl Related<super::quote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn available_on(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.available_monday,
            Weekday::Tue => self.available_tuesday,
            Weekday::Wed => self.available_wednesday,
            Weekday::Thu => self.available_thursday,
            Weekday::Fri => self.available_friday,
            Weekday::Sat => self.available_saturday,
            Weekday::Sun => self.available_sunday,
        }
    }

    /// Time-of-day window containment. A window with `start > end` crosses
    /// midnight (e.g. 22:00-06:00).
    pub fn window_contains(&self, now: NaiveTime) -> bool {
        if self.start_time <= self.end_time {
            self.start_time <= now && now <= self.end_time
        } else {
            now >= self.start_time || now <= self.end_time
        }
    }

    pub fn is_available_at(&self, now: NaiveTime, weekday: Weekday) -> bool {
        self.is_active && self.available_on(weekday) && self.window_contains(now)
    }
}
