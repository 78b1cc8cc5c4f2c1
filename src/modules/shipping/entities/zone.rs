use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "shipping_zones")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub min_km: f64,
    pub max_km: f64,
    pub price_clp: i32,
    pub is_active: bool,
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
    /// Both bounds inclusive, matching how bands are priced.
    pub fn contains(&self, distance_km: f64) -> bool {
        self.min_km <= distance_km && distance_km <= self.max_km
    }

    /// Bands sharing only a boundary (a.max == b.min) do not overlap.
    pub fn overlaps(&self, other: &Model) -> bool {
        !(self.max_km <= other.min_km || other.max_km <= self.min_km)
    }

    pub fn range_text(&self) -> String {
        format!("{}-{} km", self.min_km, self.max_km)
    }
}
