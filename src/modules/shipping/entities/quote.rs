use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One priced, resolved shipping calculation. Immutable audit record;
/// referenced methods/zones cannot be deleted while quotes point at them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "shipping_quotes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub session_id: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub origin_address: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub destination_address: String,
    pub origin_lat: Option<f64>,
    pub origin_lng: Option<f64>,
    pub destination_lat: Option<f64>,
    pub destination_lng: Option<f64>,
    pub distance_km: f64,
    pub duration_minutes: Option<i32>,
    pub shipping_method_id: Option<i32>,
    pub zone_id: Option<i32>,
    pub price_clp: i32,
    pub is_available: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub router_response: Option<String>,
    #[serde(skip_deserializing)]
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::method::Entity",
        from = "Column::ShippingMethodId",
        to = "super::method::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Method,
    #[sea_orm(
        belongs_to = "super::zone::Entity",
        from = "Column::ZoneId",
        to = "super::zone::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Zone,
}

impl Related<super::method::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Method.def()
    }
}

impl Related<super::zone::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Zone.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
