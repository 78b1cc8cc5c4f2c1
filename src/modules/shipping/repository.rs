use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::entities::{method, quote, zone};
use crate::shared::error::AppResult;

/// `insert`/`update` take fully-built models; the implementation assigns the
/// id on insert. Partial updates are resolved by the handler before saving.
#[async_trait]
pub trait MethodRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<method::Model>>;
    async fn find_active(&self) -> AppResult<Vec<method::Model>>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<method::Model>>;
    async fn find_by_code(&self, code: &str) -> AppResult<Option<method::Model>>;
    async fn insert(&self, model: method::Model) -> AppResult<method::Model>;
    async fn update(&self, model: method::Model) -> AppResult<method::Model>;
    async fn delete(&self, id: i32) -> AppResult<()>;
    async fn count(&self) -> AppResult<u64>;
}

#[async_trait]
pub trait ZoneRepository: Send + Sync {
    /// All zones ordered by min_km.
    async fn find_all(&self) -> AppResult<Vec<zone::Model>>;
    /// Active zones ordered by min_km.
    async fn find_active(&self) -> AppResult<Vec<zone::Model>>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<zone::Model>>;
    async fn insert(&self, model: zone::Model) -> AppResult<zone::Model>;
    async fn update(&self, model: zone::Model) -> AppResult<zone::Model>;
    async fn delete(&self, id: i32) -> AppResult<()>;
    async fn count(&self) -> AppResult<u64>;
}

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Persist one audit record per matched option, atomically: either every
    /// quote of a request commits or none does.
    async fn insert_many(&self, quotes: Vec<quote::Model>) -> AppResult<Vec<quote::Model>>;
    /// Newest first.
    async fn recent(&self, limit: u64) -> AppResult<Vec<quote::Model>>;
    async fn count(&self) -> AppResult<u64>;
    async fn count_since(&self, since: NaiveDateTime) -> AppResult<u64>;
    async fn count_by_method(&self, method_id: i32) -> AppResult<u64>;
    async fn count_by_zone(&self, zone_id: i32) -> AppResult<u64>;
}
