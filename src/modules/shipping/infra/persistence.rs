use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::*;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

use crate::modules::shipping::entities::{method, quote, zone};
use crate::modules::shipping::repository::{MethodRepository, QuoteRepository, ZoneRepository};
use crate::shared::error::{AppError, AppResult};

// =========================================================================
// SeaORM Implementation
// =========================================================================

#[derive(Clone)]
pub struct SeaOrmMethodRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmMethodRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MethodRepository for SeaOrmMethodRepository {
    async fn find_all(&self) -> AppResult<Vec<method::Model>> {
        Ok(method::Entity::find().all(self.db.as_ref()).await?)
    }

    async fn find_active(&self) -> AppResult<Vec<method::Model>> {
        Ok(method::Entity::find()
            .filter(method::Column::IsActive.eq(true))
            .all(self.db.as_ref())
            .await?)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<method::Model>> {
        Ok(method::Entity::find_by_id(id).one(self.db.as_ref()).await?)
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<method::Model>> {
        Ok(method::Entity::find()
            .filter(method::Column::Code.eq(code))
            .one(self.db.as_ref())
            .await?)
    }

    async fn insert(&self, model: method::Model) -> AppResult<method::Model> {
        let mut active = model.into_active_model().reset_all();
        active.id = NotSet;
        Ok(active.insert(self.db.as_ref()).await?)
    }

    async fn update(&self, model: method::Model) -> AppResult<method::Model> {
        let active = model.into_active_model().reset_all();
        Ok(active.update(self.db.as_ref()).await?)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        method::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(method::Entity::find().count(self.db.as_ref()).await?)
    }
}

#[derive(Clone)]
pub struct SeaOrmZoneRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmZoneRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ZoneRepository for SeaOrmZoneRepository {
    async fn find_all(&self) -> AppResult<Vec<zone::Model>> {
        Ok(zone::Entity::find()
            .order_by_asc(zone::Column::MinKm)
            .all(self.db.as_ref())
            .await?)
    }

    async fn find_active(&self) -> AppResult<Vec<zone::Model>> {
        Ok(zone::Entity::find()
            .filter(zone::Column::IsActive.eq(true))
            .order_by_asc(zone::Column::MinKm)
            .all(self.db.as_ref())
            .await?)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<zone::Model>> {
        Ok(zone::Entity::find_by_id(id).one(self.db.as_ref()).await?)
    }

    async fn insert(&self, model: zone::Model) -> AppResult<zone::Model> {
        let mut active = model.into_active_model().reset_all();
        active.id = NotSet;
        Ok(active.insert(self.db.as_ref()).await?)
    }

    async fn update(&self, model: zone::Model) -> AppResult<zone::Model> {
        let active = model.into_active_model().reset_all();
        Ok(active.update(self.db.as_ref()).await?)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        zone::Entity::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(zone::Entity::find().count(self.db.as_ref()).await?)
    }
}

#[derive(Clone)]
pub struct SeaOrmQuoteRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmQuoteRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl QuoteRepository for SeaOrmQuoteRepository {
    async fn insert_many(&self, quotes: Vec<quote::Model>) -> AppResult<Vec<quote::Model>> {
        let txn = self.db.begin().await?;
        let mut inserted = Vec::with_capacity(quotes.len());
        for model in quotes {
            let mut active = model.into_active_model().reset_all();
            active.id = NotSet;
            inserted.push(active.insert(&txn).await?);
        }
        txn.commit().await?;
        Ok(inserted)
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<quote::Model>> {
        Ok(quote::Entity::find()
            .order_by_desc(quote::Column::CreatedAt)
            .order_by_desc(quote::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await?)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(quote::Entity::find().count(self.db.as_ref()).await?)
    }

    async fn count_since(&self, since: NaiveDateTime) -> AppResult<u64> {
        Ok(quote::Entity::find()
            .filter(quote::Column::CreatedAt.gte(since))
            .count(self.db.as_ref())
            .await?)
    }

    async fn count_by_method(&self, method_id: i32) -> AppResult<u64> {
        Ok(quote::Entity::find()
            .filter(quote::Column::ShippingMethodId.eq(method_id))
            .count(self.db.as_ref())
            .await?)
    }

    async fn count_by_zone(&self, zone_id: i32) -> AppResult<u64> {
        Ok(quote::Entity::find()
            .filter(quote::Column::ZoneId.eq(zone_id))
            .count(self.db.as_ref())
            .await?)
    }
}

// =========================================================================
// InMemory Implementation (dev env and tests)
// =========================================================================

#[derive(Default)]
pub struct InMemoryMethodRepository {
    rows: Mutex<Vec<method::Model>>,
    next_id: AtomicI32,
}

#[async_trait]
impl MethodRepository for InMemoryMethodRepository {
    async fn find_all(&self) -> AppResult<Vec<method::Model>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_active(&self) -> AppResult<Vec<method::Model>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.is_active)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<method::Model>> {
        Ok(self.rows.lock().unwrap().iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<method::Model>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.code == code)
            .cloned())
    }

    async fn insert(&self, mut model: method::Model) -> AppResult<method::Model> {
        model.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().unwrap().push(model.clone());
        Ok(model)
    }

    async fn update(&self, model: method::Model) -> AppResult<method::Model> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|m| m.id == model.id)
            .ok_or(AppError::NotFound)?;
        *slot = model.clone();
        Ok(model)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.rows.lock().unwrap().retain(|m| m.id != id);
        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryZoneRepository {
    rows: Mutex<Vec<zone::Model>>,
    next_id: AtomicI32,
}

impl InMemoryZoneRepository {
    fn sorted(rows: &[zone::Model]) -> Vec<zone::Model> {
        let mut out = rows.to_vec();
        out.sort_by(|a, b| a.min_km.partial_cmp(&b.min_km).unwrap_or(std::cmp::Ordering::Equal));
        out
    }
}

#[async_trait]
impl ZoneRepository for InMemoryZoneRepository {
    async fn find_all(&self) -> AppResult<Vec<zone::Model>> {
        Ok(Self::sorted(&self.rows.lock().unwrap()))
    }

    async fn find_active(&self) -> AppResult<Vec<zone::Model>> {
        let rows = self.rows.lock().unwrap();
        Ok(Self::sorted(&rows)
            .into_iter()
            .filter(|z| z.is_active)
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<zone::Model>> {
        Ok(self.rows.lock().unwrap().iter().find(|z| z.id == id).cloned())
    }

    async fn insert(&self, mut model: zone::Model) -> AppResult<zone::Model> {
        model.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().unwrap().push(model.clone());
        Ok(model)
    }

    async fn update(&self, model: zone::Model) -> AppResult<zone::Model> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|z| z.id == model.id)
            .ok_or(AppError::NotFound)?;
        *slot = model.clone();
        Ok(model)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        self.rows.lock().unwrap().retain(|z| z.id != id);
        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryQuoteRepository {
    rows: Mutex<Vec<quote::Model>>,
    next_id: AtomicI32,
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn insert_many(&self, quotes: Vec<quote::Model>) -> AppResult<Vec<quote::Model>> {
        let mut rows = self.rows.lock().unwrap();
        let mut inserted = Vec::with_capacity(quotes.len());
        for mut model in quotes {
            model.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            rows.push(model.clone());
            inserted.push(model);
        }
        Ok(inserted)
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<quote::Model>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn count_since(&self, since: NaiveDateTime) -> AppResult<u64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.created_at >= since)
            .count() as u64)
    }

    async fn count_by_method(&self, method_id: i32) -> AppResult<u64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.shipping_method_id == Some(method_id))
            .count() as u64)
    }

    async fn count_by_zone(&self, zone_id: i32) -> AppResult<u64> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.zone_id == Some(zone_id))
            .count() as u64)
    }
}
