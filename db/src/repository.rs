use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::error::Res;
use mockall::automock;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dtos::{
        lookbook::LookbookWriteRequest,
        user::{ProfileUpdateRequest, UserCreateRequest},
    },
    lookbook,
    models::{
        lookbook::{Lookbook, LookbookWithItems},
        user::{SubscriptionTier, User},
    },
    user,
};

/// Credential store.
#[automock]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn exists_user_by_email(&self, email: &str) -> Res<bool>;
    async fn create_user(&self, data: UserCreateRequest) -> Res<User>;
    async fn find_user_by_email(&self, email: &str) -> Res<Option<User>>;
    async fn find_user_by_id(&self, user_id: Uuid) -> Res<Option<User>>;
    async fn find_user_by_billing_customer_ref(&self, customer_ref: &str) -> Res<Option<User>>;
    async fn update_profile(&self, user_id: Uuid, data: ProfileUpdateRequest)
    -> Res<Option<User>>;
    async fn set_billing_customer_ref(&self, user_id: Uuid, customer_ref: &str) -> Res<()>;
    async fn set_subscription_status(&self, user_id: Uuid, status: SubscriptionTier) -> Res<()>;
}

/// Catalog store. Every `*_owned` method filters on lookbook id and owner id together,
/// so a lookbook owned by someone else is indistinguishable from a missing one.
#[automock]
#[async_trait]
pub trait LookbookRepository: Send + Sync {
    async fn count_lookbooks(&self, owner_id: Uuid) -> Res<i64>;
    async fn list_lookbooks(&self, owner_id: Uuid) -> Res<Vec<LookbookWithItems>>;
    async fn find_lookbook(&self, lookbook_id: Uuid) -> Res<Option<LookbookWithItems>>;
    async fn find_owned(&self, lookbook_id: Uuid, owner_id: Uuid)
    -> Res<Option<LookbookWithItems>>;
    /// Inserts the lookbook and all of its items atomically.
    async fn create_lookbook(
        &self,
        owner_id: Uuid,
        data: LookbookWriteRequest,
    ) -> Res<LookbookWithItems>;
    /// Overwrites title and description and swaps the whole item set atomically.
    async fn replace_owned(
        &self,
        lookbook_id: Uuid,
        owner_id: Uuid,
        data: LookbookWriteRequest,
    ) -> Res<Option<LookbookWithItems>>;
    async fn delete_owned(&self, lookbook_id: Uuid, owner_id: Uuid) -> Res<bool>;
}

/// Postgres implementation of both stores over a shared pool.
#[derive(Clone)]
pub struct PgRepository {
    pool: Arc<PgPool>,
}

impl PgRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn with_items(&self, found: Option<Lookbook>) -> Res<Option<LookbookWithItems>> {
        let Some(found) = found else {
            return Ok(None);
        };
        let items = lookbook::get_items_by_lookbook_ids(&*self.pool, &[found.id]).await?;
        Ok(lookbook::attach_items(vec![found], items).pop())
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn exists_user_by_email(&self, email: &str) -> Res<bool> {
        user::exists_user_by_email(&*self.pool, email).await
    }

    async fn create_user(&self, data: UserCreateRequest) -> Res<User> {
        user::insert_user(&*self.pool, data).await
    }

    async fn find_user_by_email(&self, email: &str) -> Res<Option<User>> {
        user::get_user_by_email(&*self.pool, email).await
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> Res<Option<User>> {
        user::get_user_by_id(&*self.pool, user_id).await
    }

    async fn find_user_by_billing_customer_ref(&self, customer_ref: &str) -> Res<Option<User>> {
        user::get_user_by_billing_customer_ref(&*self.pool, customer_ref).await
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        data: ProfileUpdateRequest,
    ) -> Res<Option<User>> {
        user::update_profile(&*self.pool, user_id, data).await
    }

    async fn set_billing_customer_ref(&self, user_id: Uuid, customer_ref: &str) -> Res<()> {
        user::update_billing_customer_ref(&*self.pool, user_id, customer_ref).await
    }

    async fn set_subscription_status(&self, user_id: Uuid, status: SubscriptionTier) -> Res<()> {
        user::update_subscription_status(&*self.pool, user_id, status).await
    }
}

#[async_trait]
impl LookbookRepository for PgRepository {
    async fn count_lookbooks(&self, owner_id: Uuid) -> Res<i64> {
        lookbook::count_lookbooks_by_user_id(&*self.pool, owner_id).await
    }

    async fn list_lookbooks(&self, owner_id: Uuid) -> Res<Vec<LookbookWithItems>> {
        let lookbooks = lookbook::get_lookbooks_by_user_id(&*self.pool, owner_id).await?;
        if lookbooks.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = lookbooks.iter().map(|lb| lb.id).collect();
        let items = lookbook::get_items_by_lookbook_ids(&*self.pool, &ids).await?;
        Ok(lookbook::attach_items(lookbooks, items))
    }

    async fn find_lookbook(&self, lookbook_id: Uuid) -> Res<Option<LookbookWithItems>> {
        let found = lookbook::get_lookbook_by_id(&*self.pool, lookbook_id).await?;
        self.with_items(found).await
    }

    async fn find_owned(
        &self,
        lookbook_id: Uuid,
        owner_id: Uuid,
    ) -> Res<Option<LookbookWithItems>> {
        let found = lookbook::get_owned_lookbook(&*self.pool, lookbook_id, owner_id).await?;
        self.with_items(found).await
    }

    async fn create_lookbook(
        &self,
        owner_id: Uuid,
        data: LookbookWriteRequest,
    ) -> Res<LookbookWithItems> {
        let mut tx = self.pool.begin().await?;

        let created = lookbook::insert_lookbook(
            &mut *tx,
            owner_id,
            &data.title,
            data.description.as_deref(),
            Utc::now(),
        )
        .await?;
        let items = lookbook::insert_items(&mut tx, created.id, &data.items).await?;

        tx.commit().await?;
        log::info!(
            "Lookbook {} created for user {} with {} items",
            created.id,
            owner_id,
            items.len()
        );
        Ok(LookbookWithItems {
            lookbook: created,
            items,
        })
    }

    async fn replace_owned(
        &self,
        lookbook_id: Uuid,
        owner_id: Uuid,
        data: LookbookWriteRequest,
    ) -> Res<Option<LookbookWithItems>> {
        let mut tx = self.pool.begin().await?;

        // dropping the transaction without commit rolls it back
        let Some(updated) = lookbook::update_owned_lookbook(
            &mut *tx,
            lookbook_id,
            owner_id,
            &data.title,
            data.description.as_deref(),
        )
        .await?
        else {
            return Ok(None);
        };
        lookbook::delete_items_by_lookbook_id(&mut *tx, lookbook_id).await?;
        let items = lookbook::insert_items(&mut tx, lookbook_id, &data.items).await?;

        tx.commit().await?;
        Ok(Some(LookbookWithItems {
            lookbook: updated,
            items,
        }))
    }

    async fn delete_owned(&self, lookbook_id: Uuid, owner_id: Uuid) -> Res<bool> {
        lookbook::delete_owned_lookbook(&*self.pool, lookbook_id, owner_id).await
    }
}
