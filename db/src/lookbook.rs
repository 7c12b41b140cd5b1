use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::error::{AppError, Res};
use sqlx::{Executor, PgConnection, Postgres};
use uuid::Uuid;

use crate::{
    dtos::lookbook::ItemCreateRequest,
    models::lookbook::{Lookbook, LookbookItem, LookbookWithItems},
};

pub async fn count_lookbooks_by_user_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM lookbooks WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

/// Newest first.
pub async fn get_lookbooks_by_user_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Vec<Lookbook>> {
    sqlx::query_as::<_, Lookbook>(
        "SELECT * FROM lookbooks WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_lookbook_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    lookbook_id: Uuid,
) -> Res<Option<Lookbook>> {
    sqlx::query_as::<_, Lookbook>("SELECT * FROM lookbooks WHERE id = $1")
        .bind(lookbook_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_owned_lookbook<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    lookbook_id: Uuid,
    owner_id: Uuid,
) -> Res<Option<Lookbook>> {
    sqlx::query_as::<_, Lookbook>("SELECT * FROM lookbooks WHERE id = $1 AND user_id = $2")
        .bind(lookbook_id)
        .bind(owner_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_items_by_lookbook_ids<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    lookbook_ids: &[Uuid],
) -> Res<Vec<LookbookItem>> {
    sqlx::query_as::<_, LookbookItem>(
        "SELECT * FROM lookbook_items WHERE lookbook_id = ANY($1) ORDER BY lookbook_id, position",
    )
    .bind(lookbook_ids)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}

pub async fn insert_lookbook<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    owner_id: Uuid,
    title: &str,
    description: Option<&str>,
    created_at: DateTime<Utc>,
) -> Res<Lookbook> {
    sqlx::query_as::<_, Lookbook>(
        r#"
        INSERT INTO lookbooks (id, user_id, title, description, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .bind(created_at)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

/// Inserts items in order, each with a freshly generated id.
/// Runs several statements, so callers pass the connection of an open transaction.
pub async fn insert_items(
    conn: &mut PgConnection,
    lookbook_id: Uuid,
    items: &[ItemCreateRequest],
) -> Res<Vec<LookbookItem>> {
    let mut inserted = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let row = sqlx::query_as::<_, LookbookItem>(
            r#"
            INSERT INTO lookbook_items (id, lookbook_id, position, image_url, name, price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(lookbook_id)
        .bind(position as i32)
        .bind(&item.image_url)
        .bind(&item.name)
        .bind(&item.price)
        .fetch_one(&mut *conn)
        .await
        .map_err(AppError::from)?;
        inserted.push(row);
    }
    Ok(inserted)
}

pub async fn update_owned_lookbook<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    lookbook_id: Uuid,
    owner_id: Uuid,
    title: &str,
    description: Option<&str>,
) -> Res<Option<Lookbook>> {
    sqlx::query_as::<_, Lookbook>(
        r#"
        UPDATE lookbooks SET title = $1, description = $2
        WHERE id = $3 AND user_id = $4
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(lookbook_id)
    .bind(owner_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn delete_items_by_lookbook_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    lookbook_id: Uuid,
) -> Res<u64> {
    sqlx::query("DELETE FROM lookbook_items WHERE lookbook_id = $1")
        .bind(lookbook_id)
        .execute(executor)
        .await
        .map(|result| result.rows_affected())
        .map_err(AppError::from)
}

/// Items go with the lookbook through `ON DELETE CASCADE`.
pub async fn delete_owned_lookbook<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    lookbook_id: Uuid,
    owner_id: Uuid,
) -> Res<bool> {
    sqlx::query("DELETE FROM lookbooks WHERE id = $1 AND user_id = $2")
        .bind(lookbook_id)
        .bind(owner_id)
        .execute(executor)
        .await
        .map(|result| result.rows_affected() > 0)
        .map_err(AppError::from)
}

/// Groups items under their lookbooks, keeping the lookbook order and each item's position order.
pub fn attach_items(lookbooks: Vec<Lookbook>, items: Vec<LookbookItem>) -> Vec<LookbookWithItems> {
    let mut by_lookbook: HashMap<Uuid, Vec<LookbookItem>> = HashMap::new();
    for item in items {
        by_lookbook.entry(item.lookbook_id).or_default().push(item);
    }

    lookbooks
        .into_iter()
        .map(|lookbook| {
            let mut items = by_lookbook.remove(&lookbook.id).unwrap_or_default();
            items.sort_by_key(|item| item.position);
            LookbookWithItems { lookbook, items }
        })
        .collect()
}
