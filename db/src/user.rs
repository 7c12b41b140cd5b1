use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    dtos::user::{ProfileUpdateRequest, UserCreateRequest},
    models::user::{SubscriptionTier, User},
};

pub async fn exists_user_by_email<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    email: &str,
) -> Res<bool> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_user_by_email<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    email: &str,
) -> Res<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_user_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn get_user_by_billing_customer_ref<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    customer_ref: &str,
) -> Res<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE billing_customer_ref = $1")
        .bind(customer_ref)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

pub async fn insert_user<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: UserCreateRequest,
) -> Res<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, password_hash, name, whatsapp_number, billing_customer_ref)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(data.email)
    .bind(data.password_hash)
    .bind(data.name)
    .bind(data.whatsapp_number)
    .bind(data.billing_customer_ref)
    .fetch_one(executor)
    .await
    .map_err(|e| match e {
        // lost a race against a concurrent registration with the same email
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Email already in use".to_string())
        }
        other => AppError::from(other),
    })
}

pub async fn update_profile<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    data: ProfileUpdateRequest,
) -> Res<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET name = $1, whatsapp_number = $2, updated_at = now()
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(data.name)
    .bind(data.whatsapp_number)
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .map_err(AppError::from)
}

pub async fn update_subscription_status<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    status: SubscriptionTier,
) -> Res<()> {
    sqlx::query("UPDATE users SET subscription_status = $1, updated_at = now() WHERE id = $2")
        .bind(status.as_str())
        .bind(user_id)
        .execute(executor)
        .await
        .map_err(AppError::from)?;
    Ok(())
}

pub async fn update_billing_customer_ref<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    customer_ref: &str,
) -> Res<()> {
    sqlx::query("UPDATE users SET billing_customer_ref = $1, updated_at = now() WHERE id = $2")
        .bind(customer_ref)
        .bind(user_id)
        .execute(executor)
        .await
        .map_err(AppError::from)?;
    Ok(())
}
