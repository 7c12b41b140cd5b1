use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, password_hash::PasswordHasher};
use common::error::{AppError, Res};
use common::misc::{normalize_email, normalize_whatsapp_number, required};
use common::stripe::BillingClient;
use db::UserRepository;
use db::dtos::user::{ProfileUpdateRequest, UserCreateRequest};
use db::models::user::User;
use uuid::Uuid;

use crate::dtos::auth::RegisterRequest;
use crate::dtos::user::ProfileUpdateBody;

/// Inserts user record with hashed credentials.
/// A billing customer is provisioned when billing is configured; if the provider
/// is unreachable the account is still created and the customer is created at checkout.
pub async fn create_user_with_credentials(
    users: &(impl UserRepository + ?Sized),
    billing: &(impl BillingClient + ?Sized),
    req: RegisterRequest,
) -> Res<User> {
    let name = required("name", &req.name)?;
    let whatsapp_number = normalize_whatsapp_number(&req.whatsapp_number)?;
    let email = normalize_email(&req.email)?;
    if req.password.is_empty() {
        return Err(AppError::BadRequest("password is required".to_string()));
    }

    if users.exists_user_by_email(&email).await? {
        return Err(AppError::Conflict("Email already in use".to_string()));
    }

    let password_hash = hash_password(&req.password)?;

    let billing_customer_ref = if billing.is_enabled() {
        match billing.create_customer(&email, &name).await {
            Ok(customer_ref) => Some(customer_ref),
            Err(e) => {
                log::warn!("Registering {} without billing customer: {}", email, e);
                None
            }
        }
    } else {
        None
    };

    let user = users
        .create_user(UserCreateRequest {
            email,
            password_hash,
            name,
            whatsapp_number,
            billing_customer_ref,
        })
        .await?;

    log::info!("User {} registered", user.id);
    Ok(user)
}

pub async fn get_user_by_id(
    users: &(impl UserRepository + ?Sized),
    user_id: Uuid,
) -> Res<User> {
    users
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Overwrites display name and WhatsApp number, nothing else.
pub async fn update_profile(
    users: &(impl UserRepository + ?Sized),
    user_id: Uuid,
    body: ProfileUpdateBody,
) -> Res<User> {
    let data = ProfileUpdateRequest {
        name: required("name", &body.name)?,
        whatsapp_number: normalize_whatsapp_number(&body.whatsapp_number)?,
    };

    users
        .update_profile(user_id, data)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub(crate) fn hash_password(password: &str) -> Res<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}
