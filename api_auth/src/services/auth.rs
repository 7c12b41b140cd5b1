use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use common::error::{AppError, Res};
use db::UserRepository;
use db::models::user::User;

use crate::dtos::auth::LoginRequest;

/// Authenticates existing user.
/// Unknown email and wrong password fail the same way, so callers cannot tell
/// which addresses are registered.
pub async fn authenticate_user(
    users: &(impl UserRepository + ?Sized),
    login_data: &LoginRequest,
) -> Res<User> {
    let email = login_data.email.trim().to_lowercase();
    if email.is_empty() || login_data.password.is_empty() {
        return Err(AppError::BadRequest(
            "email and password are required".to_string(),
        ));
    }

    let Some(user) = users.find_user_by_email(&email).await? else {
        return Err(invalid_credentials());
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;
    let is_valid = Argon2::default()
        .verify_password(login_data.password.as_bytes(), &parsed_hash)
        .is_ok();

    if is_valid {
        Ok(user)
    } else {
        Err(invalid_credentials())
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}
