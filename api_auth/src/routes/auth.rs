use actix_web::{Responder, post, web};
use common::env_config::Config;
use common::error::Res;
use common::http::Success;
use common::jwt;
use common::stripe::BillingClient;
use db::UserRepository;
use std::sync::Arc;

use crate::dtos::auth::{AuthResponse, LoginRequest, RegisterRequest, RegisterResponse};
use crate::services;

/// Registers a new seller account.
///
/// # Input
/// - `req`: JSON payload with `name`, `whatsappNumber`, `email` and `password`
///
/// # Output
/// - Success: 201 Created with `{ "id", "email" }`
/// - Error: 400 for a missing field, 409 if the email is taken
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/auth/register', {
///   method: 'POST',
///   headers: { 'Content-Type': 'application/json' },
///   body: JSON.stringify({
///     name: 'Ana',
///     whatsappNumber: '97433123456',
///     email: 'ana@x.com',
///     password: 'secret'
///   })
/// });
/// ```
#[post("/register")]
async fn post_register(
    req: web::Json<RegisterRequest>,
    users: web::Data<dyn UserRepository>,
    billing: web::Data<dyn BillingClient>,
) -> Res<impl Responder> {
    let user = services::user::create_user_with_credentials(
        users.get_ref(),
        billing.get_ref(),
        req.into_inner(),
    )
    .await?;
    Success::created(RegisterResponse {
        id: user.id,
        email: user.email,
    })
}

/// Authenticates a seller with email and password.
///
/// # Output
/// - Success: `{ "token", "user" }`; send the token as `Authorization: Bearer <token>`
/// - Error: 400 for blank fields, 401 for invalid credentials
#[post("/login")]
pub async fn post_login(
    login_data: web::Json<LoginRequest>,
    config: web::Data<Arc<Config>>,
    users: web::Data<dyn UserRepository>,
) -> Res<impl Responder> {
    let user = services::auth::authenticate_user(users.get_ref(), &login_data.into_inner()).await?;
    let token = jwt::generate_jwt(user.id, &config.jwt_config)?;
    log::info!("User {} logged in", user.id);
    Success::ok(AuthResponse {
        token,
        user: user.into(),
    })
}
