use actix_web::{Responder, get, post, put, web};
use common::{error::Res, http::Success, jwt::JwtClaims};
use db::UserRepository;

use crate::dtos::user::{ProfileResponse, ProfileUpdateBody};
use crate::services;

/// Returns the authenticated seller's profile, never the password hash.
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/profile', {
///   headers: { 'Authorization': `Bearer ${localStorage.getItem('authToken')}` }
/// });
/// // { id, name, email, whatsappNumber, subscriptionStatus }
/// ```
#[get("")]
async fn get_profile(
    claims: web::ReqData<JwtClaims>,
    users: web::Data<dyn UserRepository>,
) -> Res<impl Responder> {
    let user = services::user::get_user_by_id(users.get_ref(), claims.user_id).await?;
    Success::ok(ProfileResponse::from(user))
}

/// Overwrites `name` and `whatsappNumber`. Email and subscription status are not editable here.
#[post("")]
async fn post_profile(
    claims: web::ReqData<JwtClaims>,
    body: web::Json<ProfileUpdateBody>,
    users: web::Data<dyn UserRepository>,
) -> Res<impl Responder> {
    save_profile(claims.into_inner(), body.into_inner(), users.get_ref()).await
}

#[put("")]
async fn put_profile(
    claims: web::ReqData<JwtClaims>,
    body: web::Json<ProfileUpdateBody>,
    users: web::Data<dyn UserRepository>,
) -> Res<impl Responder> {
    save_profile(claims.into_inner(), body.into_inner(), users.get_ref()).await
}

async fn save_profile(
    claims: JwtClaims,
    body: ProfileUpdateBody,
    users: &dyn UserRepository,
) -> Res<actix_web::HttpResponse> {
    let user = services::user::update_profile(users, claims.user_id, body).await?;
    Success::ok(ProfileResponse::from(user))
}
