use actix_web::{Responder, delete, get, post, put, web};
use common::env_config::Config;
use common::error::Res;
use common::http::Success;
use common::jwt::JwtClaims;
use db::{LookbookRepository, UserRepository};
use std::sync::Arc;

use crate::dtos::lookbook::{LookbookBody, LookbookResponse};
use crate::services::lookbook::{self as service, parse_lookbook_id};

/// Lists the caller's lookbooks, newest first, items attached.
#[get("")]
async fn get_lookbooks(
    claims: web::ReqData<JwtClaims>,
    lookbooks: web::Data<dyn LookbookRepository>,
) -> Res<impl Responder> {
    let owned = service::list_lookbooks(lookbooks.get_ref(), claims.user_id).await?;
    Success::ok(
        owned
            .into_iter()
            .map(LookbookResponse::from)
            .collect::<Vec<_>>(),
    )
}

/// Creates a lookbook with at least one item.
///
/// # Output
/// - Success: 201 Created with the stored lookbook and generated item ids
/// - Error: 400 on validation, 403 when a free account is at its limit
///
/// # Frontend Example
/// ```javascript
/// await fetch('/api/lookbooks', {
///   method: 'POST',
///   headers: {
///     'Content-Type': 'application/json',
///     'Authorization': `Bearer ${token}`
///   },
///   body: JSON.stringify({
///     title: 'Verão',
///     description: 'Coleção de verão',
///     items: [{ imageUrl: 'data:image/jpeg;base64,...', name: 'Vestido', price: 'R$ 120' }]
///   })
/// });
/// ```
#[post("")]
async fn post_lookbook(
    claims: web::ReqData<JwtClaims>,
    body: web::Json<LookbookBody>,
    lookbooks: web::Data<dyn LookbookRepository>,
    users: web::Data<dyn UserRepository>,
    config: web::Data<Arc<Config>>,
) -> Res<impl Responder> {
    let created = service::create_lookbook(
        lookbooks.get_ref(),
        users.get_ref(),
        claims.user_id,
        body.into_inner(),
        config.free_tier_lookbook_limit,
    )
    .await?;
    Success::created(LookbookResponse::from(created))
}

#[get("/{id}")]
async fn get_lookbook(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<String>,
    lookbooks: web::Data<dyn LookbookRepository>,
) -> Res<impl Responder> {
    let lookbook_id = parse_lookbook_id(&path)?;
    let found = service::get_owned_lookbook(lookbooks.get_ref(), claims.user_id, lookbook_id).await?;
    Success::ok(LookbookResponse::from(found))
}

/// Replaces the lookbook in full. Item ids change on every update.
#[put("/{id}")]
async fn put_lookbook(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<String>,
    body: web::Json<LookbookBody>,
    lookbooks: web::Data<dyn LookbookRepository>,
) -> Res<impl Responder> {
    let lookbook_id = parse_lookbook_id(&path)?;
    let updated = service::update_owned_lookbook(
        lookbooks.get_ref(),
        claims.user_id,
        lookbook_id,
        body.into_inner(),
    )
    .await?;
    Success::ok(LookbookResponse::from(updated))
}

#[delete("/{id}")]
async fn delete_lookbook(
    claims: web::ReqData<JwtClaims>,
    path: web::Path<String>,
    lookbooks: web::Data<dyn LookbookRepository>,
) -> Res<impl Responder> {
    let lookbook_id = parse_lookbook_id(&path)?;
    service::delete_owned_lookbook(lookbooks.get_ref(), claims.user_id, lookbook_id).await?;
    Success::no_content()
}
