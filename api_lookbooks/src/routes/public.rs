use actix_web::{Responder, get, web};
use common::error::Res;
use common::http::Success;
use db::{LookbookRepository, UserRepository};

use crate::services;

/// Public share view: the lookbook, its items with click-to-chat links, and
/// the seller's contact.
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch(`/api/lookbook-details/${id}`);
/// const { lookbook, contact } = await response.json();
/// ```
#[get("/{id}")]
async fn get_lookbook_details(
    path: web::Path<String>,
    lookbooks: web::Data<dyn LookbookRepository>,
    users: web::Data<dyn UserRepository>,
) -> Res<impl Responder> {
    let response =
        services::public::get_public_lookbook(lookbooks.get_ref(), users.get_ref(), &path).await?;
    Success::ok(response)
}
