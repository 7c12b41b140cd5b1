use common::error::{AppError, Res};
use common::misc::{optional, required};
use db::dtos::lookbook::{ItemCreateRequest, LookbookWriteRequest};
use db::models::lookbook::LookbookWithItems;
use db::models::user::SubscriptionTier;
use db::{LookbookRepository, UserRepository};
use uuid::Uuid;

use crate::dtos::lookbook::LookbookBody;

/// Lookbook ids arrive as raw path segments. Anything that is not a UUID
/// cannot name a lookbook, so it is reported the same way as a missing one.
pub fn parse_lookbook_id(raw: &str) -> Res<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| not_found())
}

pub(crate) fn not_found() -> AppError {
    AppError::NotFound("Lookbook not found".to_string())
}

/// Checks a create/replace body and trims it into a write request.
/// Every lookbook must keep at least one item.
pub fn validate_lookbook(body: LookbookBody) -> Res<LookbookWriteRequest> {
    let title = required("title", &body.title)?;
    if body.items.is_empty() {
        return Err(AppError::BadRequest(
            "A lookbook needs at least one item".to_string(),
        ));
    }

    let items = body
        .items
        .into_iter()
        .map(|item| {
            Ok(ItemCreateRequest {
                image_url: required("imageUrl", &item.image_url)?,
                name: required("name", &item.name)?,
                price: optional(item.price.as_deref()),
            })
        })
        .collect::<Res<Vec<_>>>()?;

    Ok(LookbookWriteRequest {
        title,
        description: optional(body.description.as_deref()),
        items,
    })
}

/// Creates a lookbook for `owner_id`. Free accounts are capped at `free_limit` lookbooks.
pub async fn create_lookbook(
    lookbooks: &(impl LookbookRepository + ?Sized),
    users: &(impl UserRepository + ?Sized),
    owner_id: Uuid,
    body: LookbookBody,
    free_limit: i64,
) -> Res<LookbookWithItems> {
    let data = validate_lookbook(body)?;

    let owner = users
        .find_user_by_id(owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if owner.tier() == SubscriptionTier::Free {
        let owned = lookbooks.count_lookbooks(owner_id).await?;
        if owned >= free_limit {
            log::info!(
                "User {} hit the free tier limit of {} lookbooks",
                owner_id,
                free_limit
            );
            return Err(AppError::QuotaExceeded(format!(
                "Free plan is limited to {} lookbooks. Upgrade to Pro to create more.",
                free_limit
            )));
        }
    }

    lookbooks.create_lookbook(owner_id, data).await
}

pub async fn list_lookbooks(
    lookbooks: &(impl LookbookRepository + ?Sized),
    owner_id: Uuid,
) -> Res<Vec<LookbookWithItems>> {
    lookbooks.list_lookbooks(owner_id).await
}

pub async fn get_owned_lookbook(
    lookbooks: &(impl LookbookRepository + ?Sized),
    owner_id: Uuid,
    lookbook_id: Uuid,
) -> Res<LookbookWithItems> {
    lookbooks
        .find_owned(lookbook_id, owner_id)
        .await?
        .ok_or_else(not_found)
}

/// Replaces title, description and the whole item set. Item ids are regenerated.
pub async fn update_owned_lookbook(
    lookbooks: &(impl LookbookRepository + ?Sized),
    owner_id: Uuid,
    lookbook_id: Uuid,
    body: LookbookBody,
) -> Res<LookbookWithItems> {
    let data = validate_lookbook(body)?;
    lookbooks
        .replace_owned(lookbook_id, owner_id, data)
        .await?
        .ok_or_else(not_found)
}

pub async fn delete_owned_lookbook(
    lookbooks: &(impl LookbookRepository + ?Sized),
    owner_id: Uuid,
    lookbook_id: Uuid,
) -> Res<()> {
    if lookbooks.delete_owned(lookbook_id, owner_id).await? {
        log::info!("Lookbook {} deleted by user {}", lookbook_id, owner_id);
        Ok(())
    } else {
        Err(not_found())
    }
}
