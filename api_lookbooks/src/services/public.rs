use common::error::{AppError, Res};
use db::{LookbookRepository, UserRepository};

use crate::dtos::lookbook::{ContactResponse, PublicLookbook, PublicLookbookResponse};
use crate::services::lookbook::{not_found, parse_lookbook_id};

/// Builds the click-to-chat link a visitor uses to ask about one item.
/// `None` when the seller has no number on file.
pub fn whatsapp_link(number: &str, item_name: &str, lookbook_title: &str) -> Option<String> {
    if number.is_empty() {
        return None;
    }
    let message = format!(
        "Olá, tenho interesse neste item: {} da coleção '{}'.",
        item_name, lookbook_title
    );
    // wa.me expects %20 rather than the form-encoded '+'
    let text = url::form_urlencoded::byte_serialize(message.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    Some(format!("https://wa.me/{}?text={}", number, text))
}

/// Resolves a share link. The id is the only credential; the response carries
/// the seller's name and WhatsApp number and nothing else about the account.
pub async fn get_public_lookbook(
    lookbooks: &(impl LookbookRepository + ?Sized),
    users: &(impl UserRepository + ?Sized),
    raw_id: &str,
) -> Res<PublicLookbookResponse> {
    let lookbook_id = parse_lookbook_id(raw_id)?;
    let found = lookbooks
        .find_lookbook(lookbook_id)
        .await?
        .ok_or_else(not_found)?;

    let owner = users
        .find_user_by_id(found.lookbook.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Lookbook owner not found".to_string()))?;

    let mut lookbook = PublicLookbook::from(found);
    for item in lookbook.items.iter_mut() {
        item.whatsapp_link = whatsapp_link(&owner.whatsapp_number, &item.name, &lookbook.title);
    }

    Ok(PublicLookbookResponse {
        lookbook,
        contact: ContactResponse {
            name: owner.name,
            whatsapp_number: owner.whatsapp_number,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use db::models::lookbook::{Lookbook, LookbookItem, LookbookWithItems};
    use db::models::user::User;
    use db::repository::{MockLookbookRepository, MockUserRepository};
    use uuid::Uuid;

    fn ana(id: Uuid) -> User {
        User {
            id,
            email: "ana@x.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            name: "Ana".to_string(),
            whatsapp_number: "97433123456".to_string(),
            billing_customer_ref: Some("cus_ana".to_string()),
            subscription_status: "free".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn verao(id: Uuid, owner_id: Uuid) -> LookbookWithItems {
        LookbookWithItems {
            lookbook: Lookbook {
                id,
                user_id: owner_id,
                title: "Verão".to_string(),
                description: None,
                created_at: Utc::now(),
            },
            items: vec![LookbookItem {
                id: Uuid::new_v4(),
                lookbook_id: id,
                position: 0,
                image_url: "u1".to_string(),
                name: "Vestido".to_string(),
                price: None,
            }],
        }
    }

    #[test]
    fn link_percent_encodes_the_message() {
        let link = whatsapp_link("97433123456", "Vestido", "Verão").unwrap();

        assert_eq!(
            link,
            "https://wa.me/97433123456?text=Ol%C3%A1%2C%20tenho%20interesse%20neste%20item%3A%20Vestido%20da%20cole%C3%A7%C3%A3o%20%27Ver%C3%A3o%27."
        );
    }

    #[test]
    fn no_number_no_link() {
        assert_eq!(whatsapp_link("", "Vestido", "Verão"), None);
    }

    #[tokio::test]
    async fn public_view_exposes_contact_but_not_account() {
        let owner_id = Uuid::new_v4();
        let lookbook_id = Uuid::new_v4();
        let mut lookbooks = MockLookbookRepository::new();
        lookbooks
            .expect_find_lookbook()
            .returning(move |id| Ok(Some(verao(id, owner_id))));
        let mut users = MockUserRepository::new();
        users
            .expect_find_user_by_id()
            .returning(|id| Ok(Some(ana(id))));

        let response = get_public_lookbook(&lookbooks, &users, &lookbook_id.to_string())
            .await
            .unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["lookbook"]["title"], "Verão");
        assert_eq!(json["contact"]["name"], "Ana");
        assert_eq!(json["contact"]["whatsappNumber"], "97433123456");
        assert!(
            json["lookbook"]["items"][0]["whatsappLink"]
                .as_str()
                .unwrap()
                .starts_with("https://wa.me/97433123456?text=")
        );

        let raw = json.to_string();
        assert!(!raw.contains("ana@x.com"));
        assert!(!raw.contains("argon2"));
        assert!(!raw.contains("cus_ana"));
        assert!(!raw.contains("subscriptionStatus"));
    }

    #[tokio::test]
    async fn public_view_hides_owner_id() {
        let owner_id = Uuid::new_v4();
        let mut lookbooks = MockLookbookRepository::new();
        lookbooks
            .expect_find_lookbook()
            .returning(move |id| Ok(Some(verao(id, owner_id))));
        let mut users = MockUserRepository::new();
        users
            .expect_find_user_by_id()
            .returning(|id| Ok(Some(ana(id))));

        let response = get_public_lookbook(&lookbooks, &users, &Uuid::new_v4().to_string())
            .await
            .unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert!(json["lookbook"].get("userId").is_none());
        assert!(!json.to_string().contains(&owner_id.to_string()));
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let mut lookbooks = MockLookbookRepository::new();
        lookbooks.expect_find_lookbook().times(1).returning(|_| Ok(None));
        let users = MockUserRepository::new();

        let missing = get_public_lookbook(&lookbooks, &users, &Uuid::new_v4().to_string()).await;
        let malformed = get_public_lookbook(&lookbooks, &users, "42").await;

        assert!(matches!(missing, Err(AppError::NotFound(_))));
        assert!(matches!(malformed, Err(AppError::NotFound(_))));
    }
}
