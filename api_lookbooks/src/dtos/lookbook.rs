use chrono::{DateTime, Utc};
use db::models::lookbook::{LookbookItem, LookbookWithItems};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemBody {
    pub image_url: String,
    pub name: String,
    pub price: Option<String>,
}

/// Body of both create and full-replace requests.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LookbookBody {
    pub title: String,
    pub description: Option<String>,
    pub items: Vec<ItemBody>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: Uuid,
    pub position: i32,
    pub image_url: String,
    pub name: String,
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_link: Option<String>,
}

impl From<LookbookItem> for ItemResponse {
    fn from(item: LookbookItem) -> Self {
        Self {
            id: item.id,
            position: item.position,
            image_url: item.image_url,
            name: item.name,
            price: item.price,
            whatsapp_link: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookbookResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<ItemResponse>,
}

impl From<LookbookWithItems> for LookbookResponse {
    fn from(found: LookbookWithItems) -> Self {
        let LookbookWithItems { lookbook, items } = found;
        Self {
            id: lookbook.id,
            user_id: lookbook.user_id,
            title: lookbook.title,
            description: lookbook.description,
            created_at: lookbook.created_at,
            items: items.into_iter().map(ItemResponse::from).collect(),
        }
    }
}

/// Lookbook as shown on the share page. Carries no account identifiers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicLookbook {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<ItemResponse>,
}

impl From<LookbookWithItems> for PublicLookbook {
    fn from(found: LookbookWithItems) -> Self {
        let LookbookWithItems { lookbook, items } = found;
        Self {
            id: lookbook.id,
            title: lookbook.title,
            description: lookbook.description,
            created_at: lookbook.created_at,
            items: items.into_iter().map(ItemResponse::from).collect(),
        }
    }
}

/// The only owner fields a visitor ever sees.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub name: String,
    pub whatsapp_number: String,
}

#[derive(Debug, Serialize)]
pub struct PublicLookbookResponse {
    pub lookbook: PublicLookbook,
    pub contact: ContactResponse,
}
