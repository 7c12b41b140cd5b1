use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Lookbook {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct LookbookItem {
    pub id: Uuid,
    pub lookbook_id: Uuid,
    pub position: i32,
    pub image_url: String,
    pub name: String,
    pub price: Option<String>,
}

/// A lookbook row together with its items in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct LookbookWithItems {
    pub lookbook: Lookbook,
    pub items: Vec<LookbookItem>,
}
