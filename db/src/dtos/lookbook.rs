#[derive(Debug, Clone, PartialEq)]
pub struct ItemCreateRequest {
    pub image_url: String,
    pub name: String,
    pub price: Option<String>,
}

/// Validated payload for creating a lookbook or replacing one in full.
#[derive(Debug, Clone, PartialEq)]
pub struct LookbookWriteRequest {
    pub title: String,
    pub description: Option<String>,
    pub items: Vec<ItemCreateRequest>,
}
