use db::models::user::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The part of a user that is safe to hand back to its owner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub whatsapp_number: String,
    pub subscription_status: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        let subscription_status = user.tier().to_string();
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            whatsapp_number: user.whatsapp_number,
            subscription_status,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdateBody {
    pub name: String,
    pub whatsapp_number: String,
}
