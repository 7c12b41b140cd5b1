pub struct UserCreateRequest {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub whatsapp_number: String,
    pub billing_customer_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdateRequest {
    pub name: String,
    pub whatsapp_number: String,
}
