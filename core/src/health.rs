use actix_web::{Responder, get};
use common::error::Res;
use common::http::Success;

#[get("/health")]
pub async fn get_health() -> Res<impl Responder> {
    Success::ok(serde_json::json!({ "status": "ok" }))
}
