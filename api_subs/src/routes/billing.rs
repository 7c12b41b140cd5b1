use actix_web::{Responder, post, web};
use common::error::Res;
use common::http::Success;
use common::jwt::JwtClaims;
use common::stripe::BillingClient;
use db::UserRepository;

use crate::dtos::billing::CheckoutResponse;
use crate::services;

/// Starts the upgrade to Pro. The client redirects the browser to the returned `url`;
/// the tier itself only changes once the provider reports the subscription.
///
/// # Frontend Example
/// ```javascript
/// const response = await fetch('/api/billing/checkout', {
///   method: 'POST',
///   headers: { 'Authorization': `Bearer ${localStorage.getItem('authToken')}` }
/// });
/// const { url } = await response.json();
/// window.location.href = url;
/// ```
#[post("/checkout")]
async fn post_checkout(
    claims: web::ReqData<JwtClaims>,
    users: web::Data<dyn UserRepository>,
    billing: web::Data<dyn BillingClient>,
) -> Res<impl Responder> {
    let url =
        services::checkout::create_pro_checkout(users.get_ref(), billing.get_ref(), claims.user_id)
            .await?;
    Success::ok(CheckoutResponse { url })
}
