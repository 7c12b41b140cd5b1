use actix_web::{HttpRequest, Responder, post, web};
use common::env_config::Config;
use common::error::{AppError, Res};
use common::http::Success;
use db::UserRepository;
use std::sync::Arc;

use crate::dtos::billing::WebhookAck;
use crate::services;

/// Receives subscription lifecycle events from Stripe.
///
/// The raw body is verified against the `Stripe-Signature` header before any
/// field of it is trusted. Events for unknown customers are acknowledged so the
/// provider stops retrying them.
///
/// # Stripe Configuration Example
/// 1. Go to Stripe Dashboard → Developers → Webhooks
/// 2. Add Endpoint: https://yourapp.com/api/webhooks/stripe
/// 3. Select `customer.subscription.*` and `checkout.session.completed`
/// 4. Set the signing secret as STRIPE_WEBHOOK_SECRET
#[post("/stripe")]
async fn post_stripe_webhook(
    req: HttpRequest,
    payload: String,
    config: web::Data<Arc<Config>>,
    users: web::Data<dyn UserRepository>,
) -> Res<impl Responder> {
    let signature = req
        .headers()
        .get("Stripe-Signature")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Upstream("Missing Stripe-Signature header".to_string()))?;

    let event = services::webhook::construct_event(
        &payload,
        signature,
        &config.billing.stripe_webhook_secret,
    )?;
    services::webhook::process_webhook_event(users.get_ref(), event).await?;

    Success::ok(WebhookAck { received: true })
}
