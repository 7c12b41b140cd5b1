use common::error::{AppError, Res};
use db::UserRepository;
use db::models::user::SubscriptionTier;
use stripe::{CheckoutSessionMode, Event, EventObject, EventType, SubscriptionStatus, Webhook};

/// Tier a billing customer should end up on after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionChange {
    pub customer_ref: String,
    pub tier: SubscriptionTier,
}

/// Verifies the payload signature against the webhook secret and parses the event.
/// An empty secret is refused outright rather than handed to the verifier.
pub fn construct_event(payload: &str, signature: &str, webhook_secret: &str) -> Res<Event> {
    if webhook_secret.is_empty() {
        log::error!("Rejected webhook payload: STRIPE_WEBHOOK_SECRET is not set");
        return Err(AppError::Upstream(
            "Webhook secret is not configured".to_string(),
        ));
    }
    Webhook::construct_event(payload, signature, webhook_secret).map_err(|e| {
        log::warn!("Rejected webhook payload: {}", e);
        AppError::Upstream(format!("Webhook Error: {}", e))
    })
}

pub fn tier_for_status(status: &SubscriptionStatus) -> SubscriptionTier {
    match status {
        SubscriptionStatus::Active | SubscriptionStatus::Trialing => SubscriptionTier::Pro,
        _ => SubscriptionTier::Free,
    }
}

/// Maps a provider event onto a tier change. Events that do not affect the
/// subscription tier yield `None`.
pub fn subscription_change(
    event_type: EventType,
    object: EventObject,
) -> Option<SubscriptionChange> {
    match (event_type, object) {
        (
            EventType::CustomerSubscriptionCreated | EventType::CustomerSubscriptionUpdated,
            EventObject::Subscription(subscription),
        ) => Some(SubscriptionChange {
            customer_ref: subscription.customer.id().to_string(),
            tier: tier_for_status(&subscription.status),
        }),
        (EventType::CustomerSubscriptionDeleted, EventObject::Subscription(subscription)) => {
            Some(SubscriptionChange {
                customer_ref: subscription.customer.id().to_string(),
                tier: SubscriptionTier::Free,
            })
        }
        (EventType::CheckoutSessionCompleted, EventObject::CheckoutSession(session))
            if session.mode == CheckoutSessionMode::Subscription =>
        {
            session.customer.map(|customer| SubscriptionChange {
                customer_ref: customer.id().to_string(),
                tier: SubscriptionTier::Pro,
            })
        }
        _ => None,
    }
}

/// Writes the new tier for the matching user.
/// Returns `false` when nothing changed: unknown customer, or the user is
/// already on that tier.
pub async fn apply_subscription_change(
    users: &(impl UserRepository + ?Sized),
    change: &SubscriptionChange,
) -> Res<bool> {
    let Some(user) = users
        .find_user_by_billing_customer_ref(&change.customer_ref)
        .await?
    else {
        log::warn!(
            "Ignoring billing event for unknown customer {}",
            change.customer_ref
        );
        return Ok(false);
    };

    if user.tier() == change.tier {
        log::debug!("User {} already on {} tier", user.id, change.tier);
        return Ok(false);
    }

    users.set_subscription_status(user.id, change.tier).await?;
    log::info!("User {} subscription set to {}", user.id, change.tier);
    Ok(true)
}

/// Processes the webhook event. Events are applied in delivery order; the
/// latest delivered subscription state wins.
pub async fn process_webhook_event(
    users: &(impl UserRepository + ?Sized),
    event: Event,
) -> Res<()> {
    let event_type = event.type_;
    log::info!("Processing webhook event {}: {}", event.id, event_type);

    match subscription_change(event_type, event.data.object) {
        Some(change) => {
            apply_subscription_change(users, &change).await?;
        }
        None => log::debug!("Unhandled event type: {}", event_type),
    }
    Ok(())
}
