use common::error::{AppError, Res};
use common::stripe::BillingClient;
use db::UserRepository;
use db::models::user::SubscriptionTier;
use uuid::Uuid;

/// Creates a hosted checkout page for the Pro plan and returns its URL.
/// Users registered while billing was unavailable get their customer created here.
pub async fn create_pro_checkout(
    users: &(impl UserRepository + ?Sized),
    billing: &(impl BillingClient + ?Sized),
    user_id: Uuid,
) -> Res<String> {
    if !billing.is_enabled() {
        return Err(AppError::Upstream("Billing is not configured".to_string()));
    }

    let user = users
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.tier() == SubscriptionTier::Pro {
        return Err(AppError::Conflict(
            "Subscription is already active".to_string(),
        ));
    }

    let customer_ref = match user.billing_customer_ref {
        Some(customer_ref) => customer_ref,
        None => {
            let customer_ref = billing.create_customer(&user.email, &user.name).await?;
            users.set_billing_customer_ref(user.id, &customer_ref).await?;
            log::info!("Provisioned billing customer for user {}", user.id);
            customer_ref
        }
    };

    billing
        .create_pro_checkout(&customer_ref, &user.id.to_string())
        .await
}
