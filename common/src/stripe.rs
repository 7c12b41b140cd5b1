use async_trait::async_trait;
use mockall::automock;
use stripe::{
    CheckoutSession, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCustomer, Customer, CustomerId,
};

use crate::{
    env_config::BillingConfig,
    error::{AppError, Res},
};

pub fn create_client(secret_key: &str) -> Client {
    Client::new(secret_key)
}

/// Outbound calls to the payment provider.
#[automock]
#[async_trait]
pub trait BillingClient: Send + Sync {
    /// False when no provider credentials are configured.
    fn is_enabled(&self) -> bool;

    /// Creates a customer at the provider and returns its id.
    async fn create_customer(&self, email: &str, name: &str) -> Res<String>;

    /// Creates a hosted checkout page for the Pro subscription and returns its URL.
    async fn create_pro_checkout(&self, customer_ref: &str, client_reference_id: &str)
    -> Res<String>;
}

pub struct StripeBilling {
    client: Option<Client>,
    pro_price_id: String,
    app_url: String,
}

impl StripeBilling {
    pub fn new(config: &BillingConfig, app_url: &str) -> Self {
        let client = config
            .is_enabled()
            .then(|| create_client(&config.stripe_secret_key));
        Self {
            client,
            pro_price_id: config.stripe_pro_price_id.clone(),
            app_url: app_url.trim_end_matches('/').to_string(),
        }
    }

    fn client(&self) -> Res<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Upstream("Billing is not configured".to_string()))
    }
}

#[async_trait]
impl BillingClient for StripeBilling {
    fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    async fn create_customer(&self, email: &str, name: &str) -> Res<String> {
        let params = CreateCustomer {
            email: Some(email),
            name: Some(name),
            ..Default::default()
        };

        let customer = Customer::create(self.client()?, params)
            .await
            .map_err(AppError::from)?;
        Ok(customer.id.to_string())
    }

    async fn create_pro_checkout(
        &self,
        customer_ref: &str,
        client_reference_id: &str,
    ) -> Res<String> {
        if self.pro_price_id.is_empty() {
            return Err(AppError::Upstream("Pro price is not configured".to_string()));
        }
        let customer = customer_ref.parse::<CustomerId>().map_err(|e| {
            AppError::Internal(format!(
                "Failed to parse customer id: {}. {}",
                customer_ref, e
            ))
        })?;
        let success_url = format!("{}/payment-success", self.app_url);
        let cancel_url = format!("{}/payment-cancel", self.app_url);

        let params = CreateCheckoutSession {
            line_items: Some(vec![CreateCheckoutSessionLineItems {
                price: Some(self.pro_price_id.clone()),
                quantity: Some(1),
                ..Default::default()
            }]),
            mode: Some(CheckoutSessionMode::Subscription),
            success_url: Some(success_url.as_str()),
            cancel_url: Some(cancel_url.as_str()),
            customer: Some(customer),
            client_reference_id: Some(client_reference_id),
            ..Default::default()
        };
        let session = CheckoutSession::create(self.client()?, params)
            .await
            .map_err(AppError::from)?;

        session
            .url
            .ok_or_else(|| AppError::Upstream("Checkout session has no URL".to_string()))
    }
}
