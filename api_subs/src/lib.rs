use actix_web::web;

mod dtos {
    pub(crate) mod billing;
}

mod routes {
    pub(crate) mod billing;
    pub(crate) mod webhook;
}

pub mod services {
    pub mod checkout;
    pub mod webhook;
}

/// Provider callbacks; authenticated by signature, not by bearer token.
pub fn mount_webhook() -> actix_web::Scope {
    web::scope("/webhooks").service(routes::webhook::post_stripe_webhook)
}

/// Checkout endpoints; must be mounted behind the auth middleware.
pub fn mount_billing() -> actix_web::Scope {
    web::scope("/billing").service(routes::billing::post_checkout)
}
