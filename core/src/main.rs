mod cors;
mod health;
mod routes;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use common::env_config::Config;
use common::stripe::{BillingClient, StripeBilling};
use db::{LookbookRepository, PgRepository, UserRepository};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.is_production();
    let origin = config.cors_allowed_origin.clone();

    // init logger
    logger::setup(
        &config.log_level,
        &config.log_file,
        config.console_logging_enabled,
    )
    .expect("Failed to set up logger");

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");
    let repo = Arc::new(PgRepository::new(pool));
    let users: web::Data<dyn UserRepository> =
        web::Data::from(repo.clone() as Arc<dyn UserRepository>);
    let lookbooks: web::Data<dyn LookbookRepository> =
        web::Data::from(repo as Arc<dyn LookbookRepository>);

    // billing stays disabled until a Stripe key is configured
    let billing: web::Data<dyn BillingClient> = web::Data::from(
        Arc::new(StripeBilling::new(&config.billing, &config.app_url)) as Arc<dyn BillingClient>,
    );
    if !config.billing.is_enabled() {
        log::warn!("STRIPE_SECRET_KEY not set, billing is disabled");
    }

    log::info!(
        "Starting server on {}:{} with {} workers",
        config.server_host,
        config.server_port,
        config.num_workers
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config_data.clone()))
            .app_data(users.clone())
            .app_data(lookbooks.clone())
            .app_data(billing.clone())
            .app_data(routes::json_config(config_data.max_payload_bytes))
            .wrap(logger::middleware(config_data.console_logging_enabled)) // 2nd
            .wrap(cors::middleware(&origin)) // 1st
            .service(routes::api_scope(&config_data.jwt_config.secret))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
