use actix_web::{Scope, web};
use common::error::AppError;

use crate::health;

/// The whole `/api` tree. Credentials, share links and the Stripe webhook are
/// public; everything an owner does sits behind the bearer middleware.
pub fn api_scope(jwt_secret: &str) -> Scope {
    web::scope("/api")
        .service(health::get_health)
        .service(api_auth::mount_auth())
        .service(api_lookbooks::mount_public())
        .service(api_subs::mount_webhook())
        .service(
            web::scope("")
                .wrap(api_auth::auth_middleware(jwt_secret))
                .service(api_auth::mount_profile())
                .service(api_lookbooks::mount_lookbooks())
                .service(api_subs::mount_billing()),
        )
}

/// Body limit for JSON extractors; unparsable bodies answer 400 like any other validation error.
pub fn json_config(max_payload_bytes: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(max_payload_bytes)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::Method, http::StatusCode, test};
    use chrono::Utc;
    use common::env_config::{BillingConfig, Config, JwtConfig};
    use common::jwt::generate_jwt;
    use common::stripe::{BillingClient, MockBillingClient};
    use db::models::lookbook::{Lookbook, LookbookItem, LookbookWithItems};
    use db::models::user::User;
    use db::repository::{MockLookbookRepository, MockUserRepository};
    use db::{LookbookRepository, UserRepository};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use uuid::Uuid;

    const SECRET: &str = "route-secret";

    fn config() -> Arc<Config> {
        Arc::new(Config {
            environment: "development".to_string(),
            database_url: "postgres://localhost/lookbook".to_string(),
            jwt_config: jwt_config(),
            server_host: "127.0.0.1".to_string(),
            server_port: 3001,
            num_workers: 1,
            cors_allowed_origin: "http://localhost:3000".to_string(),
            console_logging_enabled: false,
            log_level: "info".to_string(),
            log_file: "lookbook.log".to_string(),
            max_payload_bytes: 1024 * 1024,
            free_tier_lookbook_limit: 3,
            app_url: "http://localhost:3000".to_string(),
            billing: BillingConfig::default(),
        })
    }

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: SECRET.to_string(),
            expiration_hours: 1,
        }
    }

    fn bearer(user_id: Uuid) -> (&'static str, String) {
        let token = generate_jwt(user_id, &jwt_config()).unwrap();
        ("Authorization", format!("Bearer {}", token))
    }

    fn seller(id: Uuid, status: &str) -> User {
        User {
            id,
            email: "ana@x.com".to_string(),
            password_hash: "hash".to_string(),
            name: "Ana".to_string(),
            whatsapp_number: "97433123456".to_string(),
            billing_customer_ref: None,
            subscription_status: status.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn verao(id: Uuid, owner_id: Uuid) -> LookbookWithItems {
        LookbookWithItems {
            lookbook: Lookbook {
                id,
                user_id: owner_id,
                title: "Verão".to_string(),
                description: None,
                created_at: Utc::now(),
            },
            items: vec![LookbookItem {
                id: Uuid::new_v4(),
                lookbook_id: id,
                position: 0,
                image_url: "u1".to_string(),
                name: "Vestido".to_string(),
                price: None,
            }],
        }
    }

    macro_rules! app {
        ($lookbooks:expr, $users:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(config()))
                    .app_data(web::Data::from(
                        Arc::new($lookbooks) as Arc<dyn LookbookRepository>
                    ))
                    .app_data(web::Data::from(Arc::new($users) as Arc<dyn UserRepository>))
                    .app_data(web::Data::from(
                        Arc::new(MockBillingClient::new()) as Arc<dyn BillingClient>
                    ))
                    .app_data(json_config(1024 * 1024))
                    .service(api_scope(SECRET)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn share_page_and_health_need_no_token() {
        let owner_id = Uuid::new_v4();
        let lookbook_id = Uuid::new_v4();
        let mut lookbooks = MockLookbookRepository::new();
        lookbooks
            .expect_find_lookbook()
            .returning(move |id| Ok(Some(verao(id, owner_id))));
        let mut users = MockUserRepository::new();
        users
            .expect_find_user_by_id()
            .returning(|id| Ok(Some(seller(id, "free"))));
        let app = app!(lookbooks, users);

        let req = test::TestRequest::get()
            .uri(&format!("/api/lookbook-details/{}", lookbook_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["contact"]["whatsappNumber"], "97433123456");
        assert!(body["lookbook"].get("userId").is_none());

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn owner_routes_require_a_token() {
        let id = Uuid::new_v4();
        let app = app!(MockLookbookRepository::new(), MockUserRepository::new());

        for (method, uri) in [
            (Method::GET, "/api/lookbooks".to_string()),
            (Method::POST, "/api/lookbooks".to_string()),
            (Method::GET, format!("/api/lookbooks/{}", id)),
            (Method::PUT, format!("/api/lookbooks/{}", id)),
            (Method::DELETE, format!("/api/lookbooks/{}", id)),
            (Method::GET, "/api/profile".to_string()),
            (Method::PUT, "/api/profile".to_string()),
            (Method::POST, "/api/billing/checkout".to_string()),
        ] {
            let req = test::TestRequest::default()
                .method(method.clone())
                .uri(&uri)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        }

        let req = test::TestRequest::get()
            .uri("/api/lookbooks")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn owner_deletes_only_their_own_lookbook() {
        let owner_id = Uuid::new_v4();
        let mine = Uuid::new_v4();
        let mut lookbooks = MockLookbookRepository::new();
        lookbooks
            .expect_delete_owned()
            .returning(move |id, owner| Ok(id == mine && owner == owner_id));
        let app = app!(lookbooks, MockUserRepository::new());

        let req = test::TestRequest::delete()
            .uri(&format!("/api/lookbooks/{}", mine))
            .insert_header(bearer(owner_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/lookbooks/{}", mine))
            .insert_header(bearer(Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn create_validates_before_touching_the_store() {
        let owner_id = Uuid::new_v4();
        let mut lookbooks = MockLookbookRepository::new();
        lookbooks.expect_create_lookbook().never();
        let mut users = MockUserRepository::new();
        users.expect_find_user_by_id().never();
        let app = app!(lookbooks, users);

        let req = test::TestRequest::post()
            .uri("/api/lookbooks")
            .insert_header(bearer(owner_id))
            .set_json(json!({ "title": "Verão", "items": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/lookbooks")
            .insert_header(bearer(owner_id))
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{ not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn create_returns_the_stored_lookbook() {
        let owner_id = Uuid::new_v4();
        let mut lookbooks = MockLookbookRepository::new();
        lookbooks.expect_count_lookbooks().returning(|_| Ok(0));
        lookbooks
            .expect_create_lookbook()
            .returning(|owner, _| Ok(verao(Uuid::new_v4(), owner)));
        let mut users = MockUserRepository::new();
        users
            .expect_find_user_by_id()
            .returning(|id| Ok(Some(seller(id, "free"))));
        let app = app!(lookbooks, users);

        let req = test::TestRequest::post()
            .uri("/api/lookbooks")
            .insert_header(bearer(owner_id))
            .set_json(json!({
                "title": "Verão",
                "items": [{ "imageUrl": "u1", "name": "Vestido" }]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["userId"], owner_id.to_string());
        assert_eq!(body["items"][0]["imageUrl"], "u1");
    }

    #[actix_web::test]
    async fn webhook_is_public_but_demands_a_signature() {
        let mut users = MockUserRepository::new();
        users.expect_set_subscription_status().never();
        let app = app!(MockLookbookRepository::new(), users);

        let req = test::TestRequest::post()
            .uri("/api/webhooks/stripe")
            .set_payload(r#"{"id":"evt_1","type":"checkout.session.completed"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/webhooks/stripe")
            .insert_header(("Stripe-Signature", "t=1,v1=deadbeef"))
            .set_payload(r#"{"id":"evt_1","type":"checkout.session.completed"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
