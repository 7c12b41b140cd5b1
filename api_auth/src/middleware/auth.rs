use std::{future::Future, pin::Pin, rc::Rc};

use actix_web::{
    Error, HttpMessage, ResponseError,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use common::error::AppError;
use common::jwt;
use futures::future::{Ready, ok};

/// Rejects requests without a valid bearer token and exposes the decoded
/// `JwtClaims` to downstream handlers through request extensions.
pub struct AuthMiddleware {
    jwt_secret: Rc<String>,
}

impl AuthMiddleware {
    pub fn new(jwt_secret: String) -> Self {
        AuthMiddleware {
            jwt_secret: Rc::new(jwt_secret),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
            jwt_secret: self.jwt_secret.clone(),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    jwt_secret: Rc<String>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|header| header.to_str().ok())
            .and_then(jwt::bearer_token)
            .map(str::to_string);

        let Some(token) = token else {
            let response = AppError::Unauthorized("No authorization token provided".to_string())
                .error_response();
            return Box::pin(async move { Ok(req.into_response(response)) });
        };

        let claims = match jwt::validate_jwt(&token, &self.jwt_secret) {
            Ok(claims) => claims,
            Err(e) => {
                log::debug!("Rejected token on {}: {}", req.path(), e);
                let response =
                    AppError::Forbidden("Invalid or expired token".to_string()).error_response();
                return Box::pin(async move { Ok(req.into_response(response)) });
            }
        };

        req.extensions_mut().insert(claims);
        let srv = Rc::clone(&self.service);
        Box::pin(async move { srv.call(req).await.map(|res| res.map_into_boxed_body()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, Responder, get, http::StatusCode, test, web};
    use common::env_config::JwtConfig;
    use common::jwt::JwtClaims;
    use uuid::Uuid;

    const SECRET: &str = "middleware-test-secret";

    #[get("/whoami")]
    async fn whoami(claims: web::ReqData<JwtClaims>) -> impl Responder {
        HttpResponse::Ok().body(claims.user_id.to_string())
    }

    fn token(secret: &str, expiration_hours: i64, user_id: Uuid) -> String {
        jwt::generate_jwt(
            user_id,
            &JwtConfig {
                secret: secret.to_string(),
                expiration_hours,
            },
        )
        .unwrap()
    }

    #[actix_web::test]
    async fn missing_token_is_unauthorized() {
        let app = test::init_service(
            App::new().service(
                web::scope("")
                    .wrap(AuthMiddleware::new(SECRET.to_string()))
                    .service(whoami),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", "Basic abc"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn invalid_or_expired_token_is_forbidden() {
        let app = test::init_service(
            App::new().service(
                web::scope("")
                    .wrap(AuthMiddleware::new(SECRET.to_string()))
                    .service(whoami),
            ),
        )
        .await;

        for bad in [
            token("some-other-secret", 24, Uuid::new_v4()),
            token(SECRET, -2, Uuid::new_v4()),
            "not-a-jwt".to_string(),
        ] {
            let req = test::TestRequest::get()
                .uri("/whoami")
                .insert_header(("Authorization", format!("Bearer {}", bad)))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        }
    }

    #[actix_web::test]
    async fn valid_token_exposes_claims_to_handlers() {
        let app = test::init_service(
            App::new().service(
                web::scope("")
                    .wrap(AuthMiddleware::new(SECRET.to_string()))
                    .service(whoami),
            ),
        )
        .await;
        let user_id = Uuid::new_v4();

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((
                "Authorization",
                format!("Bearer {}", token(SECRET, 24, user_id)),
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(body, user_id.to_string().as_bytes());
    }
}
