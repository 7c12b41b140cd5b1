use actix_web::web;
use middleware::auth::AuthMiddleware;

pub mod dtos {
    pub mod auth;
    pub mod user;
}
pub mod middleware {
    pub mod auth;
}
mod routes {
    pub(crate) mod auth;
    pub(crate) mod user;
}
pub mod services {
    pub mod auth;
    pub mod user;
}

/// Public credential endpoints under `/auth`.
pub fn mount_auth() -> actix_web::Scope {
    web::scope("/auth")
        .service(routes::auth::post_register)
        .service(routes::auth::post_login)
}

/// Profile endpoints; must be mounted behind [`auth_middleware`].
pub fn mount_profile() -> actix_web::Scope {
    web::scope("/profile")
        .service(routes::user::get_profile)
        .service(routes::user::post_profile)
        .service(routes::user::put_profile)
}

pub fn auth_middleware(jwt_secret: &str) -> AuthMiddleware {
    AuthMiddleware::new(jwt_secret.to_string())
}
