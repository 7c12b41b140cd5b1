use actix_web::web;

pub mod dtos {
    pub mod lookbook;
}
mod routes {
    pub(crate) mod lookbook;
    pub(crate) mod public;
}
pub mod services {
    pub mod lookbook;
    pub mod public;
}

/// Owner CRUD; must be mounted behind the auth middleware.
pub fn mount_lookbooks() -> actix_web::Scope {
    web::scope("/lookbooks")
        .service(routes::lookbook::get_lookbooks)
        .service(routes::lookbook::post_lookbook)
        .service(routes::lookbook::get_lookbook)
        .service(routes::lookbook::put_lookbook)
        .service(routes::lookbook::delete_lookbook)
}

/// Share links. No authentication: knowing the id is enough.
pub fn mount_public() -> actix_web::Scope {
    web::scope("/lookbook-details").service(routes::public::get_lookbook_details)
}
