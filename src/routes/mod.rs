pub mod auth;
pub mod friends;
pub mod health;
pub mod invitations;
pub mod letters;
pub mod notes;
pub mod users;

use actix_web::web;

use crate::error::AppError;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health::health_check)
        .configure(auth::auth_routes)
        .configure(users::users_routes)
        .configure(friends::friends_routes)
        .configure(invitations::invitations_routes)
        .configure(letters::letters_routes)
        .configure(notes::notes_routes);
}

/// Corps JSON illisible → 400 {message}
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::bad_request(format!("Invalid JSON body: {}", err)).into()
    })
}

/// Paramètre de chemin illisible (id non UUID...) → 400 {message}
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        AppError::bad_request(format!("Invalid path parameter: {}", err)).into()
    })
}
