pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

use crate::app::{json_config, path_config};

/// Registers every route. `/health` and `/auth/*` are public; the task routes
/// require an `AuthenticatedUser`, which `AuthMiddleware` provides.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health::health)
        .service(
            web::scope("/auth")
                .service(auth::login)
                .service(auth::register),
        )
        .service(
            web::scope("/tasks")
                .service(tasks::list_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::complete_task)
                .service(tasks::delete_task),
        );
}
