// Route exports
pub mod matches;

use actix_web::web;
use crate::services::ProfileSource;

pub fn configure_routes<S: ProfileSource + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure::<S>),
    );
}
