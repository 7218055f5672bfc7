mod chain;
mod checkout;
mod health;
pub mod models;

use actix_web::HttpResponse;
use actix_web::web::{self, ServiceConfig};

use crate::error::ChainError;
use models::ErrorResponse;

pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::validate_chain)
            .service(chain::get_difficulty)
            .service(checkout::post_checkout),
    )
    .service(chain::get_chain_root)
    .service(checkout::post_checkout_legacy);
}

/// Map a ledger error onto an HTTP status with a JSON body.
pub fn error_response(err: &ChainError) -> HttpResponse {
    let body = ErrorResponse {
        error: err.to_string(),
        kind: err.kind(),
    };
    match err {
        e if e.is_stale() => HttpResponse::Conflict().json(body),
        e if e.is_validation() => HttpResponse::UnprocessableEntity().json(body),
        ChainError::MiningExhausted { .. } => HttpResponse::ServiceUnavailable().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}
