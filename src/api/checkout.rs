use std::time::Instant;

use actix_web::{HttpResponse, Responder, post, web};
use log::{debug, error, info, warn};

use super::error_response;
use super::models::{AppState, CheckoutRequest, CheckoutResponse};

/// Seal a checkout record into a new block.
#[post("/checkouts/")]
pub async fn post_checkout(
    state: web::Data<AppState>,
    body: web::Json<CheckoutRequest>,
) -> impl Responder {
    submit(&state, body.into_inner()).await
}

/// Same as `post_checkout`, at the original `POST /new` path.
#[post("/new")]
pub async fn post_checkout_legacy(
    state: web::Data<AppState>,
    body: web::Json<CheckoutRequest>,
) -> impl Responder {
    submit(&state, body.into_inner()).await
}

async fn submit(state: &AppState, req: CheckoutRequest) -> HttpResponse {
    if req.isbn.trim().is_empty() || req.user.trim().is_empty() {
        warn!("POST checkout - rejected: isbn and user are required");
        return HttpResponse::BadRequest().body("isbn and user are required");
    }

    let payload = req.into_checkout();
    debug!(
        "POST checkout - received: book={} isbn={} user={}",
        payload.id, payload.isbn, payload.user
    );

    // Mining is CPU-bound; keep it off the async workers.
    let t0 = Instant::now();
    let ledger = state.ledger.clone();
    match web::block(move || ledger.submit_with_retry(payload)).await {
        Ok(Ok(block)) => {
            info!(
                "POST checkout - sealed #{} for {} in {:?}",
                block.position,
                block.payload.user,
                t0.elapsed()
            );
            HttpResponse::Created().json(CheckoutResponse {
                message: "book has been added to the library blockchain",
                block,
            })
        }
        Ok(Err(err)) => {
            warn!("POST checkout - rejected: {err}");
            error_response(&err)
        }
        Err(err) => {
            error!("POST checkout - mining task failed: {err}");
            HttpResponse::InternalServerError().body("mining task failed")
        }
    }
}
