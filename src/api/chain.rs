use actix_web::{HttpResponse, Responder, get, web};
use log::{debug, warn};

use super::models::{AppState, ChainResponse, DifficultyResponse, ValidateResponse};

fn chain_response(state: &AppState) -> HttpResponse {
    // Snapshot first; difficulty may move on between the two reads.
    let chain = state.ledger.read_chain();
    let resp = ChainResponse {
        length: chain.len(),
        difficulty: state.ledger.difficulty().difficulty,
        chain,
    };
    debug!("GET chain - {} blocks", resp.length);
    HttpResponse::Ok().json(resp)
}

/// Get the full chain.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    chain_response(&state)
}

/// Root listing, kept for clients of the original `GET /` endpoint.
#[get("/")]
pub async fn get_chain_root(state: web::Data<AppState>) -> impl Responder {
    chain_response(&state)
}

/// Audit the whole chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let audit = state.ledger.audit();
    if let Err(err) = &audit {
        warn!("AUDIT - chain invalid: {err}");
    }
    HttpResponse::Ok().json(ValidateResponse {
        valid: audit.is_ok(),
        length: state.ledger.read_chain().len(),
        difficulty: state.ledger.difficulty().difficulty,
        error: audit.err().map(|e| e.to_string()),
    })
}

/// Get the current PoW difficulty and ramp progress.
#[get("/difficulty/")]
pub async fn get_difficulty(state: web::Data<AppState>) -> impl Responder {
    let snapshot = state.ledger.difficulty();
    HttpResponse::Ok().json(DifficultyResponse {
        difficulty: snapshot.difficulty,
        accepted_since_increase: snapshot.accepted_since_increase,
        step_interval: state.ledger.step_interval(),
    })
}
