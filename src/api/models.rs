use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::blockchain::{Block, Ledger};
use crate::checkout::BookCheckout;

/// Shared application state: the ledger, built once at startup.
pub struct AppState {
    pub ledger: Arc<Ledger>,
}

impl AppState {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(ledger),
        }
    }
}

/* ---------- Checkout API Models ---------- */

/// Inbound checkout; the id is derived server-side.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub title: String,
    pub author: String,
    pub publish_date: String,
    pub isbn: String,
    pub user: String,
    pub checkout_date: String,
}

impl CheckoutRequest {
    pub fn into_checkout(self) -> BookCheckout {
        BookCheckout::new(
            self.title,
            self.author,
            self.publish_date,
            self.isbn,
            self.user,
            self.checkout_date,
        )
    }
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub message: &'static str,
    pub block: Block,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse {
    pub length: usize,
    pub difficulty: u32,
    pub chain: Vec<Block>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
    pub difficulty: u32,
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct DifficultyResponse {
    pub difficulty: u32,
    pub accepted_since_increase: u32,
    pub step_interval: u32,
}
