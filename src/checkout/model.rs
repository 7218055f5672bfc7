use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A book checkout event, the record sealed inside each block.
///
/// Field order is part of the hash preimage: `serde_json` emits fields in
/// declaration order, so do not reorder them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookCheckout {
    /// A stable identifier computed from the book's static fields.
    pub id: String,
    pub title: String,
    pub author: String,
    pub publish_date: String,
    pub isbn: String,
    pub user: String,
    pub checkout_date: String,
    /// Marks the placeholder record carried by the genesis block.
    #[serde(default)]
    pub is_genesis: bool,
}

impl BookCheckout {
    /// Build a checkout record and derive its id from ISBN + publish date.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        publish_date: impl Into<String>,
        isbn: impl Into<String>,
        user: impl Into<String>,
        checkout_date: impl Into<String>,
    ) -> Self {
        let publish_date = publish_date.into();
        let isbn = isbn.into();
        Self {
            id: Self::derive_id(&isbn, &publish_date),
            title: title.into(),
            author: author.into(),
            publish_date,
            isbn,
            user: user.into(),
            checkout_date: checkout_date.into(),
            is_genesis: false,
        }
    }

    /// Placeholder payload for the genesis block.
    pub fn genesis() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            author: String::new(),
            publish_date: String::new(),
            isbn: String::new(),
            user: String::new(),
            checkout_date: String::new(),
            is_genesis: true,
        }
    }

    /// SHA-256 (hex) of `isbn + publish_date`. The same edition of a book
    /// always maps to the same id, whoever checks it out.
    pub fn derive_id(isbn: &str, publish_date: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(isbn.as_bytes());
        hasher.update(publish_date.as_bytes());
        hex::encode(hasher.finalize())
    }
}
