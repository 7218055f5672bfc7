pub mod model;

pub use model::BookCheckout;
