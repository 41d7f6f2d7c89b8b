// src/models/mod.rs

//! Data structures for the relational entities and the typed write commands
//! consumed by the store clients. Category documents stay schema-less and are
//! handled as raw JSON maps by the document store client.

pub mod cart;
pub mod order;
pub mod product;

pub use cart::{Cart, CartProduct, EnrichedCart};
pub use order::CustomerOrder;
pub use product::{Product, ProductUpdate, UpdateProductRequest};
