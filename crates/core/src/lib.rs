//! Vitrine
//!
//! Storefront cart core: a quantity-aware cart store, a simpler catalog
//! selection set, and a deterministic order-message composer. All logic here
//! is synchronous and free of I/O; persistence and external channels live in
//! `vitrine-app`.

pub mod cart;
pub mod message;
pub mod money;
pub mod orders;
pub mod products;
pub mod profile;
pub mod selection;
