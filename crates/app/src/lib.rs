//! Storefront application services.
//!
//! Service layer over the `vitrine` cart core: collaborator traits for the
//! hosted document store, identity provider, media upload endpoint and
//! messaging handoff, plus the checkout orchestrator that ties them
//! together. Every external system sits behind a narrow trait with a mock
//! (and, for the document store, an in-memory implementation) so the core
//! flows are testable without any vendor backend.

pub mod auth;
pub mod banners;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod documents;
pub mod handoff;
pub mod media;
pub mod orders;
pub mod storage;
pub mod subscription;
