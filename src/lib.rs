//! Kiosk
//!
//! Cart and order composition engine for a fast-food ordering kiosk: catalog
//! loading, menu and drink selection flows, a persisted cart with merged
//! lines, and order submission.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod observability;
pub mod orders;
pub mod persistence;
pub mod prelude;
pub mod pricing;
pub mod render;
pub mod selection;
pub mod session;
pub mod uuids;
