//! Capacity-bounded event reservation service.
//!
//! Events carry a fixed seat capacity; the [`engine`] issues at most one
//! active ticket per `(event, user)` pair and never oversells, even under
//! concurrent purchase attempts. Authentication is an upstream concern;
//! see [`identity`].

pub mod config;
pub mod engine;
pub mod guard;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod query;
pub mod routes;
pub mod store;
pub mod utils;
