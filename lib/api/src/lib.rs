//! HTTP surface for related-content lookups.
//!
//! - `GET /health`
//! - `GET /related/{contenttype}/{id}?limit=&explain=`
//! - `POST /related/{contenttype}/{id}` with `{"options": {...}, "explain": bool}`

pub mod rest;

pub use rest::{AppState, RestApi};
