//! HTTP surface for the launchpad aggregator.
//!
//! - `GET /` health and discovery
//! - `GET /latest` aggregated launches, cached; `?fresh=1` or `?nocache=1` forces a run

pub mod routes;
pub mod state;
