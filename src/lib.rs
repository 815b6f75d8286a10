pub mod config;
pub mod enrich;
pub mod error;
pub mod leagues;
pub mod logging;
pub mod model;
pub mod normalization;
pub mod orchestrator;
pub mod sources;
pub mod store;

pub mod util {
    pub mod db;
    pub mod env;
}
