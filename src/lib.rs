pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod recommendations;
pub mod report;
pub mod server;
pub mod sizers;
pub mod tuning;
