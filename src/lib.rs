pub mod analysis;
pub mod cli;
pub mod config;
pub mod fetch;
pub mod history;
pub mod models;
pub mod relay;
pub mod reporting;
pub mod runner;
