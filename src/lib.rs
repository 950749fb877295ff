pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod gbif;
pub mod geometry;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod spreadsheet;
pub mod validator;
