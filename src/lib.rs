pub mod acquire;
pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod workbook;

pub use error::{AppError, Result};
