pub mod algorithm;
pub mod config;
pub mod schemas;
pub mod wrangling;
