pub mod ai;
pub mod config;
pub mod error;
pub mod helpers;
pub mod rules;
pub mod store;
