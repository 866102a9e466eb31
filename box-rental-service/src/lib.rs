pub mod availability;
pub mod catalog;
pub mod config;
pub mod date;
pub mod driver;
pub mod messages;
pub mod models;
pub mod service;
pub mod store;
pub mod tasks;
#[cfg(feature = "telegram")]
pub mod telegram;
pub mod workflow;
