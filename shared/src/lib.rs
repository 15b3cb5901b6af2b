pub mod aws;
pub mod client_manager;
pub mod config;
pub mod entity;
pub mod errors;
pub mod repository;
pub mod requests;
pub mod service;
pub mod tracer;
pub mod utils;
