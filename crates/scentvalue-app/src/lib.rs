//! Application service layer - config, session, capture, export

pub mod capture;
pub mod config;
pub mod export;
pub mod repository;
pub mod session;
