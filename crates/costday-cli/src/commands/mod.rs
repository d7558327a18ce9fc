//! Command handlers

pub mod asset;
pub mod config;
