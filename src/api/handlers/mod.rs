//! HTTP request handlers

pub mod health;
pub mod generate;
pub mod frames;
pub mod scenes;
