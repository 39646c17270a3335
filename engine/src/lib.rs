// Engine library root
// This file declares the modules for the decision engine crate.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod services;
pub mod strategy;

pub use error::EngineError;
pub use strategy::{evaluate, CycleReport};
