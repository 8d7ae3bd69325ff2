//! Route Handlers

pub mod data;
pub mod health;
pub mod prediction;
pub mod training;
