// file: src/logging/mod.rs
// version: 1.0.0
// guid: 74a0d56f-35ba-4b7e-b5de-e80a02ff34b9

//! Logging system for the Skyforge CLI

pub mod logger;

pub use logger::init_logger;
