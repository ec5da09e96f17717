//! Core functionality for document storage, encoding, and configuration

pub mod config;
pub mod document;
pub mod error;
pub mod file_system;
pub mod tokenizer;
