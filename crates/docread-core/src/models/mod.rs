//! Data models for decoded documents and configuration.

pub mod config;
pub mod document;
pub mod invoice;
