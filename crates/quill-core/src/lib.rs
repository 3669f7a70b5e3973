//! # Quill Core
//!
//! The domain layer of Quill.
//! This crate contains the post model, its validation rules, the store port
//! and the service that mediates between callers and the store. It has zero
//! infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::{DomainError, RepoError};
pub use service::PostService;
