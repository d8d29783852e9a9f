//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate engine + repository calls into use-case level APIs.
//! - Keep UI layers decoupled from storage and classification details.

pub mod card_service;
pub mod import_service;
pub mod relation_service;
