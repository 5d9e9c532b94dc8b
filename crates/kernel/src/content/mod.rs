//! Content management module.
//!
//! This module provides:
//! - Resource: descriptors for the blog and news resources
//! - ContentRepository / PgContentRepository: SQL persistence
//! - ContentUseCase / ContentService: orchestration boundary used by routes
//! - sanitize: payload sanitization and validation

mod repository;
mod resource;
pub mod sanitize;
mod use_case;

pub use repository::{ContentRepository, PgContentRepository};
pub use resource::Resource;
pub use use_case::{ContentService, ContentUseCase};
