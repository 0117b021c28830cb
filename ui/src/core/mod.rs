//! Cross-cutting helpers shared by the views.

pub mod download;
pub mod format;
pub mod platform;
