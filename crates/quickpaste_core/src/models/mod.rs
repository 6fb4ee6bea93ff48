//! Data models for snippets and settings.

/// User settings (theme, language, sort).
pub mod settings;
/// Snippet records and request payloads.
pub mod snippet;

#[cfg(test)]
mod tests;
