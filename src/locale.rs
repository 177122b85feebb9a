//! Locale utilities
//!
//! This module provides the current-locale capability consumed by the
//! translation store, and helpers for validating locale tags such as
//! `en`, `pt-BR`, `zh_Hant` or `eng`.

use anyhow::{Result, anyhow};
use isolang::Language;
use parking_lot::RwLock;
use std::sync::Arc;

/// Source of the application's current locale
pub trait LocaleProvider: Send + Sync {
    /// Locale used when an operation does not name one
    fn current_locale(&self) -> String;
}

/// A locale that never changes
#[derive(Debug, Clone)]
pub struct FixedLocale(String);

impl FixedLocale {
    pub fn new(locale: impl Into<String>) -> Self {
        Self(locale.into())
    }
}

impl LocaleProvider for FixedLocale {
    fn current_locale(&self) -> String {
        self.0.clone()
    }
}

/// A locale that can be switched at runtime, e.g. per request
///
/// Clones share the same underlying value.
#[derive(Debug, Clone)]
pub struct SharedLocale {
    current: Arc<RwLock<String>>,
}

impl SharedLocale {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            current: Arc::new(RwLock::new(locale.into())),
        }
    }

    /// Replace the current locale
    pub fn set(&self, locale: impl Into<String>) {
        *self.current.write() = locale.into();
    }
}

impl LocaleProvider for SharedLocale {
    fn current_locale(&self) -> String {
        self.current.read().clone()
    }
}

/// Extract the primary language subtag of a locale tag
pub fn primary_language(tag: &str) -> &str {
    let tag = tag.trim();
    tag.split(['-', '_']).next().unwrap_or(tag)
}

/// Validate a locale tag
///
/// The primary subtag must be an ISO 639-1 (2-letter) or ISO 639-3
/// (3-letter) code. Further subtags (region, script) must be 2 to 8 ASCII
/// alphanumerics.
pub fn validate_locale(tag: &str) -> Result<()> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Empty locale"));
    }

    let mut parts = trimmed.split(['-', '_']);
    let primary = parts.next().unwrap_or_default().to_lowercase();

    let known = match primary.len() {
        2 => Language::from_639_1(&primary).is_some(),
        3 => Language::from_639_3(&primary).is_some(),
        _ => false,
    };
    if !known {
        return Err(anyhow!("Unknown language in locale: {}", tag));
    }

    for subtag in parts {
        if !(2..=8).contains(&subtag.len()) || !subtag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(anyhow!("Invalid subtag '{}' in locale: {}", subtag, tag));
        }
    }

    Ok(())
}

/// English name of the locale's language
pub fn language_name(tag: &str) -> Result<String> {
    validate_locale(tag)?;
    let primary = primary_language(tag).to_lowercase();

    let lang = match primary.len() {
        2 => Language::from_639_1(&primary),
        _ => Language::from_639_3(&primary),
    }
    .ok_or_else(|| anyhow!("Failed to get language from locale: {}", tag))?;

    Ok(lang.to_name().to_string())
}
