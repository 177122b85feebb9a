/*!
 * Translation store module.
 *
 * This module provides:
 * - Owner binding for domain entities (`Owner`, `Translatable`)
 * - The per-owner translation store and its operations
 * - The `Translations` factory shared across an application
 */

pub mod owner;
pub mod translation_store;
pub mod translations;
pub mod value;

// Re-export main types
pub use owner::{Owner, OwnerRef, Translatable};
pub use translation_store::TranslationStore;
pub use translations::Translations;
pub use value::{SetOutcome, TranslationValue};
