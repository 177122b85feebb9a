/*!
 * Owner binding for translation stores.
 *
 * A domain entity becomes translatable by exposing its type discriminator
 * and identifier through `Owner` and opting into `Translatable`.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use super::translation_store::TranslationStore;
use super::translations::Translations;

/// Identity of an entity that owns translations
pub trait Owner {
    /// Type discriminator stored in the `model` column, e.g. "Post"
    fn type_name(&self) -> &str;

    /// Identifier stored in the `model_id` column
    fn owner_id(&self) -> i64;
}

/// Entities that can hand out a translation store bound to themselves
///
/// ```ignore
/// struct Post { id: i64 }
///
/// impl Owner for Post {
///     fn type_name(&self) -> &str { "Post" }
///     fn owner_id(&self) -> i64 { self.id }
/// }
///
/// impl Translatable for Post {}
///
/// post.translation(&translations).set("title", "Hello", Some("en"))?;
/// ```
pub trait Translatable: Owner {
    /// A store bound to this entity
    fn translation(&self, translations: &Translations) -> TranslationStore {
        translations.store_for(self)
    }
}

/// Owned snapshot of an owner's identity, captured at bind time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef {
    /// Type discriminator, e.g. "Post"
    pub type_name: String,
    /// Owner identifier
    pub id: i64,
}

impl OwnerRef {
    /// Identity from a type name and id
    pub fn new(type_name: impl Into<String>, id: i64) -> Self {
        Self {
            type_name: type_name.into(),
            id,
        }
    }

    /// Capture the identity of any owner
    pub fn of<O: Owner + ?Sized>(owner: &O) -> Self {
        Self::new(owner.type_name(), owner.owner_id())
    }
}

impl Owner for OwnerRef {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn owner_id(&self) -> i64 {
        self.id
    }
}

impl fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.type_name, self.id)
    }
}
