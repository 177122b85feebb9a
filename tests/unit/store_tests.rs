/*!
 * Tests for translation store operations
 */

use std::collections::HashMap;

use translatable::{SetOutcome, StoreError, Translatable};

use crate::common::{self, Post};

fn count_rows(translations: &translatable::Translations) -> i64 {
    translations.database().stats().expect("Failed to get stats").translation_count
}

/// Creating a translation stores the owner, field, locale and value
#[test]
fn test_createTranslation_shouldStoreOwnerFieldAndLocale() {
    let translations = common::in_memory_translations();
    let post = Post::new(1);

    let record = post
        .translation(&translations)
        .create_translation("title", "Post Title Translation", None)
        .expect("Failed to create translation");

    assert_eq!(record.field, "title");
    assert_eq!(record.value, "Post Title Translation");
    assert_eq!(record.locale, "en");
    assert_eq!(record.owner_type, "Post");
    assert_eq!(record.owner_id, 1);
}

/// Creating with an explicit locale stores that locale
#[test]
fn test_createTranslation_withSpecifiedLocale_shouldStoreLocale() {
    let translations = common::in_memory_translations();
    let post = Post::new(1);

    let record = post
        .translation(&translations)
        .create_translation("title", "Terjemahan Tajuk", Some("my"))
        .unwrap();

    assert_eq!(record.field, "title");
    assert_eq!(record.value, "Terjemahan Tajuk");
    assert_eq!(record.locale, "my");
}

/// Updating an existing translation overwrites its value
#[test]
fn test_updateTranslation_withExistingRecord_shouldOverwriteValue() {
    let translations = common::in_memory_translations();
    let post = Post::new(1);
    post.translation(&translations)
        .create_translation("title", "Original created title", None)
        .unwrap();

    let record = post
        .translation(&translations)
        .update_translation("title", "Post Title Translation", None)
        .unwrap();

    assert_eq!(record.value, "Post Title Translation");
    assert_eq!(
        post.translation(&translations).get("title", None).unwrap().as_deref(),
        Some("Post Title Translation")
    );
}

/// Updating a missing translation fails with NotFound and writes nothing
#[test]
fn test_updateTranslation_withoutRecord_shouldFailWithNotFound() {
    let translations = common::in_memory_translations();
    let post = Post::new(1);

    let result = post
        .translation(&translations)
        .update_translation("title", "x", Some("fr"));

    match result {
        Err(StoreError::NotFound { field, locale }) => {
            assert_eq!(field, "title");
            assert_eq!(locale, "fr");
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert_eq!(count_rows(&translations), 0);
}

/// set() with a single value creates a translation
#[test]
fn test_set_single_shouldCreateTranslation() {
    let translations = common::in_memory_translations();
    let post = Post::new(1);

    let outcome = post
        .translation(&translations)
        .set("title", "Post Title Translation", None)
        .unwrap();

    let record = outcome.single().expect("expected a single record");
    assert_eq!(record.value, "Post Title Translation");
}

/// set() twice on the same key leaves exactly one record with the last value
#[test]
fn test_set_twice_shouldConvergeToOneRecord() {
    let translations = common::in_memory_translations();
    let post = Post::new(1);
    let store = post.translation(&translations);

    store.set("title", "v1", Some("en")).unwrap();
    store.set("title", "v2", Some("en")).unwrap();

    assert_eq!(count_rows(&translations), 1);
    assert_eq!(store.get("title", Some("en")).unwrap().as_deref(), Some("v2"));
}

/// createOrUpdate decides between insert and update
#[test]
fn test_createOrUpdateSingleTranslation_shouldCreateThenUpdate() {
    let translations = common::in_memory_translations();
    let post = Post::new(1);
    let store = post.translation(&translations);

    assert_eq!(store.get("title", None).unwrap(), None);

    let created = store
        .create_or_update_single_translation("title", "First Title Without Locale", None)
        .unwrap();
    assert_eq!(created.value, "First Title Without Locale");

    let updated = store
        .create_or_update_single_translation("title", "Second Title Without Locale", None)
        .unwrap();
    assert_eq!(updated.value, "Second Title Without Locale");
    assert_eq!(updated.id, created.id);
    assert_eq!(count_rows(&translations), 1);
}

/// A locale map writes every entry and returns records in input order
#[test]
fn test_set_multiple_shouldPreserveInputOrder() {
    let translations = common::in_memory_translations();
    let post = Post::new(1);
    let store = post.translation(&translations);
    store.create_translation("title", "Original created title", None).unwrap();

    let outcome = store
        .set(
            "title",
            [("en", "Post Title Translation"), ("my", "Terjemahan Tajuk")],
            None,
        )
        .unwrap();

    assert!(matches!(outcome, SetOutcome::Many(_)));
    let records = outcome.into_records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].locale, "en");
    assert_eq!(records[0].value, "Post Title Translation");
    assert_eq!(records[1].locale, "my");
    assert_eq!(records[1].value, "Terjemahan Tajuk");
}

/// Batch order follows the input even when storage order differs
#[test]
fn test_set_multiple_withExistingLaterLocale_shouldKeepInputOrder() {
    let translations = common::in_memory_translations();
    let post = Post::new(1);
    let store = post.translation(&translations);
    store.set("title", "B0", Some("my")).unwrap();

    let records = store
        .set("title", [("en", "A"), ("my", "B")], Some("ar"))
        .unwrap()
        .into_records();

    let pairs: Vec<(&str, &str)> = records
        .iter()
        .map(|r| (r.locale.as_str(), r.value.as_str()))
        .collect();
    assert_eq!(pairs, vec![("en", "A"), ("my", "B")]);
    assert_eq!(store.get("title", Some("ar")).unwrap(), None);
}

/// get() returns the stored value
#[test]
fn test_get_withExistingRecord_shouldReturnValue() {
    let translations = common::in_memory_translations();
    let post = Post::new(1);
    post.translation(&translations)
        .create_translation("title", "Original created title", None)
        .unwrap();

    assert_eq!(
        post.translation(&translations).get("title", None).unwrap().as_deref(),
        Some("Original created title")
    );
}

/// clear() is idempotent: true, then false
#[test]
fn test_clear_twice_shouldReturnTrueThenFalse() {
    let translations = common::in_memory_translations();
    let post = Post::new(1);
    let store = post.translation(&translations);
    store.create_translation("title", "Original created title", Some("en")).unwrap();

    assert!(store.clear("title", Some("en")).unwrap());
    assert_eq!(store.get("title", Some("en")).unwrap(), None);
    assert!(!store.clear("title", Some("en")).unwrap());
    assert_eq!(store.get("title", Some("en")).unwrap(), None);
}

/// getAll() returns all locales or the requested subset
#[test]
fn test_getAll_shouldSelectByLocales() {
    let translations = common::in_memory_translations();
    let post = Post::new(1);
    let store = post.translation(&translations);
    store
        .set(
            "title",
            [("en", "Post Title"), ("ar", "اول عنوان المنشور"), ("my", "Terjemahan Tajuk")],
            None,
        )
        .unwrap();

    let only_en = store.get_all("title", &["en"]).unwrap();
    assert_eq!(only_en, HashMap::from([("en".to_string(), "Post Title".to_string())]));

    assert_eq!(store.get_all("title", &[]).unwrap().len(), 3);

    let two = store.get_all("title", &["ar", "en"]).unwrap();
    assert_eq!(two.len(), 2);
    assert!(two.contains_key("ar"));
    assert!(two.contains_key("en"));
}

/// getAll() drops missing locales and collapses duplicates
#[test]
fn test_getAll_withMissingAndDuplicateLocales_shouldReturnExisting() {
    let translations = common::in_memory_translations();
    let post = Post::new(1);
    let store = post.translation(&translations);
    store.set("title", [("en", "Post Title")], None).unwrap();

    let values = store.get_all("title", &["en", "fr", "en"]).unwrap();

    assert_eq!(values.len(), 1);
    assert_eq!(values["en"], "Post Title");
    assert!(store.get_all("body", &[]).unwrap().is_empty());
}

/// clearAll() with locales deletes only those, and returns the count
#[test]
fn test_clearAll_shouldDeleteSelectedLocalesAndCount() {
    let translations = common::in_memory_translations();
    let post = Post::new(1);
    let store = post.translation(&translations);
    store
        .set(
            "title",
            [("en", "Post Title"), ("ar", "اول عنوان المنشور"), ("my", "Terjemahan Tajuk")],
            None,
        )
        .unwrap();

    assert_eq!(store.clear_all("title", &["ar"]).unwrap(), 1);
    assert_eq!(store.get_all("title", &[]).unwrap().len(), 2);
    assert_eq!(store.get_all("title", &["en"]).unwrap()["en"], "Post Title");

    assert_eq!(store.clear_all("title", &[]).unwrap(), 2);
    assert!(store.get_all("title", &[]).unwrap().is_empty());
    assert_eq!(store.clear_all("title", &[]).unwrap(), 0);
}

/// clearAll() only touches the given field
#[test]
fn test_clearAll_shouldLeaveOtherFields() {
    let translations = common::in_memory_translations();
    let post = Post::new(1);
    let store = post.translation(&translations);
    store.set("title", [("en", "T"), ("my", "TT")], None).unwrap();
    store.set("body", "B", Some("en")).unwrap();

    assert_eq!(store.clear_all("title", &["en", "my"]).unwrap(), 2);
    assert_eq!(store.get("body", Some("en")).unwrap().as_deref(), Some("B"));
}

/// An unbound store refuses every operation
#[test]
fn test_unboundStore_shouldFailWithNotBound() {
    let translations = common::in_memory_translations();
    let store = translations.store();

    assert!(matches!(store.lookup("title", None), Err(StoreError::NotBound)));
    assert!(matches!(
        store.create_translation("title", "x", None),
        Err(StoreError::NotBound)
    ));
    assert!(matches!(
        store.update_translation("title", "x", None),
        Err(StoreError::NotBound)
    ));
    assert!(matches!(store.clear("title", None), Err(StoreError::NotBound)));
    assert!(matches!(store.purge(), Err(StoreError::NotBound)));
}

/// Binding an unbound store makes it usable
#[test]
fn test_bind_shouldScopeStoreToOwner() {
    let translations = common::in_memory_translations();
    let post = Post::new(5);

    let store = translations.store().bind(&post).unwrap();
    store.set("title", "Hello", None).unwrap();

    let owner = store.owner().unwrap();
    assert_eq!(owner.type_name, "Post");
    assert_eq!(owner.id, 5);
    assert_eq!(
        post.translation(&translations).get("title", None).unwrap().as_deref(),
        Some("Hello")
    );
}
