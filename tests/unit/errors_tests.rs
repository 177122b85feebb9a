/*!
 * Tests for error types and conversions
 */

use translatable::StoreError;

#[test]
fn test_storeError_notBound_shouldDisplayCorrectly() {
    let display = format!("{}", StoreError::NotBound);
    assert!(display.contains("not bound"));
}

#[test]
fn test_storeError_notFound_shouldDisplayFieldAndLocale() {
    let error = StoreError::NotFound {
        field: "title".to_string(),
        locale: "fr".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("title"));
    assert!(display.contains("fr"));
    assert!(error.is_not_found());
}

#[test]
fn test_storeError_alreadyBound_shouldDisplayOwner() {
    let error = StoreError::AlreadyBound {
        owner_type: "Post".to_string(),
        owner_id: 1,
    };
    assert!(format!("{}", error).contains("Post#1"));
    assert!(!error.is_not_found());
}

#[test]
fn test_storeError_fromAnyhow_shouldWrapAsConnection() {
    let error: StoreError = anyhow::anyhow!("lock poisoned").into();
    assert!(matches!(error, StoreError::Connection(_)));
    assert!(format!("{}", error).contains("lock poisoned"));
}
