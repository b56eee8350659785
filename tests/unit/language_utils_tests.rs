/*!
 * Tests for language code utilities
 */

use dualsub::language_utils::{
    display_name, is_language_code, language_codes_match, normalize_code,
};

/// Test validation of two- and three-letter codes
#[test]
fn test_is_language_code_withValidCodes_shouldAccept() {
    assert!(is_language_code("en"));
    assert!(is_language_code("eng"));
    assert!(is_language_code("DE"));
    assert!(is_language_code("ger"));
}

/// Test rejection of non-codes
#[test]
fn test_is_language_code_withInvalidCodes_shouldReject() {
    assert!(!is_language_code("zz"));
    assert!(!is_language_code("forced"));
    assert!(!is_language_code(""));
    assert!(!is_language_code("english"));
}

/// Test normalization prefers the two-letter form
#[test]
fn test_normalize_code_withThreeLetterCode_shouldPreferTwoLetter() {
    assert_eq!(normalize_code("eng").as_deref(), Some("en"));
    assert_eq!(normalize_code("deu").as_deref(), Some("de"));
    assert_eq!(normalize_code("fre").as_deref(), Some("fr"));
}

/// Test code matching across lengths and casing
#[test]
fn test_language_codes_match_withMixedForms_shouldMatch() {
    assert!(language_codes_match("en", "ENG"));
    assert!(language_codes_match("ger", "deu"));
    assert!(!language_codes_match("en", "fr"));
}

/// Test display names
#[test]
fn test_display_name_withValidCode_shouldReturnEnglishName() {
    assert_eq!(display_name("fr").as_deref(), Some("French"));
    assert_eq!(display_name("jpn").as_deref(), Some("Japanese"));
    assert!(display_name("not-a-code").is_none());
}
