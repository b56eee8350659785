use isolang::Language;

/// Language utilities for ISO language code handling.
///
/// Track descriptors carry whatever language tag the discovery collaborator
/// found (a file name infix, a container tag). These helpers validate and
/// normalize both ISO 639-1 (2-letter) and ISO 639-2 (3-letter) codes and
/// produce display names for track menus.

/// Map a legacy ISO 639-2/B code to its 639-2/T equivalent
fn bibliographic_to_terminological(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "per" => Some("fas"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "may" => Some("msa"),
        _ => None,
    }
}

/// Resolve a language code of either length to a `Language`
fn resolve(code: &str) -> Option<Language> {
    let normalized = code.trim().to_lowercase();

    match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized).or_else(|| {
            bibliographic_to_terminological(&normalized).and_then(Language::from_639_3)
        }),
        _ => None,
    }
}

/// Whether a tag is a valid ISO 639-1 or 639-2 language code
pub fn is_language_code(code: &str) -> bool {
    resolve(code).is_some()
}

/// Normalize a code to ISO 639-1 when one exists, else ISO 639-3
pub fn normalize_code(code: &str) -> Option<String> {
    let language = resolve(code)?;
    Some(
        language
            .to_639_1()
            .map(str::to_string)
            .unwrap_or_else(|| language.to_639_3().to_string()),
    )
}

/// Whether two codes of possibly different lengths name the same language
pub fn language_codes_match(a: &str, b: &str) -> bool {
    match (resolve(a), resolve(b)) {
        (Some(lang_a), Some(lang_b)) => lang_a == lang_b,
        _ => a.trim().eq_ignore_ascii_case(b.trim()),
    }
}

/// English display name for a language code, when the code is valid
pub fn display_name(code: &str) -> Option<String> {
    resolve(code).map(|lang| lang.to_name().to_string())
}
