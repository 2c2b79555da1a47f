// src/grading/normalize.rs

use regex::Regex;
use std::sync::LazyLock;

/// Characters deleted before essay answers are compared. Includes the
/// Arabic question mark (U+061F) and Arabic comma (U+060C); course content
/// is authored in Arabic as well as English.
static STRIP_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[ .,;:!؟،"'\-_/\\()\[\]{}]+"#).expect("valid strip class"));

/// Canonicalizes free text for essay-answer matching: lower-case, delete
/// every strip-class character (runs collapse to nothing), trim whatever
/// whitespace remains at the edges. Idempotent.
///
/// Used only by essay grading; mcq comparison stays exact and unnormalized.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    STRIP_CLASS.replace_all(&lowered, "").trim().to_string()
}
