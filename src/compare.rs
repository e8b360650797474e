//! Ordering used by click-to-sort.
//!
//! Two numbers compare numerically, with `NaN` after every other number.
//! Anything else is turned into its display string and compared with a
//! locale-style collation, so a column that mixes numbers and text falls back
//! to string order for the mixed pairs.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::FieldValue;

/// Compare two field values the way the sort handles do.
pub fn compare_values(a: FieldValue<'_>, b: FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => compare_numbers(x, y),
        (a, b) => locale_compare(&a.to_string(), &b.to_string()),
    }
}

/// Total order over numbers: `NaN` equals `NaN` and sorts after everything
/// else, `-0` equals `0`.
fn compare_numbers(x: f64, y: f64) -> Ordering {
    match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
    }
}

/// Three-level collation over the canonical decomposition of each string:
/// base letters ignoring case and accents, then accents ("resume" before
/// "résumé"), then case with lowercase first ("lion" before "Lion").
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded(a).cmp(folded(b)))
        .then_with(|| cased(a).cmp(cased(b)))
}

fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
}

fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

fn cased(s: &str) -> impl Iterator<Item = (bool, char)> + '_ {
    s.nfd().map(|ch| (!ch.is_lowercase(), ch))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(
            compare_values(FieldValue::Number(8.0), FieldValue::Number(10.0)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(FieldValue::Number(2.3), FieldValue::Number(2.0)),
            Ordering::Greater
        );
    }

    #[test]
    fn nan_sorts_after_every_number() {
        let nan = FieldValue::Number(f64::NAN);
        assert_eq!(compare_values(nan, FieldValue::Number(1.0)), Ordering::Greater);
        assert_eq!(compare_values(FieldValue::Number(1e300), nan), Ordering::Less);
        assert_eq!(compare_values(nan, nan), Ordering::Equal);
        assert_eq!(
            compare_values(FieldValue::Number(-0.0), FieldValue::Number(0.0)),
            Ordering::Equal
        );
    }

    #[test]
    fn mixed_pairs_fall_back_to_strings() {
        // "10" sorts before "9" once both are strings
        assert_eq!(
            compare_values(FieldValue::Number(10.0), FieldValue::Text("9")),
            Ordering::Less
        );
        assert_eq!(
            compare_values(FieldValue::Text("9"), FieldValue::Number(10.0)),
            Ordering::Greater
        );
    }

    #[test]
    fn collation_ignores_case_first() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("Zebra", "aardvark"), Ordering::Greater);
        assert_eq!(locale_compare("lion", "Lion"), Ordering::Less);
        assert_eq!(locale_compare("Lion", "Lion"), Ordering::Equal);
        assert_eq!(locale_compare("Tiger", "Tiger Shark"), Ordering::Less);
    }

    #[test]
    fn accented_letters_sort_with_their_base_letter() {
        assert_eq!(locale_compare("Éland", "Fox"), Ordering::Less);
        assert_eq!(locale_compare("éclair", "zebra"), Ordering::Less);
        assert_eq!(locale_compare("Ocelot", "Öland"), Ordering::Less);
        assert_eq!(locale_compare("resume", "résumé"), Ordering::Less);
        assert_eq!(locale_compare("résumé", "Resume"), Ordering::Greater);
        assert_eq!(locale_compare("élan", "Élan"), Ordering::Less);
    }

    #[test]
    fn composed_and_decomposed_forms_are_equal() {
        assert_eq!(locale_compare("Jagu\u{e4}r", "Jagua\u{308}r"), Ordering::Equal);
    }
}
