//! Importer-address heuristics.
//!
//! Importer addresses are free text. Three pattern rules are applied, each a
//! fixed behavior of the document format rather than a general address
//! parser:
//!
//! - the state name is the second-to-last comma-separated segment;
//! - the PIN code is the last 6-digit token anywhere in the address, and the
//!   text before its first occurrence is the "clean" address;
//! - the clean address splits at the word midpoint into a ship-to address and
//!   a ship-to place.
//!
//! The midpoint split is a known naive heuristic; it is kept as-is because
//! generated waybills are expected to match the established output.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PIN_CODE: Regex = Regex::new(r"\b\d{6}\b").expect("PIN code pattern");
}

/// Second-to-last comma-separated segment, trimmed. Addresses with fewer
/// than two segments have no state segment.
pub fn state_segment(address: &str) -> Option<&str> {
    let segments: Vec<&str> = address.trim().split(',').collect();
    if segments.len() < 2 {
        return None;
    }
    Some(segments[segments.len() - 2].trim())
}

/// Extract the PIN code and the address text used for ship-to derivation.
///
/// The PIN code is the last 6-digit token in the raw address. When one is
/// found, the clean address is everything before that token's first
/// occurrence, trimmed; otherwise the full address is used unmodified and
/// the PIN code is empty.
pub fn extract_pin_code(address: &str) -> (String, String) {
    let last_match = match PIN_CODE.find_iter(address).last() {
        Some(m) => m.as_str().to_string(),
        None => return (String::new(), address.to_string()),
    };

    let clean = match address.find(&last_match) {
        Some(idx) => address[..idx].trim().to_string(),
        None => address.trim().to_string(),
    };

    (last_match, clean)
}

/// Split the clean address at the word midpoint: the first `len / 2` words
/// become the ship-to address, the remainder the ship-to place.
pub fn midpoint_split(clean_address: &str) -> (String, String) {
    let words: Vec<&str> = clean_address.split_whitespace().collect();
    let mid = words.len() / 2;
    (words[..mid].join(" "), words[mid..].join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_second_to_last_segment() {
        assert_eq!(
            state_segment("Acme, 12 Road, Ahmedabad, Gujarat, 380001"),
            Some("Gujarat")
        );
        assert_eq!(state_segment("City, State"), Some("City"));
        assert_eq!(state_segment("no commas here"), None);
    }

    #[test]
    fn test_pin_code_is_last_six_digit_token() {
        let (pin, clean) = extract_pin_code("123 Street, City, State, 400099");
        assert_eq!(pin, "400099");
        assert_eq!(clean, "123 Street, City, State,");
    }

    #[test]
    fn test_pin_code_ignores_shorter_and_longer_runs() {
        let (pin, clean) = extract_pin_code("Plot 12345, Zone 1234567, Pune 411001");
        assert_eq!(pin, "411001");
        assert_eq!(clean, "Plot 12345, Zone 1234567, Pune");
    }

    #[test]
    fn test_no_pin_code_keeps_address_unmodified() {
        let (pin, clean) = extract_pin_code("Somewhere, State");
        assert_eq!(pin, "");
        assert_eq!(clean, "Somewhere, State");
    }

    #[test]
    fn test_midpoint_split_floor_division() {
        let (addr, place) = midpoint_split("one two three four five");
        assert_eq!(addr, "one two");
        assert_eq!(place, "three four five");
    }

    #[test]
    fn test_midpoint_split_empty_address() {
        let (addr, place) = midpoint_split("");
        assert_eq!(addr, "");
        assert_eq!(place, "");
    }
}
