use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical display form of a scraped player name.
///
/// Normalization steps:
/// - NFD-decompose and drop combining marks ("Luis Díaz" -> "Luis Diaz")
/// - collapse runs of whitespace
/// - drop a trailing "Initial. Suffix" abbreviation that repeats the full name
///   ("Ryan Burr R. Burr" -> "Ryan Burr"), repeated until nothing changes
///
/// Total and idempotent.
pub fn normalize_player_name(raw: &str) -> String {
    let mut name = collapse_whitespace(&strip_diacritics(raw));
    while let Some(shorter) = collapse_abbreviation_once(&name) {
        name = shorter;
    }
    name
}

/// Drop combining diacritical marks after canonical decomposition.
pub fn strip_diacritics(input: &str) -> String {
    input.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

/// Lowercase accent-free key for case-insensitive comparisons.
pub fn match_key(name: &str) -> String {
    collapse_whitespace(&strip_diacritics(name)).to_lowercase()
}

/// ASCII upper-case rendering for broadcast character generators.
/// Keeps letters, digits, spaces, hyphens, apostrophes and periods.
pub fn hardware_safe_fallback(name: &str) -> String {
    let folded: String = strip_diacritics(name)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '\'' | '.'))
        .collect();
    collapse_whitespace(&folded).to_ascii_uppercase()
}

/// Phonetic form used when the model gave none: the name as written, accents dropped.
/// Never empty for a non-empty name, so a stored answer always clears `phonetic_name IS NULL`.
pub fn phonetic_fallback(name: &str) -> String {
    let plain = collapse_whitespace(&strip_diacritics(name));
    if plain.is_empty() {
        name.trim().to_string()
    } else {
        plain
    }
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One collapse step. Looks for the leftmost `<Initial>. <Suffix>` tail whose leading text starts with
/// that initial and ends with the same suffix tokens. Handles the glued form "Ryan BurrR. Burr" too.
fn collapse_abbreviation_once(name: &str) -> Option<String> {
    let chars: Vec<(usize, char)> = name.char_indices().collect();
    for i in 1..chars.len() {
        let (pos, initial) = chars[i];
        if !initial.is_ascii_uppercase() {
            continue;
        }
        // must be "X. " followed by at least one more char
        let dot = chars.get(i + 1).map(|(_, c)| *c);
        let space = chars.get(i + 2).map(|(_, c)| *c);
        if dot != Some('.') || space != Some(' ') || chars.get(i + 3).is_none() {
            continue;
        }
        // preceded by a space (separate token) or a lowercase letter (glued onto the last name)
        let prev = chars[i - 1].1;
        if !(prev == ' ' || prev.is_lowercase()) {
            continue;
        }

        let full = name[..pos].trim_end();
        let suffix = name[chars[i + 3].0..].trim();
        if full.is_empty() || suffix.is_empty() {
            continue;
        }
        if !full.starts_with(initial) {
            continue;
        }
        let full_tokens: Vec<&str> = full.split(' ').collect();
        let suffix_tokens: Vec<&str> = suffix.split(' ').collect();
        // the full name must keep at least one token of its own in front of the suffix
        if suffix_tokens.len() >= full_tokens.len() {
            continue;
        }
        if full_tokens.ends_with(&suffix_tokens) {
            return Some(full.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents() {
        assert_eq!(normalize_player_name("Luis Díaz"), "Luis Diaz");
        assert_eq!(normalize_player_name("Nikola Jokić"), "Nikola Jokic");
        assert_eq!(normalize_player_name("  José   Ramírez "), "Jose Ramirez");
    }

    #[test]
    fn collapses_abbreviation_artifacts() {
        assert_eq!(normalize_player_name("Ryan Burr R. Burr"), "Ryan Burr");
        assert_eq!(
            normalize_player_name("Dominick Barlow D. Barlow"),
            "Dominick Barlow"
        );
        assert_eq!(normalize_player_name("Ryan BurrR. Burr"), "Ryan Burr");
        assert_eq!(
            normalize_player_name("Amon-Ra St. Brown A. St. Brown"),
            "Amon-Ra St. Brown"
        );
    }

    #[test]
    fn leaves_regular_names_alone() {
        for name in [
            "LeBron James",
            "J.J. Watt",
            "A.J. Brown",
            "Marcus D. Smith",
            "D. Barlow",
            "CeeDee Lamb",
        ] {
            assert_eq!(normalize_player_name(name), name, "{name}");
        }
    }

    #[test]
    fn mismatched_initial_is_not_collapsed() {
        assert_eq!(
            normalize_player_name("Ryan Burr T. Burr"),
            "Ryan Burr T. Burr"
        );
    }

    #[test]
    fn idempotent_on_tricky_inputs() {
        for raw in [
            "Ryan Burr R. Burr R. Burr",
            "Luis Díaz L. Díaz",
            "Ryan BurrR. Burr",
            "",
            "   ",
            "Ó",
            "X. Y",
        ] {
            let once = normalize_player_name(raw);
            assert_eq!(normalize_player_name(&once), once, "{raw:?}");
        }
    }

    #[test]
    fn hardware_safe_is_ascii_upper() {
        assert_eq!(hardware_safe_fallback("Luka Dončić"), "LUKA DONCIC");
        assert_eq!(hardware_safe_fallback("De'Aaron Fox"), "DE'AARON FOX");
        assert_eq!(hardware_safe_fallback("勒布朗"), "");
    }

    #[test]
    fn phonetic_fallback_is_the_plain_name() {
        assert_eq!(phonetic_fallback("Luka  Dončić"), "Luka Doncic");
        assert_eq!(phonetic_fallback("勒布朗"), "勒布朗");
    }

    #[test]
    fn match_key_ignores_case_and_accents() {
        assert_eq!(match_key("Luis DÍAZ"), match_key("luis diaz"));
    }
}
