//! Slug derivation for companies.
//!
//! A company slug is derived deterministically from its display name:
//! transliterate to ASCII, lowercase, collapse runs of non-alphanumerics
//! into single hyphens, trim hyphens. Renaming a company regenerates the
//! slug with the same function, so equal names always map to equal slugs.

/// Transliterate one character to its ASCII approximation.
///
/// Covers the Cyrillic range that actually occurs in the CRM's company
/// names; ASCII passes through and anything else is dropped by the
/// slugify step (it becomes a separator).
fn transliterate(c: char) -> &'static str {
    match c {
        'а' | 'А' => "a",
        'б' | 'Б' => "b",
        'в' | 'В' => "v",
        'г' | 'Г' => "g",
        'д' | 'Д' => "d",
        'е' | 'Е' | 'э' | 'Э' => "e",
        'ё' | 'Ё' => "e",
        'ж' | 'Ж' => "zh",
        'з' | 'З' => "z",
        'и' | 'И' => "i",
        'й' | 'Й' => "i",
        'к' | 'К' => "k",
        'л' | 'Л' => "l",
        'м' | 'М' => "m",
        'н' | 'Н' => "n",
        'о' | 'О' => "o",
        'п' | 'П' => "p",
        'р' | 'Р' => "r",
        'с' | 'С' => "s",
        'т' | 'Т' => "t",
        'у' | 'У' => "u",
        'ф' | 'Ф' => "f",
        'х' | 'Х' => "kh",
        'ц' | 'Ц' => "ts",
        'ч' | 'Ч' => "ch",
        'ш' | 'Ш' => "sh",
        'щ' | 'Щ' => "shch",
        'ъ' | 'Ъ' | 'ь' | 'Ь' => "",
        'ы' | 'Ы' => "y",
        'ю' | 'Ю' => "yu",
        'я' | 'Я' => "ya",
        _ => "",
    }
}

/// Generate a URL-safe slug from a human-readable name.
pub fn generate_slug(name: &str) -> String {
    let ascii: String = name
        .chars()
        .flat_map(|c| {
            if c.is_ascii() {
                vec![c]
            } else {
                transliterate(c).chars().collect()
            }
        })
        .collect();

    let lowered: String = ascii
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();

    // Collapse consecutive hyphens.
    let mut result = String::with_capacity(lowered.len());
    let mut prev_hyphen = false;
    for c in lowered.chars() {
        if c == '-' {
            if !prev_hyphen {
                result.push('-');
            }
            prev_hyphen = true;
        } else {
            result.push(c);
            prev_hyphen = false;
        }
    }

    // Trim leading/trailing hyphens.
    result.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_name_is_lowercased_and_hyphenated() {
        assert_eq!(generate_slug("Acme Industrial Ltd."), "acme-industrial-ltd");
    }

    #[test]
    fn punctuation_runs_collapse_to_one_hyphen() {
        assert_eq!(generate_slug("A -- B!!  C"), "a-b-c");
    }

    #[test]
    fn cyrillic_names_transliterate() {
        assert_eq!(generate_slug("Рога и Копыта"), "roga-i-kopyta");
        assert_eq!(generate_slug("Шишкин Лес"), "shishkin-les");
    }

    #[test]
    fn deterministic_for_equal_input() {
        assert_eq!(generate_slug("Same Name"), generate_slug("Same Name"));
    }

    #[test]
    fn leading_and_trailing_separators_trimmed() {
        assert_eq!(generate_slug("  --Edge-- "), "edge");
    }
}
