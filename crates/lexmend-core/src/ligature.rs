//! Typographic ligatures that PDF extractors emit, drop, or mangle.

/// Ligature glyphs and the letters they stand for.
pub const LIGATURES: [(char, &str); 8] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{0132}', "IJ"),
    ('\u{0133}', "ij"),
    ('\u{FB06}', "st"),
];

/// Letters encoded by a single ligature glyph, if `c` is one.
pub fn expansion_of(c: char) -> Option<&'static str> {
    LIGATURES
        .iter()
        .find(|(glyph, _)| *glyph == c)
        .map(|(_, expansion)| *expansion)
}

/// Expand every ligature glyph in `text`.
///
/// - `"ﬁnding ﬂow"` → `"finding flow"`
/// - `"Ĳssel"` → `"IJssel"`
pub fn normalize_ligatures(text: &str) -> String {
    if !text.chars().any(|c| expansion_of(c).is_some()) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match expansion_of(c) {
            Some(expansion) => out.push_str(expansion),
            None => out.push(c),
        }
    }
    out
}

/// Distinct lowercase expansions, longest first.
///
/// Ties keep table order, so `ffi` is tried before `ffl` and `ff` before `fi`.
pub fn repair_strings() -> Vec<String> {
    let mut strings: Vec<String> = Vec::new();
    for (_, expansion) in LIGATURES.iter() {
        let lower = expansion.to_lowercase();
        if !strings.contains(&lower) {
            strings.push(lower);
        }
    }
    // sort_by_key is stable
    strings.sort_by_key(|s| std::cmp::Reverse(s.chars().count()));
    strings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_ligatures() {
        assert_eq!(normalize_ligatures("ﬁnding ﬂow"), "finding flow");
        assert_eq!(normalize_ligatures("eﬃcient oﬄine"), "efficient offline");
        assert_eq!(normalize_ligatures("Ĳssel ĳs"), "IJssel ijs");
        assert_eq!(normalize_ligatures("no ligatures here"), "no ligatures here");
    }

    #[test]
    fn test_expansion_of() {
        assert_eq!(expansion_of('\u{FB03}'), Some("ffi"));
        assert_eq!(expansion_of('f'), None);
    }

    #[test]
    fn test_repair_strings_order() {
        let strings = repair_strings();
        assert_eq!(strings, vec!["ffi", "ffl", "ff", "fi", "fl", "ij", "st"]);
    }
}
