//! Character-level Unicode helpers for Malayalam text.

/// Zero width joiner.
pub const ZWJ: char = '\u{200D}';
/// Zero width non-joiner.
pub const ZWNJ: char = '\u{200C}';
/// Malayalam sign virama (chandrakkala).
pub const VIRAMA: char = '\u{0D4D}';

pub fn is_joiner(c: char) -> bool {
    c == ZWJ || c == ZWNJ
}

/// Atomic chil codepoint (Unicode 5.1+) for a consonant that legacy
/// encodings write as consonant + virama + ZWJ.
pub fn atomic_chil(c: char) -> Option<char> {
    match c {
        '\u{0D23}' => Some('\u{0D7A}'), // ണ → ൺ
        '\u{0D28}' => Some('\u{0D7B}'), // ന → ൻ
        '\u{0D30}' => Some('\u{0D7C}'), // ര → ർ
        '\u{0D32}' => Some('\u{0D7D}'), // ല → ൽ
        '\u{0D33}' => Some('\u{0D7E}'), // ള → ൾ
        '\u{0D15}' => Some('\u{0D7F}'), // ക → ൿ
        _ => None,
    }
}

/// Normalize a word before it is stored or compared.
///
/// Legacy ZWJ chils collapse to their atomic codepoint and joiners left
/// dangling at the end of the word are dropped.
pub fn normalize(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    let mut out = String::with_capacity(word.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if let Some(chil) = atomic_chil(c) {
            if chars.get(i + 1) == Some(&VIRAMA) && chars.get(i + 2) == Some(&ZWJ) {
                out.push(chil);
                i += 3;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }
    while out.ends_with(is_joiner) {
        out.pop();
    }
    out
}
