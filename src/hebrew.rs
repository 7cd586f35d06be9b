//! Hebrew text normalization.
//!
//! Vocalization (nikud) and cantillation (teamim) are combining marks; the
//! index and the sample generator both need letter-level views of marked
//! text.

/// Nikud marks: U+05B0..=U+05BC plus shin/sin dots and qamats qatan.
pub fn is_vocalization_mark(ch: char) -> bool {
    matches!(ch, '\u{05B0}'..='\u{05BC}' | '\u{05C1}' | '\u{05C2}' | '\u{05C7}')
}

/// Teamim plus meteg and related punctum marks.
pub fn is_cantillation_mark(ch: char) -> bool {
    matches!(
        ch,
        '\u{0591}'..='\u{05AF}' | '\u{05BD}' | '\u{05BF}' | '\u{05C0}' | '\u{05C4}'
    )
}

pub fn remove_vocalization(text: &str) -> String {
    text.chars().filter(|ch| !is_vocalization_mark(*ch)).collect()
}

pub fn remove_cantillation(text: &str) -> String {
    text.chars().filter(|ch| !is_cantillation_mark(*ch)).collect()
}

pub fn remove_marks(text: &str) -> String {
    remove_vocalization(&remove_cantillation(text))
}

/// Keep only the Hebrew letter range and hyphens/maqaf, dropping marks and
/// any other punctuation inside a word.
pub fn letters_only(word: &str) -> String {
    word.chars()
        .filter(|ch| matches!(ch, '\u{05D0}'..='\u{05EA}' | '-' | '\u{05BE}'))
        .collect()
}

pub fn single_spaced(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}
