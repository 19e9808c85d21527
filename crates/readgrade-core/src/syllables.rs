//! Syllable counting for the Flesch Reading Ease formula.
//!
//! Each vowel counts as one syllable, subject to:
//!
//! - words of three letters or fewer count as one syllable;
//! - consecutive vowels count once;
//! - a final `-es` or `-ed`, and a final `-e` (but not `-le`), are silent.
//!
//! Only ASCII letters are considered. Any word with letters counts at least 1.

const fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u')
}

/// Count syllables in a single word.
pub fn count_syllables(word: &str) -> usize {
    let letters: Vec<u8> = word
        .bytes()
        .filter(u8::is_ascii_alphabetic)
        .map(|b| b.to_ascii_lowercase())
        .collect();

    match letters.len() {
        0 => 0,
        1..=3 => 1,
        _ => {
            let count = letters
                .iter()
                .enumerate()
                .filter(|&(i, &b)| {
                    is_vowel(b) && (i == 0 || !is_vowel(letters[i - 1])) && !is_silent(&letters, i)
                })
                .count();
            count.max(1)
        }
    }
}

/// Whether the vowel at `i` belongs to a silent ending.
fn is_silent(letters: &[u8], i: usize) -> bool {
    let n = letters.len();
    if i + 2 == n {
        return matches!(&letters[i..], b"ed" | b"es");
    }
    i + 1 == n && letters[i] == b'e' && letters[i - 1] != b'l'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_words_are_one_syllable() {
        assert_eq!(count_syllables("a"), 1);
        assert_eq!(count_syllables("the"), 1);
        assert_eq!(count_syllables("ate"), 1);
    }

    #[test]
    fn vowel_groups() {
        assert_eq!(count_syllables("girl"), 1);
        assert_eq!(count_syllables("reading"), 2);
        assert_eq!(count_syllables("beautiful"), 3);
        assert_eq!(count_syllables("queue"), 1);
    }

    #[test]
    fn silent_endings() {
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("jumped"), 1);
        assert_eq!(count_syllables("boxes"), 1);
        assert_eq!(count_syllables("apple"), 2);
        assert_eq!(count_syllables("table"), 2);
    }

    #[test]
    fn case_and_punctuation_are_ignored() {
        assert_eq!(count_syllables("Apple,"), 2);
        assert_eq!(count_syllables("READING"), 2);
    }

    #[test]
    fn edge_cases() {
        assert_eq!(count_syllables(""), 0);
        assert_eq!(count_syllables("--"), 0);
        assert_eq!(count_syllables("rhythm"), 1);
    }
}
