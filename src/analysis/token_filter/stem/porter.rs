//! Porter stemming algorithm implementation.
//!
//! The classic five-step Porter algorithm:
//! 1. Plurals and -ed/-ing suffixes, then terminal y → i
//! 2. Double suffixes such as -ational → -ate, -ization → -ize
//! 3. -icate → -ic, -ative → "", -ness → "" and friends
//! 4. Remove -al, -ance, -ence, -ment and similar when the stem is long enough
//! 5. Remove a final -e and reduce -ll to -l
//!
//! The stemmer works on ASCII only. Words containing other characters are
//! returned unchanged.
//!
//! # Examples
//!
//! ```
//! use folio::analysis::token_filter::stem::Stemmer;
//! use folio::analysis::token_filter::stem::porter::PorterStemmer;
//!
//! let stemmer = PorterStemmer::new();
//!
//! assert_eq!(stemmer.stem("running"), "run");
//! assert_eq!(stemmer.stem("flies"), "fli");
//! assert_eq!(stemmer.stem("relational"), "relat");
//! ```

use crate::analysis::token_filter::stem::Stemmer;

/// Porter stemming algorithm implementation.
#[derive(Debug, Clone, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new Porter stemmer.
    pub fn new() -> Self {
        PorterStemmer
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        if word.len() <= 2 || !word.is_ascii() {
            return word.to_string();
        }

        let mut buffer = StemBuffer::new(word.to_ascii_lowercase().into_bytes());
        buffer.step1ab();
        if buffer.b.len() > 1 {
            buffer.step1c();
            buffer.step2();
            buffer.step3();
            buffer.step4();
            buffer.step5();
        }

        // Only ASCII bytes ever enter or leave the buffer.
        String::from_utf8(buffer.b).unwrap_or_else(|_| word.to_string())
    }

    fn name(&self) -> &'static str {
        "porter"
    }
}

/// Working state for one word.
///
/// `b` holds the word being rewritten; `end` is the length of the stem left
/// by the last successful [`StemBuffer::ends`] call.
struct StemBuffer {
    b: Vec<u8>,
    end: usize,
}

impl StemBuffer {
    fn new(b: Vec<u8>) -> Self {
        let end = b.len();
        StemBuffer { b, end }
    }

    /// True when `b[i]` is a consonant. `y` is a consonant at the start of
    /// the word or after a vowel.
    fn cons(&self, i: usize) -> bool {
        match self.b[i] {
            b'a' | b'e' | b'i' | b'o' | b'u' => false,
            b'y' => i == 0 || !self.cons(i - 1),
            _ => true,
        }
    }

    /// Number of vowel-consonant sequences in the stem `b[..end]`.
    fn measure(&self) -> usize {
        let mut n = 0;
        let mut i = 0;

        while i < self.end && self.cons(i) {
            i += 1;
        }
        loop {
            while i < self.end && !self.cons(i) {
                i += 1;
            }
            if i >= self.end {
                return n;
            }
            n += 1;
            while i < self.end && self.cons(i) {
                i += 1;
            }
            if i >= self.end {
                return n;
            }
        }
    }

    fn vowel_in_stem(&self) -> bool {
        (0..self.end).any(|i| !self.cons(i))
    }

    fn double_consonant(&self, i: usize) -> bool {
        i >= 1 && self.b[i] == self.b[i - 1] && self.cons(i)
    }

    /// Consonant-vowel-consonant ending at `i`, where the last consonant is
    /// not w, x or y.
    fn cvc(&self, i: usize) -> bool {
        if i < 2 || !self.cons(i) || self.cons(i - 1) || !self.cons(i - 2) {
            return false;
        }
        !matches!(self.b[i], b'w' | b'x' | b'y')
    }

    fn last(&self) -> usize {
        self.b.len() - 1
    }

    fn penultimate(&self) -> Option<u8> {
        self.b.len().checked_sub(2).map(|i| self.b[i])
    }

    fn ends(&mut self, suffix: &str) -> bool {
        let suffix = suffix.as_bytes();
        if !self.b.ends_with(suffix) {
            return false;
        }
        self.end = self.b.len() - suffix.len();
        true
    }

    fn set_to(&mut self, replacement: &str) {
        self.b.truncate(self.end);
        self.b.extend_from_slice(replacement.as_bytes());
    }

    fn replace_if_measured(&mut self, replacement: &str) {
        if self.measure() > 0 {
            self.set_to(replacement);
        }
    }

    /// Apply the first matching rule; later rules are skipped even when the
    /// matched rule's measure condition fails.
    fn apply_rules(&mut self, rules: &[(&str, &str)]) {
        for (suffix, replacement) in rules {
            if self.ends(suffix) {
                self.replace_if_measured(replacement);
                return;
            }
        }
    }

    fn truncate_by(&mut self, n: usize) {
        let len = self.b.len() - n;
        self.b.truncate(len);
    }

    /// caresses → caress, ponies → poni, agreed → agree, hopping → hop.
    fn step1ab(&mut self) {
        if self.b[self.last()] == b's' {
            if self.ends("sses") {
                self.truncate_by(2);
            } else if self.ends("ies") {
                self.set_to("i");
            } else if self.penultimate() != Some(b's') {
                self.truncate_by(1);
            }
        }

        if self.ends("eed") {
            if self.measure() > 0 {
                self.truncate_by(1);
            }
        } else if (self.ends("ed") || self.ends("ing")) && self.vowel_in_stem() {
            self.b.truncate(self.end);
            self.end = self.b.len();

            if self.ends("at") {
                self.set_to("ate");
            } else if self.ends("bl") {
                self.set_to("ble");
            } else if self.ends("iz") {
                self.set_to("ize");
            } else if self.double_consonant(self.last()) {
                if !matches!(self.b[self.last()], b'l' | b's' | b'z') {
                    self.truncate_by(1);
                }
            } else if self.measure() == 1 && self.cvc(self.last()) {
                self.set_to("e");
            }
        }
    }

    /// happy → happi, when the stem has a vowel.
    fn step1c(&mut self) {
        if self.ends("y") && self.vowel_in_stem() {
            let last = self.last();
            self.b[last] = b'i';
        }
    }

    fn step2(&mut self) {
        let rules: &[(&str, &str)] = match self.penultimate() {
            Some(b'a') => &[("ational", "ate"), ("tional", "tion")],
            Some(b'c') => &[("enci", "ence"), ("anci", "ance")],
            Some(b'e') => &[("izer", "ize")],
            Some(b'l') => &[
                ("bli", "ble"),
                ("alli", "al"),
                ("entli", "ent"),
                ("eli", "e"),
                ("ousli", "ous"),
            ],
            Some(b'o') => &[("ization", "ize"), ("ation", "ate"), ("ator", "ate")],
            Some(b's') => &[
                ("alism", "al"),
                ("iveness", "ive"),
                ("fulness", "ful"),
                ("ousness", "ous"),
            ],
            Some(b't') => &[("aliti", "al"), ("iviti", "ive"), ("biliti", "ble")],
            Some(b'g') => &[("logi", "log")],
            _ => return,
        };
        self.apply_rules(rules);
    }

    fn step3(&mut self) {
        let rules: &[(&str, &str)] = match self.b[self.last()] {
            b'e' => &[("icate", "ic"), ("ative", ""), ("alize", "al")],
            b'i' => &[("iciti", "ic")],
            b'l' => &[("ical", "ic"), ("ful", "")],
            b's' => &[("ness", "")],
            _ => return,
        };
        self.apply_rules(rules);
    }

    /// Drop -ant, -ence etc. from stems with measure above one.
    fn step4(&mut self) {
        let suffixes: &[&str] = match self.penultimate() {
            Some(b'a') => &["al"],
            Some(b'c') => &["ance", "ence"],
            Some(b'e') => &["er"],
            Some(b'i') => &["ic"],
            Some(b'l') => &["able", "ible"],
            Some(b'n') => &["ant", "ement", "ment", "ent"],
            Some(b'o') => {
                let ion = self.ends("ion")
                    && self.end >= 1
                    && matches!(self.b[self.end - 1], b's' | b't');
                if !ion && !self.ends("ou") {
                    return;
                }
                &[]
            }
            Some(b's') => &["ism"],
            Some(b't') => &["ate", "iti"],
            Some(b'u') => &["ous"],
            Some(b'v') => &["ive"],
            Some(b'z') => &["ize"],
            _ => return,
        };

        if !suffixes.is_empty() && !suffixes.iter().any(|suffix| self.ends(suffix)) {
            return;
        }
        if self.measure() > 1 {
            self.b.truncate(self.end);
        }
    }

    /// Remove a final -e and change -ll to -l on long stems.
    fn step5(&mut self) {
        self.end = self.b.len();
        if self.b[self.last()] == b'e' {
            let m = self.measure();
            if m > 1 || (m == 1 && !self.cvc(self.last().saturating_sub(1))) {
                self.truncate_by(1);
                self.end = self.b.len();
            }
        }
        let last = self.last();
        if self.b[last] == b'l' && self.double_consonant(last) && self.measure() > 1 {
            self.truncate_by(1);
        }
    }
}
