//! Humanizer: rewrites LLM output into informal chat register.
//!
//! Rules run in table order and each one sees the output of the previous ones, so a
//! later pattern can match text produced by an earlier substitution (or miss text an
//! earlier rule already consumed, e.g. `para que` after `que` has become `q`).

use crate::language::Language;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

/// Replacement side of a rule.
#[derive(Debug, Clone, Copy)]
pub enum Replacement {
    Fixed(&'static str),
    /// 50/50 choice between two substitutes, decided once per rule application.
    Coin(&'static str, &'static str),
}

pub struct Rule {
    pattern: Regex,
    replacement: Replacement,
}

impl Rule {
    fn new(word: &str, replacement: Replacement) -> Self {
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", word))
            .unwrap_or_else(|e| panic!("invalid humanizer rule {:?}: {}", word, e));
        Self {
            pattern,
            replacement,
        }
    }

    fn apply<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> String {
        let with = match self.replacement {
            Replacement::Fixed(s) => s,
            Replacement::Coin(heads, tails) => {
                if rng.gen_bool(0.5) {
                    heads
                } else {
                    tails
                }
            }
        };
        self.pattern
            .replace_all(text, regex::NoExpand(with))
            .into_owned()
    }
}

use Replacement::{Coin, Fixed};

static SPANISH_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    [
        ("amor", Coin("mor", "bebé")),
        ("que", Fixed("q")),
        ("qué", Fixed("q")),
        ("porque", Fixed("xq")),
        ("por qué", Fixed("xq")),
        ("también", Fixed("tb")),
        ("para", Fixed("pa")),
        ("para que", Fixed("pa q")),
        ("por favor", Fixed("x favor")),
        ("gracias", Fixed("grax")),
        ("te quiero", Fixed("tq")),
        ("besos", Fixed("bss")),
        ("un beso", Fixed("1 bss")),
        ("de nada", Fixed("dn")),
        ("no sé", Fixed("ns")),
        ("qué tal", Fixed("q tal")),
        ("está bien", Fixed("ta bien")),
        ("estoy", Fixed("toy")),
        ("mucho", Fixed("muxo")),
        ("contigo", Fixed("cntigo")),
        ("adiós", Fixed("adio")),
    ]
    .into_iter()
    .map(|(w, r)| Rule::new(w, r))
    .collect()
});

static ENGLISH_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    [
        ("how are you", "how u doin"),
        ("love you", "luv u"),
        ("because", "cuz"),
        ("good night", "gnight babe"),
        ("i do not know", "idk"),
        ("i don't know", "idk"),
        ("you are", "u r"),
        ("you're", "u r"),
        ("your", "ur"),
        ("you", "u"),
        ("are", "r"),
        ("please", "pls"),
        ("thanks", "ty"),
        ("thank you", "ty"),
        ("be right back", "brb"),
        ("talk to you later", "ttyl"),
    ]
    .into_iter()
    .map(|(w, r)| Rule::new(w, Fixed(r)))
    .collect()
});

fn rules_for(language: Language) -> &'static [Rule] {
    match language {
        Language::Es => SPANISH_RULES.as_slice(),
        Language::En => ENGLISH_RULES.as_slice(),
        Language::Pt | Language::Fr | Language::Ar => &[],
    }
}

/// Humanizes with the thread-local RNG.
pub fn humanize(text: &str, language: Language) -> String {
    humanize_with(text, language, &mut rand::thread_rng())
}

/// Humanizes with an injected random source (deterministic under a fixed RNG).
pub fn humanize_with<R: Rng + ?Sized>(text: &str, language: Language, rng: &mut R) -> String {
    let original = text.trim();
    if original.is_empty() {
        return String::new();
    }
    let mut t = original.to_lowercase();
    for rule in rules_for(language) {
        t = rule.apply(&t, rng);
    }
    let t = t.trim();
    if t.is_empty() {
        original.to_string()
    } else {
        t.to_string()
    }
}
