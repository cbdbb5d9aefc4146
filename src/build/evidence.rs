//! Evidence deduplication
//!
//! Evidence sentences carry inline markup (entity highlighting). Two items
//! are the same evidence when their text content, with whitespace collapsed,
//! is identical.

use crate::graph::EvidenceItem;
use std::collections::HashSet;

/// Streaming markup stripper that keeps only text-node content
///
/// A `<` opens a tag only when followed by a letter, `/`, `!` or `?`;
/// otherwise it is literal text (`p < 0.05`). Numeric character references
/// and the common named ones are decoded.
#[derive(Debug, Default)]
pub struct MarkupStripper {
    text: String,
    in_tag: bool,
    entity: Option<String>,
}

impl MarkupStripper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of markup
    pub fn feed(&mut self, chunk: &str) {
        let mut chars = chunk.chars().peekable();
        while let Some(c) = chars.next() {
            if self.in_tag {
                if c == '>' {
                    self.in_tag = false;
                }
                continue;
            }
            if let Some(entity) = self.entity.as_mut() {
                if c == ';' {
                    let name = std::mem::take(entity);
                    self.entity = None;
                    match decode_entity(&name) {
                        Some(decoded) => self.text.push(decoded),
                        None => {
                            self.text.push('&');
                            self.text.push_str(&name);
                            self.text.push(';');
                        }
                    }
                    continue;
                }
                if c.is_ascii_alphanumeric() || c == '#' {
                    entity.push(c);
                    continue;
                }
                let name = std::mem::take(entity);
                self.entity = None;
                self.text.push('&');
                self.text.push_str(&name);
            }
            match c {
                '<' if chars
                    .peek()
                    .is_some_and(|n| n.is_ascii_alphabetic() || matches!(n, '/' | '!' | '?')) =>
                {
                    self.in_tag = true;
                }
                '&' => self.entity = Some(String::new()),
                _ => self.text.push(c),
            }
        }
    }

    /// Text accumulated so far
    pub fn finish(mut self) -> String {
        if let Some(name) = self.entity.take() {
            self.text.push('&');
            self.text.push_str(&name);
        }
        self.text
    }
}

/// Greek letter entity names in code point order, from U+03B1 (`alpha`)
/// and, capitalised, from U+0391 (`Alpha`)
const GREEK_LETTERS: [&str; 25] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "pi", "rho", "sigmaf", "sigma", "tau", "upsilon",
    "phi", "chi", "psi", "omega",
];

/// Decode a character reference body (the text between `&` and `;`)
///
/// Unknown names and invalid code points yield `None`; the caller keeps
/// the reference as literal text.
fn decode_entity(name: &str) -> Option<char> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code).filter(|c| *c != '\0');
    }

    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ensp" => '\u{2002}',
        "emsp" => '\u{2003}',
        "thinsp" => '\u{2009}',
        "shy" => '\u{ad}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "minus" => '\u{2212}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "laquo" => '\u{ab}',
        "raquo" => '\u{bb}',
        "hellip" => '\u{2026}',
        "bull" => '\u{2022}',
        "middot" => '\u{b7}',
        "prime" => '\u{2032}',
        "Prime" => '\u{2033}',
        "deg" => '\u{b0}',
        "plusmn" => '\u{b1}',
        "times" => '\u{d7}',
        "divide" => '\u{f7}',
        "micro" => '\u{b5}',
        "le" => '\u{2264}',
        "ge" => '\u{2265}',
        "ne" => '\u{2260}',
        "asymp" => '\u{2248}',
        "sim" => '\u{223c}',
        "infin" => '\u{221e}',
        "larr" => '\u{2190}',
        "uarr" => '\u{2191}',
        "rarr" => '\u{2192}',
        "darr" => '\u{2193}',
        "harr" => '\u{2194}',
        "sup1" => '\u{b9}',
        "sup2" => '\u{b2}',
        "sup3" => '\u{b3}',
        "frac12" => '\u{bd}',
        "frac14" => '\u{bc}',
        "frac34" => '\u{be}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        "sect" => '\u{a7}',
        "para" => '\u{b6}',
        "permil" => '\u{2030}',
        _ => return greek_letter(name),
    };
    Some(decoded)
}

fn greek_letter(name: &str) -> Option<char> {
    let mut chars = name.chars();
    let first = chars.next()?;
    let rest = chars.as_str();
    if !rest.bytes().all(|b| b.is_ascii_lowercase()) {
        return None;
    }
    let lower = format!("{}{}", first.to_ascii_lowercase(), rest);
    let offset = GREEK_LETTERS.iter().position(|g| *g == lower)? as u32;
    if first.is_ascii_lowercase() {
        char::from_u32(0x3B1 + offset)
    } else if first.is_ascii_uppercase() && lower != "sigmaf" {
        char::from_u32(0x391 + offset)
    } else {
        None
    }
}

/// Markup-stripped text of an evidence sentence
pub fn strip_markup(markup: &str) -> String {
    let mut stripper = MarkupStripper::new();
    stripper.feed(markup);
    stripper.finish()
}

/// Dedup key of an evidence sentence: stripped text, whitespace collapsed
pub fn canonical_sentence(markup: &str) -> String {
    strip_markup(markup)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Evidence items of one edge, unique by canonical sentence
///
/// Insertion order is kept; the first item seen for a sentence wins.
#[derive(Debug, Clone, Default)]
pub struct EvidenceSet {
    items: Vec<EvidenceItem>,
    sentences: HashSet<String>,
}

impl EvidenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item; returns false if its sentence was already present
    pub fn insert(&mut self, item: EvidenceItem) -> bool {
        if !self.sentences.insert(canonical_sentence(&item.markup)) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[EvidenceItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<EvidenceItem> {
        self.items
    }

    /// Fold another set in, keeping this set's items on conflict
    pub fn merge(&mut self, other: EvidenceSet) {
        for item in other.items {
            self.insert(item);
        }
    }
}
