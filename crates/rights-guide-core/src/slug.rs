//! Slug and id derivation.
//!
//! Both ids and slugs come from the same canonical token sequence:
//!
//! 1. Lower-case the input.
//! 2. Treat whitespace, `-` and `_` as separators.
//! 3. Keep only ASCII alphanumerics and the Thai block (U+0E00–U+0E7F);
//!    every other character is dropped without splitting the token.
//! 4. Drop empty tokens, which collapses separator runs and strips leading
//!    and trailing separators.
//!
//! Slugs join the tokens with `-`, ids with `_`.
//!
//! ```rust
//! use rights_guide_core::slug::{generate_id, slugify};
//!
//! assert_eq!(slugify("  Know Your  Rights! "), "know-your-rights");
//! assert_eq!(generate_id("  Know Your  Rights! "), "know_your_rights");
//! ```

use std::ops::RangeInclusive;

/// Script block of the guide's primary language.
const THAI_BLOCK: RangeInclusive<char> = '\u{0E00}'..='\u{0E7F}';

pub const SLUG_SEPARATOR: char = '-';
pub const ID_SEPARATOR: char = '_';

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '-' || c == '_'
}

fn is_retained(c: char) -> bool {
    c.is_ascii_alphanumeric() || THAI_BLOCK.contains(&c)
}

/// Split `text` into its canonical tokens.
pub fn canonical_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.chars().flat_map(char::to_lowercase) {
        if is_separator(c) {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else if is_retained(c) {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// URL-friendly slug, words joined by `-`.
pub fn slugify(text: &str) -> String {
    join_tokens(&canonical_tokens(text), SLUG_SEPARATOR)
}

/// Identifier, words joined by `_`.
pub fn generate_id(text: &str) -> String {
    join_tokens(&canonical_tokens(text), ID_SEPARATOR)
}

/// Join tokens with `separator`.
pub fn join_tokens(tokens: &[String], separator: char) -> String {
    let mut buf = [0u8; 4];
    tokens.join(&*separator.encode_utf8(&mut buf))
}

/// Append a numeric suffix (`base-2`, `base_2`, …).
pub fn with_suffix(base: &str, n: usize, separator: char) -> String {
    format!("{}{}{}", base, separator, n)
}
