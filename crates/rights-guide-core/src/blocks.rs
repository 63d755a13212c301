//! Tagged-line classifier for free-text fields.
//!
//! A free-text cell is split into lines; each line is trimmed and matched
//! against [`LINE_RULES`] top-down, first match wins. A matching rule strips
//! its prefix and tags the remainder as a bullet at the rule's level. Any
//! other non-blank line becomes a level-0 text block. Blank lines are
//! dropped.
//!
//! ```rust
//! use rights_guide_core::blocks::parse_blocks;
//! use rights_guide_core::models::ContentBlock;
//!
//! let blocks = parse_blocks("• eat\n◦ well\n- sleep");
//! assert_eq!(
//!     blocks,
//!     vec![
//!         ContentBlock::bullet(1, "eat"),
//!         ContentBlock::bullet(2, "well"),
//!         ContentBlock::bullet(1, "sleep"),
//!     ]
//! );
//! ```

use crate::models::{BlockKind, ContentBlock};

/// A prefix → block-kind rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRule {
    pub prefix: &'static str,
    pub kind: BlockKind,
    pub level: u8,
}

/// Bullet rules in precedence order.
pub const LINE_RULES: &[LineRule] = &[
    LineRule {
        prefix: "• ",
        kind: BlockKind::Bullet,
        level: 1,
    },
    LineRule {
        prefix: "◦ ",
        kind: BlockKind::Bullet,
        level: 2,
    },
    LineRule {
        prefix: "- ",
        kind: BlockKind::Bullet,
        level: 1,
    },
];

/// Classify a single line. Returns `None` for blank lines.
pub fn classify_line(line: &str) -> Option<ContentBlock> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    for rule in LINE_RULES {
        if let Some(rest) = trimmed.strip_prefix(rule.prefix) {
            return Some(ContentBlock {
                kind: rule.kind,
                level: rule.level,
                text: rest.trim().to_string(),
            });
        }
    }

    Some(ContentBlock::text(trimmed))
}

/// Parse a whole field into blocks, preserving line order.
pub fn parse_blocks(field: &str) -> Vec<ContentBlock> {
    field.lines().filter_map(classify_line).collect()
}

/// Parse an optional field into a section: `None` when the field is absent
/// or contains no non-blank line.
pub fn parse_section(field: Option<&str>) -> Option<Vec<ContentBlock>> {
    let blocks = parse_blocks(field?);
    if blocks.is_empty() {
        None
    } else {
        Some(blocks)
    }
}
