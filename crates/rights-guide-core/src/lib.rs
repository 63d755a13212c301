//! # Rights Guide Core
//!
//! Shared logic for Rights Guide: data models, slugging, the content-block
//! classifier, the tabular source reader, the normalizer, the snapshot
//! format, and the retrieval engine.
//!
//! This crate performs no filesystem or network I/O and carries no async
//! runtime. Callers hand it text and get values back.
//!
//! ## Pipeline
//!
//! ```text
//! source text ──▶ source::parse_source ──▶ normalize::normalize ──▶ snapshot::Snapshot
//!                                                                      │
//!                                          legacy.flat (Vec<TopicRow>) ▼
//!                                                          search::apply_query
//!                                                          search::resolve_scenario
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Topics, categories, content blocks, flat rows, scenarios, queries |
//! | [`slug`] | Slug and id derivation from display strings |
//! | [`blocks`] | Tagged-line classifier for free-text fields |
//! | [`source`] | Delimited-text reader with header validation |
//! | [`normalize`] | Rows → uniquely-keyed topic index |
//! | [`snapshot`] | Structured document and legacy projections |
//! | [`search`] | Text search, category filter, scenario matching |

pub mod blocks;
pub mod models;
pub mod normalize;
pub mod search;
pub mod slug;
pub mod snapshot;
pub mod source;
