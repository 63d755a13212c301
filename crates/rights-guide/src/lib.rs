//! # Rights Guide
//!
//! Turns a spreadsheet export of legal-rights topics into uniquely-keyed JSON
//! artifacts and answers retrieval queries over them from a CLI and a JSON
//! HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌──────────────────┐
//! │ source.csv  │──▶│  Normalize   │──▶│ public/data/*.json│
//! └─────────────┘   └─────────────┘   └────────┬─────────┘
//!                                              │
//!                        ┌─────────────────────┤
//!                        ▼                     ▼
//!                   ┌──────────┐         ┌──────────┐
//!                   │   CLI    │         │   HTTP   │
//!                   │ (guide)  │         │  (JSON)  │
//!                   └──────────┘         └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! guide generate                       # write artifacts
//! guide search "overtime"
//! guide scenario workplace-problem
//! guide serve                          # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`generate`] | Source → snapshot → artifacts |
//! | [`artifacts`] | Artifact names, atomic writes, loading |
//! | [`search`] | `guide search` |
//! | [`scenario`] | `guide scenario` |
//! | [`get`] | `guide get` |
//! | [`stats`] | `guide stats` |
//! | [`server`] | JSON HTTP API |
//! | [`analytics`] | Event sinks and identifier hashing |
//!
//! The pure model, normalizer, and retrieval engine live in
//! `rights_guide_core`.

pub mod analytics;
pub mod artifacts;
pub mod config;
pub mod generate;
pub mod get;
pub mod scenario;
pub mod search;
pub mod server;
pub mod stats;
