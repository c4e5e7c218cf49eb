#![forbid(unsafe_code)]

//! Data model and aggregation engine for GitHub profile cards (headless).
//!
//! Design goals:
//! - pure, deterministic derivations (no I/O, "now" is always an explicit input)
//! - a single immutable render configuration resolved once per process
//! - runtime-agnostic: nothing here depends on an async executor

pub mod aggregate;
pub mod config;
pub mod error;
pub mod models;

pub use aggregate::{
    CardStats, DESCRIPTION_MAX_CHARS, RankedLanguage, RankedRepository, TOP_LANGUAGES,
    TOP_REPOSITORIES, count_recent_activity, merge_language_maps, rank_languages,
    top_repositories, truncate_description,
};
pub use config::{CardConfig, TextColors};
pub use error::{Error, Result};
pub use models::{ActivityEvent, LanguageBytes, Profile, Repository};
