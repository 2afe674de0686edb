//! Guess-the-footballer quiz rounds built from Wikipedia.
//!
//! A round resolves a free-text player name to one page, extracts a
//! [`CareerRecord`] from its HTML and masks the player's name so the résumé
//! can be shown as a puzzle.

pub use client::WikiClient;
pub use config::{ConfigError, QuizConfig};
pub use error::{ErrorCategory, QuizError, Result};
pub use extract::extract_career;
pub use model::*;
pub use obscure::{obscure, NameVariants, ObscureOptions, NAME_PLACEHOLDER};
pub use wiki::suggest::MIN_SUGGEST_CHARS;
pub use wiki::DEFAULT_API_URL;

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod obscure;
pub mod server;
pub(crate) mod wiki;
