//! Programming language radar
//!
//! # Overview
//!
//! Given a GitHub username, library lists up to 100 of the user's public repositories and fetches
//! the language breakdown (bytes of code per language) of every one of them concurrently.
//! Repositories whose breakdown cannot be fetched are skipped; one broken repository never hides the whole profile.
//! Byte counts are summed into a global total and converted into percentages.
//! The five languages with the largest share become the vertices of a radar chart, remaining ones are reported as "other languages".
//! Users with fewer than five languages get placeholder vertices (`Linguagem 4`, `Linguagem 5`, ...) valued 0.
//! Before rendering, percentages are square-rooted so small shares stay visible next to dominant ones.
//!
//! Fetching (`api::Client`) and rendering (`api::ChartRenderer`) are traits, implemented by separate client crates.

pub mod api;
pub mod selector;
pub mod transform;

#[cfg(feature = "aggregator")]
pub mod aggregator;

#[cfg(feature = "aggregator")]
pub use aggregator::{aggregate_languages, LanguageProfile, LanguageRadar, RadarOptions};
pub use selector::{select_top, RankedSeries};
pub use transform::{transform, DisplaySeries};
