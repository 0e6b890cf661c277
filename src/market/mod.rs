//! Market resolution, ticker parsing, and fallback sample data.

pub mod resolver;
pub mod samples;
pub mod ticker;
pub mod types;

pub use resolver::{resolve, Resolution, ResolutionSource};
pub use types::{series_for, Category, Market, VoteDirection, CATALOG, DEFAULT_SERIES};
