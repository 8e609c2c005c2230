//! Generation results and their durable cache.
//!
//! # Module Structure
//!
//! - `model`: the immutable [`GenerationResult`] record
//! - `cache`: [`ResultCache`], the ordered, persisted session history

mod cache;
mod model;

pub use cache::{ACTIVE_RESULT_KEY, RESULTS_KEY, ResultCache, ResultView};
pub use model::GenerationResult;
