pub mod engine;
pub mod live;
pub mod phonetic;

pub use engine::SearchEngine;
pub use live::{SearchCoordinator, SearchOutcome, SearchSnapshot};
