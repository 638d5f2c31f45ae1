pub mod catalog;
pub mod cli;
pub mod error;
pub mod interface;
pub mod models;
pub mod planner;

pub use error::{FeedError, Result};
pub use models::{CatProfile, NormalizedItem, QuantityPlan, RawItem};
