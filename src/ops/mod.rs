pub mod search;

pub use search::{Category, matches_all, search};
