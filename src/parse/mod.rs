pub mod deadline;
pub mod json_format;
pub mod lines;
pub mod text_parser;
pub mod text_serializer;

pub use deadline::{humanize_remaining, parse_deadline};
pub use json_format::{parse_json_store, serialize_json_store};
pub use lines::{LineGrammar, Splitter};
pub use text_parser::parse_store;
pub use text_serializer::serialize_store;
