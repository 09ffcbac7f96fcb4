//! Output formatting for the `fetch` command.

mod json;
mod text;

pub use json::{JsonFormatter, SnapshotOutput};
pub use text::TextFormatter;
#[cfg(test)]
mod tests;
