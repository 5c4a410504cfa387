//! Output rendering for snapshots

pub mod json;
pub mod text;

pub use json::{render_json, render_json_compact, render_json_string};
pub use text::{render_summary, render_table};
