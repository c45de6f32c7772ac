//! Field classification and value formatting.
//!
//! The pipeline is classify-then-format: a key is mapped to a
//! [`FieldKind`] once, and values dispatch through a fixed rule chain that
//! always produces an HTML-safe string. [`format_field`] bundles both
//! steps for one-off use.

pub mod de;
pub mod kind;
pub mod value;

pub use kind::FieldKind;
pub use value::{escape_html, format_field, format_value};
