//! Record rendering to HTML fragments.

pub mod html;
pub mod record;

pub use html::fragment;
pub use record::{
    collect_record_files, load_records, render_record, PreparedSchema, RenderWarning,
    RenderedField, RenderedRecord,
};
