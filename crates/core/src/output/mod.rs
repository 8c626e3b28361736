//! Output naming: resolving per-input destinations and building the
//! concatenation list.

mod concat;
mod resolver;

pub use concat::{concat_list, concat_list_named, ConcatPlan, DEFAULT_CONCAT_NAME};
pub use resolver::resolve_output_path;
