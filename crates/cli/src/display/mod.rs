pub mod formatter;

pub use formatter::{print_action, print_outputs, schema_fields};
