pub mod list;
pub mod run;
pub mod schema;

pub use list::list_command;
pub use run::{RunOptions, run_command};
pub use schema::schema_command;
