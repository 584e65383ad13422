//! CLI command handlers, one per file.

mod list;
mod names;
mod refresh;
mod show;
mod status;

pub use list::run_list;
pub use names::run_names;
pub use refresh::run_refresh;
pub use show::run_show;
pub use status::run_status;
