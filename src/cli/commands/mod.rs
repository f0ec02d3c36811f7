mod ads;
mod backup;
mod hash_password;
mod import;
mod list;
mod pin;
mod planning;
mod remove;
mod search;

pub use ads::cmd_ads;
pub use backup::{cmd_export, cmd_restore};
pub use hash_password::cmd_hash_password;
pub use import::cmd_import;
pub use list::cmd_list_titles;
pub use pin::cmd_pin;
pub use planning::cmd_planning;
pub use remove::cmd_remove_title;
pub use search::cmd_search;
