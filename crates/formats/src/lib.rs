pub mod config_edit;
pub mod config_file;
pub mod defaults;
pub mod scene_config;

pub use config_edit::*;
pub use config_file::*;
pub use scene_config::*;
