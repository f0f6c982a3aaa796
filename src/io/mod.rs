pub mod backup;
pub mod config_io;
pub mod editor;
pub mod store_io;

pub use backup::write_backup;
pub use config_io::{ConfigError, load_config, resolve_store};
pub use editor::{EditorError, edit_text, resolve_editor_command};
pub use store_io::{LoadStatus, StoreError, StoreFile, load_store, save_store};
