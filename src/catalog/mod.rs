pub mod loader;
pub mod settings;

pub use loader::{load_catalog, read_catalog, LoadedCatalog, RejectedRow};
pub use settings::{load_config, save_config};
