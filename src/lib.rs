/// Insomnia — frameless temp-file cleaner.
///
/// GUI code lives in [`app`]; everything else is plain library code so the
/// integration tests can drive it without a window.
pub mod app;
pub mod cleaner;
pub mod logging;
pub mod paths;
pub mod platform;
pub mod settings;
pub mod theme;
pub mod updater;

pub use app::InsomniaApp;
pub use cleaner::{CleanJob, CleanerEvent, CleanerHandle, expand_env_vars};
pub use paths::AppPaths;
pub use settings::Settings;
