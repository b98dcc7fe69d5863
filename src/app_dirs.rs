use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "gridspell";
const DB_FILE: &str = "stats.db";

/// Where the persistent score database lives: the XDG state directory when
/// HOME is known, the platform-local data dir otherwise.
pub struct AppDirs;

impl AppDirs {
    pub fn db_path() -> Option<PathBuf> {
        let dir = match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME),
            None => ProjectDirs::from("", "", APP_NAME)?
                .data_local_dir()
                .to_path_buf(),
        };
        Some(dir.join(DB_FILE))
    }
}
