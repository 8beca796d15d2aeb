// src/infra/paths.rs — Platform path lookup
//
// EVOFOREST_HOME overrides everything; otherwise the platform config and cache
// directories from `directories` are used.

use directories::ProjectDirs;
use std::path::PathBuf;

fn evoforest_home() -> Option<PathBuf> {
    std::env::var_os("EVOFOREST_HOME").map(PathBuf::from)
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "evoforest")
}

/// Config directory: $EVOFOREST_HOME/ or the platform config dir.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(home) = evoforest_home() {
        return Some(home);
    }
    project_dirs().map(|d| d.config_dir().to_path_buf())
}

/// Default config file path, if a home directory can be determined.
pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Default response cache file.
pub fn default_cache_file() -> PathBuf {
    if let Some(home) = evoforest_home() {
        return home.join("cache").join("responses.json");
    }
    project_dirs()
        .map(|d| d.cache_dir().join("responses.json"))
        .unwrap_or_else(|| PathBuf::from(".evoforest-cache.json"))
}
