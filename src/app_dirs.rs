use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "stepviz";

/// Where stepviz keeps its config and log files
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    pub fn config_path() -> PathBuf {
        match Self::project() {
            Some(pd) => pd.config_dir().join("config.json"),
            None => PathBuf::from("stepviz_config.json"),
        }
    }

    /// The XDG state dir where the platform has one, else local data.
    pub fn log_path() -> Option<PathBuf> {
        Self::project().map(|pd| {
            pd.state_dir()
                .unwrap_or_else(|| pd.data_local_dir())
                .join("stepviz.log")
        })
    }
}
