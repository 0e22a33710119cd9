use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

pub struct AppPaths {
    pub _base: PathBuf,
    pub boards: PathBuf,
}

impl AppPaths {
    pub fn from_project_dirs() -> Option<Self> {
        ProjectDirs::from("com", "gridboard", "Gridboard").map(|dirs| {
            let _base = dirs.data_dir().to_path_buf();
            let boards = _base.join("boards");

            Self { _base, boards }
        })
    }

    pub fn ensure_dirs_exist(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.boards)
    }
}
