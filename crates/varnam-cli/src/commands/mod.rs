pub mod config_ops;
pub mod learn_ops;
pub mod learnings_ops;
pub mod lookup_ops;
pub mod word_list;

use std::fs;
use std::path::Path;

use varnam_engine::{Varnam, VarnamError};

pub fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    format!("{home}/.local/share/varnam/learnings.vrns")
}

/// Open the learnings file at `path`, creating its directory if needed.
pub fn open_engine(path: &Path) -> Result<Varnam, VarnamError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Varnam::open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_engine_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/varnam/learnings.vrns");
        let v = open_engine(&path).unwrap();
        v.learn("മലയാളം").unwrap();
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn default_path_under_home() {
        assert!(default_db_path().ends_with("/.local/share/varnam/learnings.vrns"));
    }
}
