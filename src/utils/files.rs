use std::fs::{self, File};
use std::path::Path;

pub fn file_exists(file_name: &str) -> bool {
    File::open(file_name).is_ok()
}

/* Create the parent directories of a file path if they are missing */
pub fn create_directories_if_needed(file_name: &str) {
    if let Some(parent) = Path::new(file_name).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = fs::create_dir_all(parent);
        }
    }
}
