use std::path::{Path, PathBuf};

/// Extensions accepted when none are configured.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "gif"];

/// Check if a path has one of `extensions` (case-insensitive).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let ext = e.to_lowercase();
            extensions.iter().any(|supported| supported.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

/// Expand tilde (~) in path
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

/// File stem used in export names, falling back to `image`.
pub fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image")
}

/// Lowercased extension of `name`, if any.
pub fn file_extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("a/b.PNG"), &defaults()));
        assert!(has_extension(Path::new("x.webp"), &defaults()));
        assert!(!has_extension(Path::new("x.txt"), &defaults()));
        assert!(!has_extension(Path::new("noext"), &defaults()));
        assert!(!has_extension(Path::new("x.png"), &["jpg".to_string()]));
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
    }

    #[test]
    fn test_file_stem_and_extension() {
        assert_eq!(file_stem("beach.day.JPG"), "beach.day");
        assert_eq!(file_stem(""), "image");
        assert_eq!(file_extension("beach.JPG").as_deref(), Some("jpg"));
        assert_eq!(file_extension("beach"), None);
    }
}
