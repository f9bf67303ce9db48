//! Path utilities

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Expand a leading `~` to the home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped.trim_start_matches(['/', '\\']));
        }
    }
    PathBuf::from(path)
}

/// Expand tilde and anchor relative paths at the working directory
pub fn normalize_path(path: &Path) -> PathBuf {
    let expanded = expand_tilde(&path.to_string_lossy());
    if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(expanded)
    }
}

/// Directory name grouping the backups of one env file.
///
/// `<name>-<hash>`: the file name without its leading `.`, plus a short
/// SHA-256 of the file's absolute path, so same-named files in different
/// projects never share a group.
pub fn backup_group(path: &Path) -> String {
    let absolute = normalize_path(path);
    let name = absolute
        .file_name()
        .map(|n| n.to_string_lossy().trim_start_matches('.').to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "env".to_string());

    // Resolve symlinks through the parent, which exists even before the file does.
    let resolved = match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(file_name)) => std::fs::canonicalize(parent)
            .map(|p| p.join(file_name))
            .unwrap_or_else(|_| absolute.clone()),
        _ => absolute.clone(),
    };

    let mut hasher = Sha256::new();
    hasher.update(resolved.to_string_lossy().as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{}-{}", name, &digest[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/.env");
        assert!(!path.to_string_lossy().starts_with('~'));
        assert_eq!(expand_tilde("plain/.env"), PathBuf::from("plain/.env"));
    }

    #[test]
    fn test_normalize_absolute_path() {
        if cfg!(unix) {
            assert_eq!(
                normalize_path(Path::new("/srv/app/.env")),
                PathBuf::from("/srv/app/.env")
            );
        }
        assert!(normalize_path(Path::new(".env")).is_absolute());
    }

    #[test]
    fn test_backup_group_name() {
        let group = backup_group(Path::new("/x/.env"));
        assert!(group.starts_with("env-"));
        assert_eq!(group.len(), "env-".len() + 12);
        assert!(backup_group(Path::new(".env.local")).starts_with("env.local-"));
        assert!(backup_group(Path::new("/")).starts_with("env-"));
    }

    #[test]
    fn test_backup_group_per_directory() {
        let a = backup_group(Path::new("/srv/project_a/.env"));
        let b = backup_group(Path::new("/srv/project_b/.env"));
        assert_ne!(a, b);
        assert_eq!(a, backup_group(Path::new("/srv/project_a/.env")));
    }
}
