//! Icon repository: maps a semantic type string to drawable SVG content.
//!
//! The layout engine consumes this as an injected capability so it stays a
//! pure, independently testable function. A lookup miss is never fatal to a
//! layout; callers degrade to label-only elements.

use anyhow::{Error, ensure};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// A resolved icon: the matched file stem and its raw SVG text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconHandle {
    pub name: String,
    pub content: String,
}

/// Synchronous, side-effect-free icon lookup.
pub trait IconRepository {
    /// Resolve a semantic type to an icon, or `None` when there is no match.
    fn resolve(&self, semantic_type: &str) -> Option<IconHandle>;
}

/// A repository that never resolves anything, for tests and icon-less
/// deployments.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullIconRepository;

impl IconRepository for NullIconRepository {
    fn resolve(&self, _semantic_type: &str) -> Option<IconHandle> {
        None
    }
}

/// Disk-backed repository over a flat directory of `*.svg` files.
///
/// Matching policy, in order: exact normalized name, hyphen-stripped name,
/// then a directory scan for stem containment either way. The scan walks
/// filenames in sorted order so lookups stay deterministic.
#[derive(Debug, Clone)]
pub struct SvgDirRepository {
    root: PathBuf,
}

impl SvgDirRepository {
    /// Open a repository rooted at `root`, validating that it is a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        ensure!(
            root.is_dir(),
            "icon directory not found: {}",
            root.display()
        );
        Ok(Self { root })
    }

    fn read_icon(&self, path: &Path) -> Option<IconHandle> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("failed to read icon {}: {err}", path.display());
                return None;
            }
        };
        // Tolerate stray non-UTF-8 bytes in dataset files.
        let content = String::from_utf8_lossy(&bytes).into_owned();
        if content.is_empty() {
            warn!("empty icon file: {}", path.display());
            return None;
        }
        let name = path.file_stem()?.to_string_lossy().into_owned();
        Some(IconHandle { name, content })
    }

    /// Sorted stems of all `*.svg` files under the root.
    fn svg_stems(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut stems: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "svg"))
            .filter_map(|path| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .collect();
        stems.sort();
        stems
    }
}

impl IconRepository for SvgDirRepository {
    fn resolve(&self, semantic_type: &str) -> Option<IconHandle> {
        let normalized = normalize(semantic_type);
        if normalized.is_empty() {
            return None;
        }

        let exact = self.root.join(format!("{normalized}.svg"));
        if exact.is_file() {
            return self.read_icon(&exact);
        }

        let squashed = normalized.replace('-', "");
        let squashed_path = self.root.join(format!("{squashed}.svg"));
        if squashed_path.is_file() {
            return self.read_icon(&squashed_path);
        }

        for stem in self.svg_stems() {
            let stem_lower = stem.to_lowercase();
            if !stem_lower.contains(&normalized) && !normalized.contains(&stem_lower) {
                continue;
            }
            if let Some(handle) = self.read_icon(&self.root.join(format!("{stem}.svg"))) {
                return Some(handle);
            }
        }

        debug!("no icon for semantic type `{semantic_type}`");
        None
    }
}

/// Lowercase, with spaces and underscores mapped to hyphens.
fn normalize(semantic_type: &str) -> String {
    semantic_type.trim().to_lowercase().replace([' ', '_'], "-")
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn normalizes_spacing_and_case() {
        assert_eq!(normalize("Ice Cream"), "ice-cream");
        assert_eq!(normalize("basket_ball"), "basket-ball");
        assert_eq!(normalize("  apple  "), "apple");
        assert_eq!(normalize(""), "");
    }
}
