//! Filesystem-based asset source for loading piece SVGs.

use gpui::{AssetSource, SharedString};
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Looks for assets next to the executable, then in the working directory
pub struct FileAssets {
    roots: Vec<PathBuf>,
}

impl FileAssets {
    pub fn new() -> Self {
        let mut roots = Vec::new();
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        {
            roots.push(dir);
        }
        if let Ok(dir) = std::env::current_dir() {
            roots.push(dir);
        }
        Self { roots }
    }
}

impl Default for FileAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetSource for FileAssets {
    fn load(&self, path: &str) -> gpui::Result<Option<Cow<'static, [u8]>>> {
        for root in &self.roots {
            if let Ok(data) = fs::read(root.join(path)) {
                return Ok(Some(Cow::Owned(data)));
            }
        }
        debug!("asset not found: {}", path);
        Ok(None)
    }

    fn list(&self, path: &str) -> gpui::Result<Vec<SharedString>> {
        let mut results = Vec::new();
        for root in &self.roots {
            if let Ok(entries) = fs::read_dir(root.join(path)) {
                results.extend(
                    entries
                        .flatten()
                        .filter_map(|e| e.file_name().to_str().map(|n| SharedString::from(n.to_string()))),
                );
                break;
            }
        }
        Ok(results)
    }
}
