use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::assets::decode::decode_image;
use crate::foundation::core::Size;
use crate::foundation::error::{CutplayError, CutplayResult};

/// Decoded image, premultiplied RGBA8, shared by every consumer of a cut's picture.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedImage {
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 pixels.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Natural size as a [`Size`].
    pub fn natural_size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Build from raw premultiplied pixels.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> CutplayResult<Self> {
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(CutplayError::asset(
                "prepared image byte length mismatch with width*height*4",
            ));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }
}

/// Load state of one image reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetStatus {
    /// Decoded and available.
    Ready,
    /// Load or decode failed with this message.
    Failed(String),
    /// Never requested.
    Missing,
}

/// Loads each referenced image once and remembers failures.
///
/// A failed load never aborts playback; cuts whose image is unavailable render a placeholder.
#[derive(Debug, Default)]
pub struct ImageStore {
    root: PathBuf,
    images: HashMap<String, Arc<PreparedImage>>,
    failures: HashMap<String, String>,
}

impl ImageStore {
    /// Store resolving relative references against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Directory relative references resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every reference not seen before. Failures are logged and recorded.
    #[tracing::instrument(skip_all)]
    pub fn preload<'a>(&mut self, refs: impl IntoIterator<Item = &'a str>) {
        for image_ref in refs {
            self.load(image_ref);
        }
        tracing::debug!(
            ready = self.images.len(),
            failed = self.failures.len(),
            "image preload finished"
        );
    }

    /// Load one reference (once) and report its status.
    pub fn load(&mut self, image_ref: &str) -> AssetStatus {
        let status = self.status(image_ref);
        if status != AssetStatus::Missing {
            return status;
        }
        match self.read_and_decode(image_ref) {
            Ok(img) => {
                self.images.insert(image_ref.to_string(), Arc::new(img));
                AssetStatus::Ready
            }
            Err(e) => {
                tracing::warn!(image = image_ref, error = %e, "image failed to load");
                let msg = e.to_string();
                self.failures.insert(image_ref.to_string(), msg.clone());
                AssetStatus::Failed(msg)
            }
        }
    }

    fn read_and_decode(&self, image_ref: &str) -> CutplayResult<PreparedImage> {
        if image_ref.contains("://") {
            return Err(CutplayError::asset(format!(
                "'{image_ref}' is not a local file reference"
            )));
        }
        let rel = normalize_rel_path(image_ref)?;
        let path = self.root.join(rel);
        let bytes =
            std::fs::read(&path).with_context(|| format!("read image '{}'", path.display()))?;
        decode_image(&bytes)
    }

    /// Register an already decoded image under `image_ref`.
    pub fn insert(&mut self, image_ref: impl Into<String>, image: PreparedImage) {
        let key = image_ref.into();
        self.failures.remove(&key);
        self.images.insert(key, Arc::new(image));
    }

    /// Decode `bytes` and register them under `image_ref`.
    pub fn insert_bytes(&mut self, image_ref: impl Into<String>, bytes: &[u8]) -> CutplayResult<()> {
        let img = decode_image(bytes)?;
        self.insert(image_ref, img);
        Ok(())
    }

    /// Decoded image for `image_ref`, if loaded.
    pub fn get(&self, image_ref: &str) -> Option<&Arc<PreparedImage>> {
        self.images.get(image_ref)
    }

    /// Load state of `image_ref`.
    pub fn status(&self, image_ref: &str) -> AssetStatus {
        if self.images.contains_key(image_ref) {
            AssetStatus::Ready
        } else if let Some(msg) = self.failures.get(image_ref) {
            AssetStatus::Failed(msg.clone())
        } else {
            AssetStatus::Missing
        }
    }
}

/// Normalize a relative reference (`a/./b` to `a/b`), rejecting absolute paths and `..`.
pub fn normalize_rel_path(source: &str) -> CutplayResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(CutplayError::asset("image references must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CutplayError::asset(
                "image references must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CutplayError::asset("image reference must contain a file name"));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
