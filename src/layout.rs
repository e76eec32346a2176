//! Output folder layout and the no-overwrite guard.
//!
//! ```text
//! output/
//! ├── 2020-03-04-hello-world.md                 # content file per post
//! └── images/
//!     ├── 2020-03-04-hello-world-pic.jpg        # full-size assets
//!     └── thumbnails/
//!         └── 2020-03-04-hello-world-pic.jpg    # only for linked images
//! ```
//!
//! The output folder must not exist when a run starts. Every file is then
//! created exactly once: [`ensure_vacant`] runs before each write and turns a
//! second write to the same path into a fatal [`CollisionError`].

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

const IMAGES_DIR: &str = "images";
const THUMBNAILS_DIR: &str = "thumbnails";

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Directory \"{}\" already exists", .0.display())]
    AlreadyExists(PathBuf),
    #[error("Permission denied when trying to create \"{}\"", .0.display())]
    PermissionDenied(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A write was about to replace an existing file.
#[derive(Error, Debug)]
#[error("File {origin} -> {} already exists", .path.display())]
pub struct CollisionError {
    /// What produced the write (remote URL or source image path).
    pub origin: String,
    pub path: PathBuf,
}

/// Refuse to write to `path` if anything is already there.
pub fn ensure_vacant(path: &Path, origin: &str) -> Result<(), CollisionError> {
    if path.exists() {
        return Err(CollisionError {
            origin: origin.to_string(),
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Paths inside the migration output folder.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Create a fresh output folder with its `images/thumbnails` tree.
    pub fn create(root: &Path) -> Result<Self, LayoutError> {
        if root.exists() {
            return Err(LayoutError::AlreadyExists(root.to_path_buf()));
        }
        std::fs::create_dir(root).map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => LayoutError::PermissionDenied(root.to_path_buf()),
            ErrorKind::AlreadyExists => LayoutError::AlreadyExists(root.to_path_buf()),
            _ => LayoutError::Io(e),
        })?;

        let layout = Self::at(root);
        std::fs::create_dir(layout.images_dir())?;
        std::fs::create_dir(layout.thumbnails_dir())?;
        Ok(layout)
    }

    /// Describe an existing output folder without touching the filesystem.
    pub fn at(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    pub fn thumbnails_dir(&self) -> PathBuf {
        self.images_dir().join(THUMBNAILS_DIR)
    }

    pub fn content_file(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{}.md", slug))
    }

    /// Link to `path` as seen from a rendered post.
    ///
    /// Posts render one directory below the site root, so links go up one
    /// level and then follow the file's position inside the output folder:
    /// `output/images/a.jpg` → `../images/a.jpg`. Always `/`-separated.
    pub fn content_link(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let mut link = String::from("..");
        for component in relative.components() {
            link.push('/');
            link.push_str(&component.as_os_str().to_string_lossy());
        }
        link
    }

    /// Root-relative display form of `path` (`images/thumbnails/a.jpg`).
    pub fn display_relative(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}
