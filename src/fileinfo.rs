//! File descriptors: a path split into directory, stem, and extension.
//!
//! The selection state machine compares descriptors by value to detect
//! change and validates them against fixed extension sets before a
//! conversion may start, so this type is plain data with no I/O.

use std::fmt;
use std::path::{Path, PathBuf};

/// Extensions accepted as conversion sources.
pub const SOURCE_EXTENSIONS: &[&str] = &[".pdf", ".jpg"];

/// Extensions accepted as conversion targets.
pub const TARGET_EXTENSIONS: &[&str] = &[".pdf"];

/// A filesystem path parsed into its directory / stem / extension triple.
///
/// The extension keeps its leading dot and is compared verbatim — `.PDF`
/// is not `.pdf`. Immutable once constructed apart from
/// [`FileDescriptor::with_dir`], which the conversion trigger uses to fill
/// a missing target directory from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    dir: PathBuf,
    stem: String,
    ext: String,
}

impl FileDescriptor {
    /// Parse a raw path string into a descriptor.
    ///
    /// A name with no dot (or a leading-dot name like `.hidden`) has an
    /// empty extension; a bare filename has an empty directory.
    pub fn parse(raw: &str) -> Self {
        let path = Path::new(raw);
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        // `Path::extension` treats ".hidden" as extensionless, which is
        // exactly the split the validity rules want.
        let (stem, ext) = match Path::new(&name).extension() {
            Some(e) => {
                let ext = format!(".{}", e.to_string_lossy());
                let stem = name[..name.len() - ext.len()].to_string();
                (stem, ext)
            }
            None => (name, String::new()),
        };

        Self { dir, stem, ext }
    }

    /// Directory component (may be empty for a bare filename).
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Filename without extension.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Extension including the leading dot, or `""`.
    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// The full path, re-assembled from the triple.
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}{}", self.stem, self.ext))
    }

    /// A copy of this descriptor with the directory replaced.
    pub fn with_dir(&self, dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            stem: self.stem.clone(),
            ext: self.ext.clone(),
        }
    }

    /// Whether this descriptor may start a conversion in the given role:
    /// non-empty stem and extension inside the allowed set.
    pub fn is_valid(&self, allowed: &[&str]) -> bool {
        !self.stem.is_empty() && allowed.contains(&self.ext.as_str())
    }

    /// The default target name derived from a source: `<stem>_ocr.pdf`,
    /// with no directory (filled from the source at conversion time).
    pub fn default_target_name(&self) -> String {
        format!("{}_ocr.pdf", self.stem)
    }
}

impl fmt::Display for FileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().display())
    }
}
