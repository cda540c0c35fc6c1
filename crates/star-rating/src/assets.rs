//! Icon asset loading and caching.
//!
//! The rating control draws two icons: a lit star and an unlit star. Both
//! ship embedded in the crate via `include_dir!`, so the control works out
//! of the box, and hosts can override them:
//!
//! - [`AssetRegistry::register_image`] replaces an icon with a decoded image
//! - [`AssetRegistry::register_directory`] adds a filesystem search root
//! - [`AssetRegistry::register_embedded`] adds another embedded directory
//!
//! Resolution order is registered images, then filesystem roots, then
//! embedded directories (most recently registered first), falling back to
//! the built-in icons. Decoded images are cached; the same name always
//! resolves to the same `Arc` until a source changes.
//!
//! ```ignore
//! use star_rating::assets::{AssetRegistry, STAR_ON_ASSET};
//!
//! let icon = AssetRegistry::global().resolve(STAR_ON_ASSET)?;
//! println!("{}x{}", icon.width(), icon.height());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use include_dir::{Dir, include_dir};
use parking_lot::RwLock;
use thiserror::Error;

use crate::geometry::Size;

/// Name of the lit star icon.
pub const STAR_ON_ASSET: &str = "rating-star-on.png";

/// Name of the unlit star icon.
pub const STAR_OFF_ASSET: &str = "rating-star-off.png";

/// Icons compiled into the crate.
static BUILTIN_ICONS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Global asset registry instance.
static GLOBAL_REGISTRY: OnceLock<AssetRegistry> = OnceLock::new();

/// Errors from asset resolution and decoding.
#[derive(Debug, Error)]
pub enum AssetError {
    /// No registered source provides the named asset.
    #[error("asset not found: {name}")]
    NotFound {
        /// The asset name that was requested.
        name: String,
    },

    /// The asset bytes could not be decoded as an image.
    #[error("failed to decode asset {name}")]
    Decode {
        /// The asset name that was being decoded.
        name: String,
        /// The underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// A filesystem source failed to read the asset.
    #[error("failed to read asset {name} from {path}")]
    Io {
        /// The asset name that was being read.
        name: String,
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A raw pixel buffer does not match its declared dimensions.
    #[error("asset {name} has a bad pixel buffer: expected {expected} bytes, got {actual}")]
    InvalidBuffer {
        /// The asset name being constructed.
        name: String,
        /// The byte count the dimensions require.
        expected: usize,
        /// The byte count that was provided.
        actual: usize,
    },
}

/// A specialized Result type for asset operations.
pub type AssetResult<T> = std::result::Result<T, AssetError>;

/// A decoded icon, stored as tightly-packed RGBA8 pixels.
#[derive(Clone)]
pub struct IconImage {
    name: String,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl IconImage {
    /// Decode an icon from encoded image bytes (PNG, JPEG, ...).
    pub fn decode(name: impl Into<String>, bytes: &[u8]) -> AssetResult<Self> {
        let name = name.into();
        let decoded = image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
            name: name.clone(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            name,
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Build an icon from raw RGBA8 pixels.
    ///
    /// The buffer must hold exactly `width * height * 4` bytes.
    pub fn from_rgba8(
        name: impl Into<String>,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> AssetResult<Self> {
        let name = name.into();
        let expected = (width as usize) * (height as usize) * 4;
        if pixels.len() != expected {
            return Err(AssetError::InvalidBuffer {
                name,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            name,
            width,
            height,
            pixels,
        })
    }

    /// The asset name this icon was resolved from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The icon's size as widget-space dimensions.
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }

    /// The raw RGBA8 pixel data, row-major, no padding.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

impl fmt::Debug for IconImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IconImage")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// A wrapper around an embedded directory from `include_dir!`.
#[derive(Clone, Copy)]
pub struct EmbeddedDir {
    dir: &'static Dir<'static>,
}

impl EmbeddedDir {
    /// Creates a new embedded directory wrapper.
    pub const fn new(dir: &'static Dir<'static>) -> Self {
        Self { dir }
    }

    /// Gets a file's contents by name.
    ///
    /// Returns `None` if the file doesn't exist.
    pub fn get_file(&self, name: &str) -> Option<&'static [u8]> {
        self.dir.get_file(name).map(|f| f.contents())
    }

    /// Checks if a file exists with the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.dir.get_file(name).is_some()
    }
}

impl fmt::Debug for EmbeddedDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedDir")
            .field("file_count", &self.dir.files().count())
            .finish()
    }
}

/// Registry of icon sources with a decode cache.
///
/// Most code uses [`AssetRegistry::global`], which comes pre-loaded with
/// the built-in star icons. Separate instances are useful for tests and
/// for hosts that sandbox their asset search paths.
pub struct AssetRegistry {
    /// Directly registered images, highest priority.
    images: RwLock<HashMap<String, Arc<IconImage>>>,
    /// Filesystem search roots, most recently registered first.
    directories: RwLock<Vec<PathBuf>>,
    /// Embedded directories, most recently registered first.
    embedded: RwLock<Vec<EmbeddedDir>>,
    /// Cache of resolved icons by name.
    cache: RwLock<HashMap<String, Arc<IconImage>>>,
}

impl AssetRegistry {
    /// Creates an empty registry with no sources.
    pub fn new() -> Self {
        Self {
            images: RwLock::new(HashMap::new()),
            directories: RwLock::new(Vec::new()),
            embedded: RwLock::new(Vec::new()),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Gets the global registry instance.
    ///
    /// The global registry starts with the built-in star icons registered
    /// as its lowest-priority source.
    pub fn global() -> &'static AssetRegistry {
        GLOBAL_REGISTRY.get_or_init(|| {
            let registry = AssetRegistry::new();
            registry.register_embedded(EmbeddedDir::new(&BUILTIN_ICONS));
            registry
        })
    }

    /// Registers a decoded image under a name, shadowing every other source.
    pub fn register_image(&self, name: impl Into<String>, image: IconImage) {
        let name = name.into();
        self.cache.write().remove(&name);
        self.images.write().insert(name, Arc::new(image));
    }

    /// Adds a filesystem directory to search for assets by file name.
    ///
    /// Later registrations take priority over earlier ones.
    pub fn register_directory(&self, root: impl Into<PathBuf>) {
        self.directories.write().insert(0, root.into());
        self.cache.write().clear();
    }

    /// Adds an embedded directory as an asset source.
    ///
    /// Later registrations take priority over earlier ones.
    pub fn register_embedded(&self, dir: EmbeddedDir) {
        self.embedded.write().insert(0, dir);
        self.cache.write().clear();
    }

    /// Resolve an asset name to a decoded icon.
    ///
    /// Checks registered images, then filesystem roots, then embedded
    /// directories. The result is cached, so repeated calls for the same
    /// name return the same `Arc`.
    pub fn resolve(&self, name: &str) -> AssetResult<Arc<IconImage>> {
        if let Some(cached) = self.cache.read().get(name) {
            return Ok(Arc::clone(cached));
        }

        let resolved = self.resolve_uncached(name)?;
        self.cache
            .write()
            .insert(name.to_string(), Arc::clone(&resolved));
        Ok(resolved)
    }

    fn resolve_uncached(&self, name: &str) -> AssetResult<Arc<IconImage>> {
        if let Some(image) = self.images.read().get(name) {
            return Ok(Arc::clone(image));
        }

        for root in self.directories.read().iter() {
            let path = root.join(name);
            if !path.is_file() {
                continue;
            }
            let bytes = std::fs::read(&path).map_err(|source| AssetError::Io {
                name: name.to_string(),
                path: path.clone(),
                source,
            })?;
            let image = IconImage::decode(name, &bytes)?;
            tracing::debug!(
                target: "star_rating::assets",
                name,
                path = %path.display(),
                "resolved icon from filesystem"
            );
            return Ok(Arc::new(image));
        }

        for dir in self.embedded.read().iter() {
            if let Some(bytes) = dir.get_file(name) {
                let image = IconImage::decode(name, bytes)?;
                tracing::debug!(target: "star_rating::assets", name, "resolved embedded icon");
                return Ok(Arc::new(image));
            }
        }

        Err(AssetError::NotFound {
            name: name.to_string(),
        })
    }

    /// Checks whether any source can provide the named asset.
    pub fn contains(&self, name: &str) -> bool {
        if self.images.read().contains_key(name) || self.cache.read().contains_key(name) {
            return true;
        }
        if self
            .directories
            .read()
            .iter()
            .any(|root| root.join(name).is_file())
        {
            return true;
        }
        self.embedded.read().iter().any(|dir| dir.contains(name))
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AssetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetRegistry")
            .field("images", &self.images.read().len())
            .field("directories", &*self.directories.read())
            .field("cached", &self.cache.read().len())
            .finish()
    }
}
