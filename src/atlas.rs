//! Texture atlas pages.
//!
//! The real atlas pipeline is an external dependency; this module keeps
//! only what the node needs from it: a list of texture pages, each with
//! pixel data and a premultiplied-alpha flag. The page-list file format
//! is one page per line, an image path optionally followed by `pma`:
//!
//! ```text
//! # character atlas
//! character.png pma
//! effects.png
//! ```

use std::path::Path;

use image::GenericImageView;
use thiserror::Error;

use crate::pose::PageId;

/// Errors raised while loading an atlas.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("failed to read atlas file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode texture page {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("atlas file {path} declares no pages")]
    Empty { path: String },
}

/// A single texture page: RGBA8 pixels plus blend metadata.
pub struct TexturePage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Pixel data was authored with premultiplied alpha.
    pub premultiplied_alpha: bool,
    pixels: Vec<u8>,
}

impl TexturePage {
    /// Load a page from an image file.
    pub fn from_file(path: impl AsRef<Path>, premultiplied_alpha: bool) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let img = image::open(path).map_err(|source| AtlasError::Decode {
            path: path.display().to_string(),
            source,
        })?;
        let (width, height) = img.dimensions();
        Ok(Self {
            name,
            width,
            height,
            premultiplied_alpha,
            pixels: img.to_rgba8().into_raw(),
        })
    }

    /// Create a single-color page, useful for tests and placeholders.
    pub fn solid(name: &str, color: [u8; 4], premultiplied_alpha: bool) -> Self {
        Self {
            name: name.to_string(),
            width: 1,
            height: 1,
            premultiplied_alpha,
            pixels: color.to_vec(),
        }
    }

    /// Raw RGBA8 pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// An ordered collection of texture pages addressed by [`PageId`].
#[derive(Default)]
pub struct Atlas {
    pages: Vec<TexturePage>,
}

impl Atlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an atlas from a page-list file. Image paths are resolved
    /// relative to the list file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AtlasError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut atlas = Atlas::new();
        for (image, premultiplied) in parse_page_list(&text) {
            let page = TexturePage::from_file(dir.join(image), premultiplied)?;
            atlas.add_page(page);
        }
        if atlas.pages.is_empty() {
            return Err(AtlasError::Empty {
                path: path.display().to_string(),
            });
        }
        log::debug!(
            "loaded atlas {} with {} page(s)",
            path.display(),
            atlas.pages.len()
        );
        Ok(atlas)
    }

    pub fn add_page(&mut self, page: TexturePage) -> PageId {
        let id = PageId(self.pages.len());
        self.pages.push(page);
        id
    }

    pub fn page(&self, id: PageId) -> Option<&TexturePage> {
        self.pages.get(id.0)
    }

    pub fn pages(&self) -> &[TexturePage] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Parse the page-list text into (image path, premultiplied) entries.
fn parse_page_list(text: &str) -> Vec<(&str, bool)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let mut parts = line.split_whitespace();
            let image = parts.next().unwrap_or(line);
            let premultiplied = parts.any(|token| token.eq_ignore_ascii_case("pma"));
            (image, premultiplied)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_list() {
        let entries = parse_page_list("# comment\ncharacter.png pma\n\neffects.png\n");
        assert_eq!(entries, vec![("character.png", true), ("effects.png", false)]);
    }

    #[test]
    fn test_page_lookup() {
        let mut atlas = Atlas::new();
        let a = atlas.add_page(TexturePage::solid("a", [255; 4], true));
        let b = atlas.add_page(TexturePage::solid("b", [0, 0, 0, 255], false));
        assert_ne!(a, b);
        assert!(atlas.page(a).is_some_and(|p| p.premultiplied_alpha));
        assert!(atlas.page(b).is_some_and(|p| !p.premultiplied_alpha));
        assert!(atlas.page(PageId(2)).is_none());
    }

    #[test]
    fn test_missing_atlas_file() {
        let err = Atlas::from_file("definitely/not/here.atlas");
        assert!(matches!(err, Err(AtlasError::Io { .. })));
    }
}
