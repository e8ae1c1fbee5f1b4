//! Local preview of the selected image.
//!
//! The preview is decoded from the in-memory bytes of the selection, so it
//! is available before any network round trip. Files the `image` crate
//! cannot decode still get a preview card with their name, type and size.

use std::path::Path;
use std::{fs, io};

use image::{GenericImageView, ImageFormat};
use swatchbox_types::SelectedFile;
use tracing::debug;

/// Longest edge of the stored thumbnail, in pixels.
pub const THUMBNAIL_EDGE: u32 = 48;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Downscaled RGB pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl Thumbnail {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Nearest-neighbour sample for a target grid of `columns` x `rows`.
    pub fn sample(&self, column: u32, row: u32, columns: u32, rows: u32) -> Option<[u8; 3]> {
        if columns == 0 || rows == 0 {
            return None;
        }
        let x = column * self.width / columns;
        let y = row * self.height / rows;
        self.pixel(x, y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub file_name: String,
    pub mime_type: String,
    pub byte_len: usize,
    /// Decoded dimensions of the full image
    pub dimensions: Option<(u32, u32)>,
    pub thumbnail: Option<Thumbnail>,
}

impl ImagePreview {
    pub fn from_file(file: &SelectedFile) -> Self {
        let decoded = match image::load_from_memory(&file.bytes) {
            Ok(decoded) => Some(decoded),
            Err(error) => {
                debug!(file = %file.file_name, %error, "preview decode failed");
                None
            }
        };

        let dimensions = decoded.as_ref().map(|image| image.dimensions());
        let thumbnail = decoded.map(|image| {
            let small = image.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE).to_rgb8();
            let (width, height) = small.dimensions();
            Thumbnail {
                width,
                height,
                pixels: small.pixels().map(|pixel| pixel.0).collect(),
            }
        });

        Self {
            file_name: file.file_name.clone(),
            mime_type: file.mime_type.clone(),
            byte_len: file.bytes.len(),
            dimensions,
            thumbnail,
        }
    }

    /// One-line description for the preview panel title.
    pub fn summary(&self) -> String {
        let size = human_size(self.byte_len);
        match self.dimensions {
            Some((width, height)) => format!("{} · {}x{} · {}", self.file_name, width, height, size),
            None => format!("{} · {} · {}", self.file_name, self.mime_type, size),
        }
    }
}

/// Read a selection from disk. `Ok(None)` means the path is not a regular file.
pub fn load_selected_file(path: &Path) -> io::Result<Option<SelectedFile>> {
    if !path.is_file() {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = detect_mime_type(path, &bytes);
    Ok(Some(SelectedFile {
        file_name,
        mime_type,
        bytes,
    }))
}

/// Guess the MIME type from content first, then from the extension.
pub fn detect_mime_type(path: &Path, bytes: &[u8]) -> String {
    image::guess_format(bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| FALLBACK_MIME_TYPE.to_string())
}

fn human_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let value = bytes as f64;
    if value < KIB {
        format!("{} B", bytes)
    } else if value < KIB * KIB {
        format!("{:.1} KiB", value / KIB)
    } else {
        format!("{:.1} MiB", value / (KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{Rgb, RgbImage};

    use super::*;

    fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, Rgb(color));
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn decodes_png_into_thumbnail() {
        let file = SelectedFile {
            file_name: "red.png".into(),
            mime_type: "image/png".into(),
            bytes: png_bytes(96, 32, [255, 0, 0]),
        };
        let preview = ImagePreview::from_file(&file);
        assert_eq!(preview.dimensions, Some((96, 32)));
        let thumbnail = preview.thumbnail.unwrap();
        assert!(thumbnail.width <= THUMBNAIL_EDGE && thumbnail.height <= THUMBNAIL_EDGE);
        assert_eq!(thumbnail.pixel(0, 0), Some([255, 0, 0]));
        assert_eq!(thumbnail.sample(3, 1, 4, 2), Some([255, 0, 0]));
    }

    #[test]
    fn undecodable_bytes_still_produce_a_card() {
        let file = SelectedFile {
            file_name: "photo.jpg".into(),
            mime_type: "image/jpeg".into(),
            bytes: b"not really a jpeg".to_vec(),
        };
        let preview = ImagePreview::from_file(&file);
        assert!(preview.thumbnail.is_none());
        assert_eq!(preview.summary(), "photo.jpg · image/jpeg · 17 B");
    }

    #[test]
    fn loads_file_name_and_type_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swatch.png");
        fs::write(&path, png_bytes(2, 2, [0, 0, 255])).unwrap();

        let file = load_selected_file(&path).unwrap().unwrap();
        assert_eq!(file.file_name, "swatch.png");
        assert_eq!(file.mime_type, "image/png");
        assert!(load_selected_file(dir.path()).unwrap().is_none());
        assert!(load_selected_file(&dir.path().join("missing.png")).unwrap().is_none());
    }

    #[test]
    fn mime_type_prefers_content_then_extension() {
        assert_eq!(detect_mime_type(Path::new("x.bin"), &png_bytes(1, 1, [0, 0, 0])), "image/png");
        assert_eq!(detect_mime_type(Path::new("photo.jpg"), b"garbage"), "image/jpeg");
        assert_eq!(detect_mime_type(Path::new("notes.txt"), b"garbage"), FALLBACK_MIME_TYPE);
    }
}
