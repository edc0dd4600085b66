use std::{io::Cursor, path::Path};

use core_types::{Preview, PreviewSize};
use image::ImageFormat;

use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Debug, Clone)]
pub enum ThumbnailsError {
    IoError(String),
    EncodeError(String),
}

impl Display for ThumbnailsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ThumbnailsError::IoError(message) => {
                write!(f, "IO error when preparing preview: {}", message)
            }
            ThumbnailsError::EncodeError(message) => {
                write!(f, "Failed encoding preview: {}", message)
            }
        }
    }
}

impl std::error::Error for ThumbnailsError {}

/// Renders an aspect-fit PNG preview of the image at `image_path`.
///
/// The preview never exceeds `target_size` in either dimension. Images that
/// already fit are kept at their own size.
pub fn render_preview(
    image_path: &Path,
    target_size: PreviewSize,
) -> Result<Preview, ThumbnailsError> {
    let image = image::open(image_path).map_err(|err| {
        ThumbnailsError::IoError(format!(
            "Failed opening image {} with error: {}",
            image_path.display(),
            &err
        ))
    })?;

    let preview = if image.width() <= target_size.width && image.height() <= target_size.height {
        image
    } else {
        image.thumbnail(target_size.width, target_size.height)
    };

    let mut bytes: Vec<u8> = Vec::new();
    preview
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|err| {
            ThumbnailsError::EncodeError(format!(
                "Failed encoding preview for {} with error: {}",
                image_path.display(),
                &err
            ))
        })?;

    Ok(Preview::new(bytes, preview.width(), preview.height()))
}
