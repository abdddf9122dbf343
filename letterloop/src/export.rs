// Copyright 2025 the Letterloop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Writing rendered canvases to PNG and JPEG files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use vello_cpu::Pixmap;

use crate::peniko::Color;
use crate::{Error, Result};

/// JPEG quality used for export.
pub const JPEG_QUALITY: u8 = 92;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Pick a format from the extension of `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(Error::UnknownFormat(ext)),
        }
    }
}

/// Composite the premultiplied `pixmap` over an opaque `background`.
pub fn flatten_onto(pixmap: &Pixmap, background: Color) -> RgbImage {
    let bg = background.to_rgba8();
    let width = u32::from(pixmap.width());
    let data = pixmap.data();
    RgbImage::from_fn(width, u32::from(pixmap.height()), |x, y| {
        let p = data[(y * width + x) as usize];
        let over = |src: u8, dst: u8| {
            let rest = u16::from(dst) * u16::from(255 - p.a);
            u8::try_from(u16::from(src) + (rest + 127) / 255).unwrap_or(u8::MAX)
        };
        Rgb([over(p.r, bg.r), over(p.g, bg.g), over(p.b, bg.b)])
    })
}

/// Encode `pixmap` composited over `background` into `writer`.
pub fn encode_to<W: Write>(
    writer: W,
    pixmap: &Pixmap,
    background: Color,
    format: ImageFormat,
) -> Result<()> {
    let image = flatten_onto(pixmap, background);
    let (width, height) = image.dimensions();
    match format {
        ImageFormat::Png => {
            PngEncoder::new(writer).write_image(&image, width, height, ExtendedColorType::Rgb8)?;
        }
        ImageFormat::Jpeg => JpegEncoder::new_with_quality(writer, JPEG_QUALITY).write_image(
            &image,
            width,
            height,
            ExtendedColorType::Rgb8,
        )?,
    }
    Ok(())
}

pub fn encode(pixmap: &Pixmap, background: Color, format: ImageFormat) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    encode_to(&mut bytes, pixmap, background, format)?;
    Ok(bytes)
}

/// Write `pixmap` to `path`, in the format implied by its extension.
pub fn save(path: &Path, pixmap: &Pixmap, background: Color) -> Result<()> {
    let format = ImageFormat::from_path(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    encode_to(&mut writer, pixmap, background, format)?;
    writer.flush()?;
    log::info!(
        "Wrote {}x{} {format:?} to {}",
        pixmap.width(),
        pixmap.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use vello_cpu::Pixmap;
    use vello_cpu::peniko::color::PremulRgba8;

    use super::{ImageFormat, encode, flatten_onto};
    use crate::Error;
    use crate::peniko::color::palette;

    fn pixmap() -> Pixmap {
        let mut pixmap = Pixmap::new(2, 1);
        let data = pixmap.data_mut();
        // Half-transparent white, premultiplied.
        data[0] = PremulRgba8 {
            r: 128,
            g: 128,
            b: 128,
            a: 128,
        };
        data[1] = PremulRgba8 {
            r: 10,
            g: 20,
            b: 30,
            a: 255,
        };
        pixmap
    }

    #[test]
    fn formats_from_extensions() {
        assert_eq!(
            ImageFormat::from_path(Path::new("out.PNG")).unwrap(),
            ImageFormat::Png
        );
        assert_eq!(
            ImageFormat::from_path(Path::new("a/b.jpeg")).unwrap(),
            ImageFormat::Jpeg
        );
        assert_eq!(
            ImageFormat::from_path(Path::new("b.jpg")).unwrap(),
            ImageFormat::Jpeg
        );
        assert!(matches!(
            ImageFormat::from_path(Path::new("b.gif")),
            Err(Error::UnknownFormat(ext)) if ext == "gif"
        ));
        assert!(ImageFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn flattening_composites_over_the_background() {
        let image = flatten_onto(&pixmap(), palette::css::BLACK);
        assert_eq!(image.dimensions(), (2, 1));
        assert_eq!(image.get_pixel(0, 0).0, [128, 128, 128]);
        assert_eq!(image.get_pixel(1, 0).0, [10, 20, 30]);

        let image = flatten_onto(&pixmap(), palette::css::WHITE);
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [10, 20, 30]);
    }

    #[test]
    fn encoded_files_have_the_right_signature() {
        let png = encode(&pixmap(), palette::css::BLACK, ImageFormat::Png).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let jpeg = encode(&pixmap(), palette::css::BLACK, ImageFormat::Jpeg).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }
}
