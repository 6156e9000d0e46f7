use std::{io::Cursor, sync::Arc};

use anyhow::{Context, Result, anyhow};
use image::{ImageFormat, RgbaImage};
use resvg::{tiny_skia, usvg};

use crate::fonts::FontSet;

/// Rasterize an SVG document into a `width`×`height` image, scaling the
/// document to fill it, and encode it in `format`.
pub fn render_image(
    svg: &str,
    fonts: &FontSet,
    width: u32,
    height: u32,
    format: ImageFormat,
) -> Result<Vec<u8>> {
    let options = usvg::Options {
        font_family: fonts.family().to_string(),
        fontdb: Arc::new(fonts.database()),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &options).context("Failed to parse SVG")?;
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow!("Invalid image size {}x{}", width, height))?;
    let size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    encode_pixmap(&pixmap, format)
}

pub fn encode_pixmap(pixmap: &tiny_skia::Pixmap, format: ImageFormat) -> Result<Vec<u8>> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    let image = RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .ok_or_else(|| anyhow!("Pixel buffer does not match image size"))?;
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, format).with_context(|| format!("Failed to encode {:?}", format))?;
    Ok(out.into_inner())
}
