// File: crates/stockchart-core/src/render.rs
// Summary: Skia CPU raster surfaces and RGBA/PNG readback shared by charts and mounts.

use skia_safe as skia;

use crate::error::{ChartError, Result};

/// RGBA8 pixel buffer (unpremultiplied, row-major, no padding).
#[derive(Clone, Debug)]
pub struct RgbaImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RgbaImage {
    pub fn stride(&self) -> usize { self.width as usize * 4 }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height { return None; }
        let i = y as usize * self.stride() + x as usize * 4;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| ChartError::Encode("pixel buffer does not match dimensions".to_string()))?;
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .map_err(|e| ChartError::Encode(e.to_string()))?;
        Ok(out.into_inner())
    }
}

/// Create a raster surface, let `draw` paint it and read the pixels back.
pub fn rasterize(width: i32, height: i32, draw: impl FnOnce(&skia::Canvas)) -> Result<RgbaImage> {
    let (w, h) = (width.max(1), height.max(1));
    let mut surface = skia::surfaces::raster_n32_premul((w, h))
        .ok_or(ChartError::Surface { width: w, height: h })?;
    draw(surface.canvas());

    let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
    let stride = w as usize * 4;
    let mut pixels = vec![0u8; stride * h as usize];
    if !surface.read_pixels(&info, &mut pixels, stride, (0, 0)) {
        return Err(ChartError::Encode("failed to read back surface pixels".to_string()));
    }
    Ok(RgbaImage { pixels, width: w as u32, height: h as u32 })
}
