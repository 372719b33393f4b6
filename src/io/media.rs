// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading (images and videos).
//!
//! This module loads still images to draw the overlay on, and provides
//! frame sources for the pose detection loop. Video decoding is only
//! available with the `video-opencv` feature.

use crate::playback::FrameSource;
use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::Path;

/// A decoded image ready for upload as a texture.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// Unmultiplied RGBA8 pixels, row major.
    pub pixels: Vec<u8>,
}

impl LoadedImage {
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: image.into_raw(),
        }
    }
}

/// Load an image file as RGBA8.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let image = image::open(path)
        .with_context(|| format!("opening {}", path.display()))?
        .to_rgba8();
    Ok(LoadedImage::from_rgba(image))
}

/// Serves the same still image for every playback time.
pub struct StillFrameSource {
    frame: RgbaImage,
}

impl StillFrameSource {
    pub fn new(frame: RgbaImage) -> Self {
        Self { frame }
    }

    pub fn open(path: &Path) -> Result<Self> {
        let frame = image::open(path)
            .with_context(|| format!("opening {}", path.display()))?
            .to_rgba8();
        Ok(Self::new(frame))
    }
}

impl FrameSource for StillFrameSource {
    fn frame_at(&mut self, _t: f64) -> Result<RgbaImage> {
        Ok(self.frame.clone())
    }
}

#[cfg(feature = "video-opencv")]
pub use video::VideoFrameSource;

#[cfg(feature = "video-opencv")]
mod video {
    use crate::playback::FrameSource;
    use anyhow::{anyhow, Result};
    use image::RgbaImage;
    use opencv::core::Mat;
    use opencv::prelude::*;
    use opencv::{imgproc, videoio};
    use std::path::Path;

    /// Seeks a video file and decodes single frames.
    pub struct VideoFrameSource {
        capture: videoio::VideoCapture,
    }

    impl VideoFrameSource {
        pub fn open(path: &Path) -> Result<Self> {
            let name = path.to_string_lossy();
            let capture = videoio::VideoCapture::from_file(&name, videoio::CAP_ANY)?;
            if !capture.is_opened()? {
                return Err(anyhow!("cannot open video {}", path.display()));
            }
            Ok(Self { capture })
        }
    }

    impl FrameSource for VideoFrameSource {
        fn frame_at(&mut self, t: f64) -> Result<RgbaImage> {
            self.capture.set(videoio::CAP_PROP_POS_MSEC, t * 1000.0)?;
            let mut bgr = Mat::default();
            if !self.capture.read(&mut bgr)? || bgr.empty() {
                return Err(anyhow!("no frame at {:.3}s", t));
            }
            let mut rgba = Mat::default();
            imgproc::cvt_color(&bgr, &mut rgba, imgproc::COLOR_BGR2RGBA, 0)?;
            let width = rgba.cols() as u32;
            let height = rgba.rows() as u32;
            let bytes = rgba.data_bytes()?.to_vec();
            RgbaImage::from_raw(width, height, bytes)
                .ok_or_else(|| anyhow!("frame buffer size mismatch at {:.3}s", t))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    #[test]
    fn test_load_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frame.png");
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (3, 2));
        assert_eq!(loaded.pixels.len(), 3 * 2 * 4);
        // Row 1, column 2 of a 3-wide image.
        let offset = (3 + 2) * 4;
        assert_eq!(&loaded.pixels[offset..offset + 4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_load_missing_image() {
        let dir = TempDir::new().unwrap();
        assert!(load_image(&dir.path().join("missing.png")).is_err());
    }

    #[test]
    fn test_still_source_ignores_time() {
        let mut source = StillFrameSource::new(RgbaImage::new(2, 2));
        assert_eq!(source.frame_at(0.0).unwrap().dimensions(), (2, 2));
        assert_eq!(source.frame_at(90.0).unwrap().dimensions(), (2, 2));
    }
}
