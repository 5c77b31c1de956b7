//! Where bitmaps come from.
//!
//! The analyzer only ever sees a decoded [`DynamicImage`]; locating the
//! wallpaper or grabbing the screen is left to whatever implements
//! [`BitmapSource`].

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use image::{DynamicImage, GenericImageView};

use crate::error::{Error, Result};

pub trait BitmapSource {
    /// Produce the bitmap to analyze next.
    fn capture(&mut self) -> Result<DynamicImage>;
}

/// A rectangle in pixel coordinates, `x2`/`y2` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Region {
    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1)
    }

    /// Crop `image` to this region, or `None` if the region is empty or does
    /// not fit inside the image.
    pub fn crop(&self, image: &DynamicImage) -> Option<DynamicImage> {
        let (w, h) = image.dimensions();
        if self.width() == 0 || self.height() == 0 || self.x2 > w || self.y2 > h {
            return None;
        }
        Some(image.crop_imm(self.x1, self.y1, self.width(), self.height()))
    }
}

/// Parses `x1,y1,x2,y2`.
impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| Error::InvalidRegion(s.to_string()))?;
        match parts[..] {
            [x1, y1, x2, y2] => Ok(Self { x1, y1, x2, y2 }),
            _ => Err(Error::InvalidRegion(s.to_string())),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x1, self.y1, self.x2, self.y2)
    }
}

/// Decodes an image file on every capture, so a replaced wallpaper is picked
/// up on the next cycle.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
    region: Option<Region>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            region: None,
        }
    }

    pub fn with_region(mut self, region: Option<Region>) -> Self {
        self.region = region;
        self
    }
}

impl BitmapSource for FileSource {
    fn capture(&mut self) -> Result<DynamicImage> {
        let bytes = std::fs::read(&self.path).map_err(|source| Error::Io {
            path: self.path.clone(),
            source,
        })?;
        let image = image::load_from_memory(&bytes)?;
        log::debug!("Loaded {} ({:?})", self.path.display(), image.dimensions());
        Ok(apply_region(image, self.region))
    }
}

/// Serves clones of an already decoded image.
#[derive(Clone, Debug)]
pub struct MemorySource {
    image: DynamicImage,
    region: Option<Region>,
}

impl MemorySource {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            region: None,
        }
    }

    pub fn with_region(mut self, region: Option<Region>) -> Self {
        self.region = region;
        self
    }
}

impl BitmapSource for MemorySource {
    fn capture(&mut self) -> Result<DynamicImage> {
        Ok(apply_region(self.image.clone(), self.region))
    }
}

fn apply_region(image: DynamicImage, region: Option<Region>) -> DynamicImage {
    let Some(region) = region else {
        return image;
    };
    match region.crop(&image) {
        Some(cropped) => cropped,
        None => {
            log::warn!(
                "Capture region {region} does not fit {:?}, using the full image",
                image.dimensions()
            );
            image
        }
    }
}
