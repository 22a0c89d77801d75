//! Asset Provider: resolves semantic keys to decoded visuals and memoizes them
//! for the lifetime of the provider.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::ImageReader;
use thiserror::Error;
use tracing::debug;

use crate::asset_keys::{validate_asset_key, AssetKeyError};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset '{key}' has an invalid key: {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: AssetKeyError,
    },
    #[error("asset '{key}' could not be opened at {path}: {source}")]
    Open {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("asset '{key}' could not be decoded from {path}: {source}")]
    Decode {
        key: String,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("asset '{key}' requested an animation with zero frames")]
    EmptyAnimation { key: String },
}

impl AssetError {
    pub fn key(&self) -> &str {
        match self {
            Self::InvalidKey { key, .. }
            | Self::Open { key, .. }
            | Self::Decode { key, .. }
            | Self::EmptyAnimation { key } => key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VisualParams {
    Still,
    Animated {
        variant: String,
        frames: u32,
        ticks_per_frame: u32,
    },
}

impl VisualParams {
    pub fn animated(variant: impl Into<String>, frames: u32, ticks_per_frame: u32) -> Self {
        Self::Animated {
            variant: variant.into(),
            frames,
            ticks_per_frame,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisualKey {
    pub key: String,
    pub params: VisualParams,
}

/// Decoded RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Sprite {
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (rgba.len() == expected).then_some(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        Self {
            width,
            height,
            rgba: color.repeat(pixel_count),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba.get(offset..offset + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<Sprite>,
    ticks_per_frame: u32,
}

impl Animation {
    pub fn new(frames: Vec<Sprite>, ticks_per_frame: u32) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        Some(Self {
            frames,
            ticks_per_frame: ticks_per_frame.max(1),
        })
    }

    pub fn first_frame(&self) -> &Sprite {
        &self.frames[0]
    }

    pub fn frame_at(&self, tick: u64) -> &Sprite {
        let index = (tick / self.ticks_per_frame as u64) % self.frames.len() as u64;
        &self.frames[index as usize]
    }
}

/// Opaque renderable handed out by the provider. Cloning shares the pixels.
#[derive(Debug, Clone)]
pub enum Visual {
    Still(Arc<Sprite>),
    Animation(Arc<Animation>),
}

impl Visual {
    pub fn placeholder(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::Still(Arc::new(Sprite::solid(width, height, color)))
    }

    /// Frame to show at `tick`; stills ignore the tick.
    pub fn frame(&self, tick: u64) -> &Sprite {
        match self {
            Self::Still(sprite) => sprite,
            Self::Animation(animation) => animation.frame_at(tick),
        }
    }

    pub fn rest_frame(&self) -> &Sprite {
        match self {
            Self::Still(sprite) => sprite,
            Self::Animation(animation) => animation.first_frame(),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        let sprite = self.rest_frame();
        (sprite.width(), sprite.height())
    }

    pub fn shares_pixels_with(&self, other: &Visual) -> bool {
        match (self, other) {
            (Self::Still(a), Self::Still(b)) => Arc::ptr_eq(a, b),
            (Self::Animation(a), Self::Animation(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Seam between gameplay construction code and asset storage.
pub trait AssetLookup {
    fn lookup(&mut self, key: &str, params: &VisualParams) -> Result<Visual, AssetError>;

    fn image(&mut self, key: &str) -> Result<Visual, AssetError> {
        self.lookup(key, &VisualParams::Still)
    }
}

#[derive(Debug)]
pub struct AssetProvider {
    sprite_root: PathBuf,
    cache: HashMap<VisualKey, Visual>,
}

impl AssetProvider {
    pub fn new(asset_root: &Path) -> Self {
        Self {
            sprite_root: asset_root.join("base").join("sprites"),
            cache: HashMap::new(),
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    fn load(&self, key: &str, params: &VisualParams) -> Result<Visual, AssetError> {
        validate_asset_key(key).map_err(|source| AssetError::InvalidKey {
            key: key.to_string(),
            source,
        })?;
        match params {
            VisualParams::Still => {
                let path = self.sprite_root.join(format!("{key}.png"));
                let sprite = load_sprite_rgba(key, &path)?;
                Ok(Visual::Still(Arc::new(sprite)))
            }
            VisualParams::Animated {
                variant,
                frames,
                ticks_per_frame,
            } => {
                validate_asset_key(variant).map_err(|source| AssetError::InvalidKey {
                    key: format!("{key}:{variant}"),
                    source,
                })?;
                let sprites = (0..*frames)
                    .map(|index| {
                        let path = self
                            .sprite_root
                            .join(key)
                            .join(format!("{variant}_{index}.png"));
                        load_sprite_rgba(key, &path)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let animation = Animation::new(sprites, *ticks_per_frame).ok_or_else(|| {
                    AssetError::EmptyAnimation {
                        key: key.to_string(),
                    }
                })?;
                Ok(Visual::Animation(Arc::new(animation)))
            }
        }
    }
}

impl AssetLookup for AssetProvider {
    fn lookup(&mut self, key: &str, params: &VisualParams) -> Result<Visual, AssetError> {
        let cache_key = VisualKey {
            key: key.to_string(),
            params: params.clone(),
        };
        if let Some(visual) = self.cache.get(&cache_key) {
            return Ok(visual.clone());
        }
        let visual = self.load(key, params)?;
        debug!(asset_key = key, params = ?params, "asset_loaded");
        self.cache.insert(cache_key, visual.clone());
        Ok(visual)
    }
}

fn load_sprite_rgba(key: &str, path: &Path) -> Result<Sprite, AssetError> {
    let reader = ImageReader::open(path).map_err(|source| AssetError::Open {
        key: key.to_string(),
        path: path.to_path_buf(),
        source,
    })?;
    let decoded = reader.decode().map_err(|source| AssetError::Decode {
        key: key.to_string(),
        path: path.to_path_buf(),
        source,
    })?;
    let image = decoded.to_rgba8();
    Ok(Sprite {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}
