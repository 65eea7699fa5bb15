//! Render-side collaborators of the property panel: texture creation, color
//! conversion, camera and pointer picking.

mod camera;
pub mod pick;

pub use camera::CameraController;
pub use pick::{PickHit, PointerButton, PointerEvent, ScenePicker, SelectionSource};

use crate::material::{Color3, TextureHandle, TextureId};
use std::collections::BTreeMap;

/// What the binding engine needs from the rendering engine.
pub trait RenderBackend {
    /// Create a texture resource from an image source path.
    fn create_placeholder_texture(&mut self, source: &str) -> TextureHandle;

    /// Destroy a texture resource that is no longer bound anywhere.
    fn release_texture(&mut self, texture: &TextureHandle);

    /// Parse `#RRGGBB`. `None` for malformed input.
    fn color_from_hex(&self, hex: &str) -> Option<Color3>;

    fn color_to_hex(&self, color: Color3) -> String;
}

/// Uppercase `#RRGGBB`, each channel rounded from `c * 255` and clamped.
pub fn color_to_hex(color: Color3) -> String {
    let [r, g, b] = color.to_array().map(channel_to_byte);
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

pub fn color_from_hex(hex: &str) -> Option<Color3> {
    let digits = hex.trim().strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| -> Option<f32> {
        u8::from_str_radix(&digits[range], 16)
            .ok()
            .map(|value| value as f32 / 255.0)
    };
    Some(Color3::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn channel_to_byte(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// In-process stand-in for the GPU renderer. Tracks live textures so leaks
/// show up as a growing pool.
#[derive(Debug, Default)]
pub struct MemoryRenderer {
    next_texture_id: u64,
    live_textures: BTreeMap<TextureId, String>,
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_texture_count(&self) -> usize {
        self.live_textures.len()
    }

    pub fn is_live(&self, id: TextureId) -> bool {
        self.live_textures.contains_key(&id)
    }

    pub fn live_sources(&self) -> impl Iterator<Item = &str> {
        self.live_textures.values().map(String::as_str)
    }
}

impl RenderBackend for MemoryRenderer {
    fn create_placeholder_texture(&mut self, source: &str) -> TextureHandle {
        self.next_texture_id += 1;
        let id = TextureId(self.next_texture_id);
        self.live_textures.insert(id, source.to_string());
        log::debug!("Created texture {} from {}", id, source);
        TextureHandle::new(id, source)
    }

    fn release_texture(&mut self, texture: &TextureHandle) {
        if self.live_textures.remove(&texture.id()).is_some() {
            log::debug!("Released texture {} ({})", texture.id(), texture.url());
        } else {
            log::warn!("Release of unknown texture {}", texture.id());
        }
    }

    fn color_from_hex(&self, hex: &str) -> Option<Color3> {
        color_from_hex(hex)
    }

    fn color_to_hex(&self, color: Color3) -> String {
        color_to_hex(color)
    }
}
