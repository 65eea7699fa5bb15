//! Live material objects as seen by the property panel.
//!
//! The renderer owns the real material; the panel only sees it through
//! [`PropertyTarget`], a string-keyed get/set surface with one level of named
//! sub-objects (clear coat, bound textures).

use std::fmt;

/// RGB color with sRGB-encoded channels in 0..=1, as shown in the panel.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color3 {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<glam::Vec3> for Color3 {
    fn from(value: glam::Vec3) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Color3> for glam::Vec3 {
    fn from(value: Color3) -> Self {
        glam::Vec3::new(value.r, value.g, value.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tex#{}", self.0)
    }
}

/// A texture bound to a material slot. Created and released by the render
/// backend; the material only keeps the handle.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureHandle {
    id: TextureId,
    url: String,
    pub u_scale: f64,
    pub v_scale: f64,
}

impl TextureHandle {
    pub fn new(id: TextureId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            u_scale: 1.0,
            v_scale: 1.0,
        }
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// A value stored at a property location.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Color(Color3),
    Number(f64),
    Bool(bool),
    /// `None` is an explicitly unbound texture slot.
    Texture(Option<TextureHandle>),
}

impl PropertyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Color(_) => "color",
            PropertyValue::Number(_) => "number",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Texture(_) => "texture",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropertyError {
    #[error("unknown property: {0}")]
    Unknown(String),
    #[error("property {name} expects {expected}, got {got}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        got: &'static str,
    },
}

/// String-keyed access to a live object's editable state.
pub trait PropertyTarget {
    /// Current value of `name`, or `None` when unknown or unset.
    fn property(&self, name: &str) -> Option<PropertyValue>;

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError>;

    /// Named sub-object, if present.
    fn child(&self, _name: &str) -> Option<&dyn PropertyTarget> {
        None
    }

    fn child_mut(&mut self, _name: &str) -> Option<&mut dyn PropertyTarget> {
        None
    }
}

fn mismatch(name: &str, expected: &'static str, got: &PropertyValue) -> PropertyError {
    PropertyError::TypeMismatch {
        name: name.to_string(),
        expected,
        got: got.type_name(),
    }
}

impl PropertyTarget for TextureHandle {
    fn property(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "uScale" => Some(PropertyValue::Number(self.u_scale)),
            "vScale" => Some(PropertyValue::Number(self.v_scale)),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        let slot = match name {
            "uScale" => &mut self.u_scale,
            "vScale" => &mut self.v_scale,
            _ => return Err(PropertyError::Unknown(name.to_string())),
        };
        match value {
            PropertyValue::Number(v) => {
                *slot = v;
                Ok(())
            }
            other => Err(mismatch(name, "number", &other)),
        }
    }
}

/// Clear coat layer of a PBR material. Always present on the material.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearCoat {
    pub is_enabled: bool,
    pub intensity: f64,
    pub roughness: f64,
    /// Not part of the default layer; only set once edited.
    pub metallic: Option<f64>,
}

impl Default for ClearCoat {
    fn default() -> Self {
        Self {
            is_enabled: false,
            intensity: 1.0,
            roughness: 0.0,
            metallic: None,
        }
    }
}

impl PropertyTarget for ClearCoat {
    fn property(&self, name: &str) -> Option<PropertyValue> {
        match name {
            "isEnabled" => Some(PropertyValue::Bool(self.is_enabled)),
            "intensity" => Some(PropertyValue::Number(self.intensity)),
            "roughness" => Some(PropertyValue::Number(self.roughness)),
            "metallic" => self.metallic.map(PropertyValue::Number),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        match (name, value) {
            ("isEnabled", PropertyValue::Bool(v)) => self.is_enabled = v,
            ("intensity", PropertyValue::Number(v)) => self.intensity = v,
            ("roughness", PropertyValue::Number(v)) => self.roughness = v,
            ("metallic", PropertyValue::Number(v)) => self.metallic = Some(v),
            ("isEnabled", other) => return Err(mismatch(name, "bool", &other)),
            ("intensity" | "roughness" | "metallic", other) => {
                return Err(mismatch(name, "number", &other))
            }
            _ => return Err(PropertyError::Unknown(name.to_string())),
        }
        Ok(())
    }
}

/// Metallic/roughness material with the slots the editor knows about.
#[derive(Debug, Clone, PartialEq)]
pub struct PbrMaterial {
    pub name: String,
    pub albedo_color: Option<Color3>,
    pub albedo_texture: Option<TextureHandle>,
    pub bump_texture: Option<TextureHandle>,
    pub metallic_texture: Option<TextureHandle>,
    pub reflection_texture: Option<TextureHandle>,
    pub metallic: Option<f64>,
    pub roughness: Option<f64>,
    pub unlit: bool,
    pub clear_coat: ClearCoat,
}

impl PbrMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            albedo_color: None,
            albedo_texture: None,
            bump_texture: None,
            metallic_texture: None,
            reflection_texture: None,
            metallic: None,
            roughness: None,
            unlit: false,
            clear_coat: ClearCoat::default(),
        }
    }

    fn texture_slot(&self, name: &str) -> Option<&Option<TextureHandle>> {
        match name {
            "albedoTexture" => Some(&self.albedo_texture),
            "bumpTexture" => Some(&self.bump_texture),
            "metallicTexture" => Some(&self.metallic_texture),
            "reflectionTexture" => Some(&self.reflection_texture),
            _ => None,
        }
    }

    fn texture_slot_mut(&mut self, name: &str) -> Option<&mut Option<TextureHandle>> {
        match name {
            "albedoTexture" => Some(&mut self.albedo_texture),
            "bumpTexture" => Some(&mut self.bump_texture),
            "metallicTexture" => Some(&mut self.metallic_texture),
            "reflectionTexture" => Some(&mut self.reflection_texture),
            _ => None,
        }
    }

    /// Every texture currently bound to this material.
    pub fn bound_textures(&self) -> impl Iterator<Item = &TextureHandle> {
        [
            &self.albedo_texture,
            &self.bump_texture,
            &self.metallic_texture,
            &self.reflection_texture,
        ]
        .into_iter()
        .filter_map(Option::as_ref)
    }
}

impl PropertyTarget for PbrMaterial {
    fn property(&self, name: &str) -> Option<PropertyValue> {
        if let Some(slot) = self.texture_slot(name) {
            return Some(PropertyValue::Texture(slot.clone()));
        }
        match name {
            "albedoColor" => self.albedo_color.map(PropertyValue::Color),
            "metallic" => self.metallic.map(PropertyValue::Number),
            "roughness" => self.roughness.map(PropertyValue::Number),
            "unlit" => Some(PropertyValue::Bool(self.unlit)),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        if let Some(slot) = self.texture_slot_mut(name) {
            return match value {
                PropertyValue::Texture(texture) => {
                    *slot = texture;
                    Ok(())
                }
                other => Err(mismatch(name, "texture", &other)),
            };
        }
        match (name, value) {
            ("albedoColor", PropertyValue::Color(c)) => self.albedo_color = Some(c),
            ("metallic", PropertyValue::Number(v)) => self.metallic = Some(v),
            ("roughness", PropertyValue::Number(v)) => self.roughness = Some(v),
            ("unlit", PropertyValue::Bool(v)) => self.unlit = v,
            ("albedoColor", other) => return Err(mismatch(name, "color", &other)),
            ("metallic" | "roughness", other) => return Err(mismatch(name, "number", &other)),
            ("unlit", other) => return Err(mismatch(name, "bool", &other)),
            _ => return Err(PropertyError::Unknown(name.to_string())),
        }
        Ok(())
    }

    fn child(&self, name: &str) -> Option<&dyn PropertyTarget> {
        if name == "clearCoat" {
            return Some(&self.clear_coat);
        }
        self.texture_slot(name)?
            .as_ref()
            .map(|texture| texture as &dyn PropertyTarget)
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut dyn PropertyTarget> {
        if name == "clearCoat" {
            return Some(&mut self.clear_coat);
        }
        self.texture_slot_mut(name)?
            .as_mut()
            .map(|texture| texture as &mut dyn PropertyTarget)
    }
}
