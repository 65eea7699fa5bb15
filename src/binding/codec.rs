//! Per-kind conversion between live property values and panel values.

use super::{Location, LocationMut};
use crate::material::{PropertyError, PropertyValue};
use crate::render::RenderBackend;
use crate::schema::{DisplayValue, PropertyDescriptor, PropertyKind};

/// A raw value coming back from a panel control.
#[derive(Debug, Clone, PartialEq)]
pub enum EditInput {
    Text(String),
    Number(f64),
    Bool(bool),
}

impl EditInput {
    /// Interpret a typed command-line token: booleans, then numbers, then text.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw {
            "true" => return EditInput::Bool(true),
            "false" => return EditInput::Bool(false),
            _ => {}
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => EditInput::Number(value),
            _ => EditInput::Text(raw.to_string()),
        }
    }

    fn shape(&self) -> &'static str {
        match self {
            EditInput::Text(_) => "text",
            EditInput::Number(_) => "number",
            EditInput::Bool(_) => "bool",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("invalid hex color: {0:?}")]
    InvalidColor(String),
    #[error("not a number: {0:?}")]
    NotANumber(String),
    #[error("{kind} property cannot take {input} input")]
    UnexpectedInput {
        kind: &'static str,
        input: &'static str,
    },
    #[error("texture properties are edited through the texture lifecycle")]
    TextureManaged,
    #[error(transparent)]
    TypeMismatch(#[from] PropertyError),
}

/// Result of reading one location.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    /// Replace the displayed value.
    Value(DisplayValue),
    /// A texture is bound with this source.
    Texture(String),
    /// Keep whatever the descriptor shows.
    Unchanged,
}

impl Reading {
    pub fn apply(self, descriptor: &mut PropertyDescriptor) {
        match self {
            Reading::Value(value) => descriptor.display_value = value,
            Reading::Texture(source) => {
                descriptor.display_value = DisplayValue::Text(source);
                descriptor.texture_enabled = true;
            }
            Reading::Unchanged => {}
        }
    }
}

pub trait ValueCodec: Sync {
    fn kind(&self) -> PropertyKind;

    /// `location` is `None` when the descriptor's parent is absent.
    fn read(&self, location: Option<Location<'_>>, backend: &dyn RenderBackend) -> Reading;

    /// Turn panel input into the value to echo and the value to store.
    fn decode(
        &self,
        input: &EditInput,
        backend: &dyn RenderBackend,
    ) -> Result<(DisplayValue, PropertyValue), CodecError>;

    fn write(&self, mut location: LocationMut<'_>, value: PropertyValue) -> Result<(), CodecError> {
        location.set(value)?;
        Ok(())
    }

    fn unexpected(&self, input: &EditInput) -> CodecError {
        CodecError::UnexpectedInput {
            kind: self.kind().label(),
            input: input.shape(),
        }
    }
}

pub struct ColorCodec;
pub struct TextureCodec;
pub struct NumberCodec;
pub struct BooleanCodec;

static COLOR: ColorCodec = ColorCodec;
static TEXTURE: TextureCodec = TextureCodec;
static NUMBER: NumberCodec = NumberCodec;
static BOOLEAN: BooleanCodec = BooleanCodec;

pub fn codec_for(kind: PropertyKind) -> &'static dyn ValueCodec {
    match kind {
        PropertyKind::Color => &COLOR,
        PropertyKind::TextureRef => &TEXTURE,
        PropertyKind::Number => &NUMBER,
        PropertyKind::Boolean => &BOOLEAN,
    }
}

fn current(location: Option<Location<'_>>) -> Option<PropertyValue> {
    location.and_then(|location| location.get())
}

impl ValueCodec for ColorCodec {
    fn kind(&self) -> PropertyKind {
        PropertyKind::Color
    }

    fn read(&self, location: Option<Location<'_>>, backend: &dyn RenderBackend) -> Reading {
        match current(location) {
            Some(PropertyValue::Color(color)) => {
                Reading::Value(DisplayValue::Text(backend.color_to_hex(color)))
            }
            _ => Reading::Value(DisplayValue::Empty),
        }
    }

    fn decode(
        &self,
        input: &EditInput,
        backend: &dyn RenderBackend,
    ) -> Result<(DisplayValue, PropertyValue), CodecError> {
        let EditInput::Text(hex) = input else {
            return Err(self.unexpected(input));
        };
        let color = backend
            .color_from_hex(hex)
            .ok_or_else(|| CodecError::InvalidColor(hex.clone()))?;
        Ok((DisplayValue::Text(hex.clone()), PropertyValue::Color(color)))
    }
}

impl ValueCodec for TextureCodec {
    fn kind(&self) -> PropertyKind {
        PropertyKind::TextureRef
    }

    fn read(&self, location: Option<Location<'_>>, _backend: &dyn RenderBackend) -> Reading {
        match current(location) {
            Some(PropertyValue::Texture(Some(texture))) => Reading::Texture(texture.url().to_string()),
            _ => Reading::Unchanged,
        }
    }

    fn decode(
        &self,
        _input: &EditInput,
        _backend: &dyn RenderBackend,
    ) -> Result<(DisplayValue, PropertyValue), CodecError> {
        Err(CodecError::TextureManaged)
    }
}

impl ValueCodec for NumberCodec {
    fn kind(&self) -> PropertyKind {
        PropertyKind::Number
    }

    fn read(&self, location: Option<Location<'_>>, _backend: &dyn RenderBackend) -> Reading {
        match current(location) {
            Some(PropertyValue::Number(value)) => Reading::Value(DisplayValue::Number(value)),
            _ => Reading::Value(DisplayValue::Empty),
        }
    }

    fn decode(
        &self,
        input: &EditInput,
        _backend: &dyn RenderBackend,
    ) -> Result<(DisplayValue, PropertyValue), CodecError> {
        let value = match input {
            EditInput::Number(value) => *value,
            EditInput::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| CodecError::NotANumber(text.clone()))?,
            EditInput::Bool(_) => return Err(self.unexpected(input)),
        };
        if !value.is_finite() {
            return Err(CodecError::NotANumber(value.to_string()));
        }
        Ok((DisplayValue::Number(value), PropertyValue::Number(value)))
    }
}

impl ValueCodec for BooleanCodec {
    fn kind(&self) -> PropertyKind {
        PropertyKind::Boolean
    }

    fn read(&self, location: Option<Location<'_>>, _backend: &dyn RenderBackend) -> Reading {
        match current(location) {
            Some(PropertyValue::Bool(value)) => Reading::Value(DisplayValue::Bool(value)),
            _ => Reading::Value(DisplayValue::Empty),
        }
    }

    fn decode(
        &self,
        input: &EditInput,
        _backend: &dyn RenderBackend,
    ) -> Result<(DisplayValue, PropertyValue), CodecError> {
        let value = match input {
            EditInput::Bool(value) => *value,
            EditInput::Text(text) if text.trim() == "true" => true,
            EditInput::Text(text) if text.trim() == "false" => false,
            _ => return Err(self.unexpected(input)),
        };
        Ok((DisplayValue::Bool(value), PropertyValue::Bool(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{resolve, resolve_mut};
    use crate::material::{Color3, PbrMaterial, TextureHandle, TextureId};
    use crate::render::MemoryRenderer;

    fn read(kind: PropertyKind, material: &PbrMaterial, name: &str, parent: Option<&str>) -> Reading {
        let renderer = MemoryRenderer::new();
        codec_for(kind).read(resolve(material, name, parent), &renderer)
    }

    #[test]
    fn color_reads_as_uppercase_hex() {
        let mut material = PbrMaterial::new("m");
        material.albedo_color = Some(Color3::new(1.0, 0.766, 0.336));
        assert_eq!(
            read(PropertyKind::Color, &material, "albedoColor", None),
            Reading::Value(DisplayValue::Text("#FFC356".into()))
        );
    }

    #[test]
    fn missing_values_read_empty() {
        let material = PbrMaterial::new("m");
        let empty = Reading::Value(DisplayValue::Empty);
        assert_eq!(read(PropertyKind::Color, &material, "albedoColor", None), empty);
        assert_eq!(read(PropertyKind::Number, &material, "uScale", Some("albedoTexture")), empty);
        assert_eq!(read(PropertyKind::Number, &material, "metallic", Some("clearCoat")), empty);
        assert_eq!(
            read(PropertyKind::TextureRef, &material, "albedoTexture", None),
            Reading::Unchanged
        );
    }

    #[test]
    fn mismatched_value_type_reads_empty() {
        let mut material = PbrMaterial::new("m");
        material.metallic = Some(0.3);
        assert_eq!(
            read(PropertyKind::Boolean, &material, "metallic", None),
            Reading::Value(DisplayValue::Empty)
        );
    }

    #[test]
    fn bound_texture_reads_source_and_enables() {
        let mut material = PbrMaterial::new("m");
        material.bump_texture = Some(TextureHandle::new(TextureId(9), "bump.png"));
        let mut descriptor = PropertyDescriptor::texture("bumpTexture");
        read(PropertyKind::TextureRef, &material, "bumpTexture", None).apply(&mut descriptor);
        assert_eq!(descriptor.display_value, DisplayValue::Text("bump.png".into()));
        assert!(descriptor.texture_enabled);
    }

    #[test]
    fn number_accepts_numeric_text_and_rejects_garbage() {
        let renderer = MemoryRenderer::new();
        let codec = codec_for(PropertyKind::Number);
        assert_eq!(
            codec.decode(&EditInput::Text(" 2.5 ".into()), &renderer).unwrap(),
            (DisplayValue::Number(2.5), PropertyValue::Number(2.5))
        );
        assert_eq!(
            codec.decode(&EditInput::Text("abc".into()), &renderer),
            Err(CodecError::NotANumber("abc".into()))
        );
        assert!(matches!(
            codec.decode(&EditInput::Text("NaN".into()), &renderer),
            Err(CodecError::NotANumber(_))
        ));
        assert!(matches!(
            codec.decode(&EditInput::Bool(true), &renderer),
            Err(CodecError::UnexpectedInput { kind: "number", input: "bool" })
        ));
    }

    #[test]
    fn number_is_stored_without_clamping() {
        let renderer = MemoryRenderer::new();
        let codec = codec_for(PropertyKind::Number);
        let mut material = PbrMaterial::new("m");
        let (_, value) = codec.decode(&EditInput::Number(-7.0), &renderer).unwrap();
        codec
            .write(resolve_mut(&mut material, "roughness", None).unwrap(), value)
            .unwrap();
        assert_eq!(material.roughness, Some(-7.0));
    }

    #[test]
    fn invalid_hex_is_rejected() {
        let renderer = MemoryRenderer::new();
        let codec = codec_for(PropertyKind::Color);
        assert_eq!(
            codec.decode(&EditInput::Text("#12345".into()), &renderer),
            Err(CodecError::InvalidColor("#12345".into()))
        );
        assert!(matches!(
            codec.decode(&EditInput::Number(1.0), &renderer),
            Err(CodecError::UnexpectedInput { .. })
        ));
    }

    #[test]
    fn boolean_accepts_checkbox_and_text() {
        let renderer = MemoryRenderer::new();
        let codec = codec_for(PropertyKind::Boolean);
        assert_eq!(
            codec.decode(&EditInput::Text("true".into()), &renderer).unwrap().1,
            PropertyValue::Bool(true)
        );
        assert_eq!(
            codec.decode(&EditInput::Bool(false), &renderer).unwrap().0,
            DisplayValue::Bool(false)
        );
        assert!(codec.decode(&EditInput::Text("yes".into()), &renderer).is_err());
    }

    #[test]
    fn write_surfaces_type_mismatch() {
        let codec = codec_for(PropertyKind::Number);
        let mut material = PbrMaterial::new("m");
        let err = codec
            .write(
                resolve_mut(&mut material, "unlit", None).unwrap(),
                PropertyValue::Number(1.0),
            )
            .unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch(_)));
        assert!(!material.unlit);
    }

    #[test]
    fn texture_codec_defers_to_lifecycle() {
        let renderer = MemoryRenderer::new();
        assert_eq!(
            codec_for(PropertyKind::TextureRef).decode(&EditInput::Bool(true), &renderer),
            Err(CodecError::TextureManaged)
        );
    }

    #[test]
    fn command_tokens_parse_by_shape() {
        assert_eq!(EditInput::parse("true"), EditInput::Bool(true));
        assert_eq!(EditInput::parse("5"), EditInput::Number(5.0));
        assert_eq!(EditInput::parse("#FF0000"), EditInput::Text("#FF0000".into()));
        assert_eq!(EditInput::parse("inf"), EditInput::Text("inf".into()));
    }
}
