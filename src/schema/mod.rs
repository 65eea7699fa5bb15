//! Declarative description of the editable material properties.

pub mod serialization;

use std::collections::HashSet;
use std::fmt;

/// Value kind of an editable property; selects the codec used to bind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PropertyKind {
    Color,
    TextureRef,
    Number,
    Boolean,
}

impl PropertyKind {
    pub fn label(self) -> &'static str {
        match self {
            PropertyKind::Color => "color",
            PropertyKind::TextureRef => "texture",
            PropertyKind::Number => "number",
            PropertyKind::Boolean => "boolean",
        }
    }
}

/// What the panel shows for one property. `Empty` means nothing could be read.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DisplayValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl DisplayValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, DisplayValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DisplayValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            DisplayValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DisplayValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Empty => Ok(()),
            DisplayValue::Text(text) => f.write_str(text),
            DisplayValue::Number(value) => write!(f, "{}", value),
            DisplayValue::Bool(value) => write!(f, "{}", value),
        }
    }
}

/// One editable property and where it lives on the target.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub kind: PropertyKind,
    /// Sub-object holding the property; `None` means the target itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub display_value: DisplayValue,
    #[serde(default)]
    pub texture_enabled: bool,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            label: None,
            display_value: DisplayValue::Empty,
            texture_enabled: false,
        }
    }

    pub fn color(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Color)
    }

    pub fn texture(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::TextureRef)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Boolean)
    }

    pub fn under(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_default(mut self, value: DisplayValue) -> Self {
        self.display_value = value;
        self
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// `parent.name` or plain `name`.
    pub fn path(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{}.{}", parent, self.name),
            None => self.name.clone(),
        }
    }

    pub fn addresses(&self, name: &str, parent: Option<&str>) -> bool {
        self.name == name && self.parent() == parent
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("property #{index} has an empty name")]
    EmptyName { index: usize },
    #[error("property {name} has an empty parent")]
    EmptyParent { name: String },
    #[error("property {name} names itself as its parent")]
    SelfParent { name: String },
    #[error("duplicate property location: {0}")]
    DuplicateLocation(String),
}

/// Ordered, immutable list of descriptors shared by every selection.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    descriptors: Vec<PropertyDescriptor>,
}

impl PropertySchema {
    pub fn new(descriptors: Vec<PropertyDescriptor>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for (index, descriptor) in descriptors.iter().enumerate() {
            if !is_identifier(&descriptor.name) {
                return Err(SchemaError::EmptyName { index });
            }
            if let Some(parent) = descriptor.parent() {
                if !is_identifier(parent) {
                    return Err(SchemaError::EmptyParent {
                        name: descriptor.name.clone(),
                    });
                }
                if parent == descriptor.name {
                    return Err(SchemaError::SelfParent {
                        name: descriptor.name.clone(),
                    });
                }
            }
            if !seen.insert((descriptor.parent.clone(), descriptor.name.clone())) {
                return Err(SchemaError::DuplicateLocation(descriptor.path()));
            }
        }
        Ok(Self { descriptors })
    }

    pub fn descriptors(&self) -> &[PropertyDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Material panel layout of the scene editor.
    pub fn default_material() -> Self {
        let descriptors = vec![
            PropertyDescriptor::color("albedoColor").labeled("Albedo color"),
            PropertyDescriptor::texture("albedoTexture").labeled("Albedo texture"),
            PropertyDescriptor::number("uScale").under("albedoTexture"),
            PropertyDescriptor::number("vScale").under("albedoTexture"),
            PropertyDescriptor::texture("bumpTexture").labeled("Bump texture"),
            PropertyDescriptor::number("uScale").under("bumpTexture"),
            PropertyDescriptor::number("vScale").under("bumpTexture"),
            PropertyDescriptor::boolean("isEnabled").under("clearCoat"),
            PropertyDescriptor::number("metallic")
                .under("clearCoat")
                .with_default(DisplayValue::Number(0.0)),
            PropertyDescriptor::number("roughness")
                .under("clearCoat")
                .with_default(DisplayValue::Number(1.0)),
            PropertyDescriptor::number("intensity")
                .under("clearCoat")
                .with_default(DisplayValue::Number(1.0)),
            PropertyDescriptor::boolean("unlit").labeled("Unlit"),
        ];
        Self { descriptors }
    }
}

fn is_identifier(value: &str) -> bool {
    !value.trim().is_empty() && !value.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_material_schema_is_valid() {
        let schema = PropertySchema::default_material();
        let rebuilt = PropertySchema::new(schema.descriptors().to_vec()).unwrap();
        assert_eq!(rebuilt, schema);
        assert_eq!(schema.len(), 12);
        assert_eq!(schema.descriptors()[2].path(), "albedoTexture.uScale");
        assert_eq!(schema.descriptors()[5].path(), "bumpTexture.uScale");
    }

    #[test]
    fn duplicate_location_is_rejected() {
        let err = PropertySchema::new(vec![
            PropertyDescriptor::number("uScale").under("albedoTexture"),
            PropertyDescriptor::number("uScale").under("albedoTexture"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateLocation("albedoTexture.uScale".to_string())
        );
    }

    #[test]
    fn same_name_under_different_parents_is_allowed() {
        let schema = PropertySchema::new(vec![
            PropertyDescriptor::number("uScale"),
            PropertyDescriptor::number("uScale").under("bumpTexture"),
        ])
        .unwrap();
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn malformed_names_are_rejected() {
        assert_eq!(
            PropertySchema::new(vec![PropertyDescriptor::number("  ")]).unwrap_err(),
            SchemaError::EmptyName { index: 0 }
        );
        assert!(matches!(
            PropertySchema::new(vec![PropertyDescriptor::number("a").under("")]),
            Err(SchemaError::EmptyParent { .. })
        ));
        assert!(matches!(
            PropertySchema::new(vec![PropertyDescriptor::number("a").under("a")]),
            Err(SchemaError::SelfParent { .. })
        ));
    }

    #[test]
    fn display_name_prefers_label() {
        let plain = PropertyDescriptor::boolean("unlit");
        assert_eq!(plain.display_name(), "unlit");
        assert_eq!(plain.labeled("Unlit").display_name(), "Unlit");
    }

    #[test]
    fn display_value_formats_like_the_panel_shows_it() {
        assert_eq!(DisplayValue::Empty.to_string(), "");
        assert_eq!(DisplayValue::Number(5.0).to_string(), "5");
        assert_eq!(DisplayValue::Number(0.25).to_string(), "0.25");
        assert_eq!(DisplayValue::Bool(true).to_string(), "true");
        assert_eq!(DisplayValue::Text("#FFC356".into()).to_string(), "#FFC356");
    }
}
