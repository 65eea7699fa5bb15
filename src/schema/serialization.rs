use crate::schema::{PropertyDescriptor, PropertySchema, SchemaError};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid schema: {0}")]
    Schema(#[from] SchemaError),
}

pub type Result<T> = std::result::Result<T, SerializationError>;

pub fn schema_from_json(json: &str) -> Result<PropertySchema> {
    let descriptors: Vec<PropertyDescriptor> = serde_json::from_str(json)?;
    Ok(PropertySchema::new(descriptors)?)
}

pub fn schema_to_json(schema: &PropertySchema) -> Result<String> {
    Ok(serde_json::to_string_pretty(schema.descriptors())?)
}

pub fn save_schema_to_file(schema: &PropertySchema, path: &Path) -> Result<()> {
    let json = schema_to_json(schema)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_schema_from_file(path: &Path) -> Result<PropertySchema> {
    let json = std::fs::read_to_string(path)?;
    let schema = schema_from_json(&json)?;
    log::info!(
        "Loaded property schema with {} entries from {}",
        schema.len(),
        path.display()
    );
    Ok(schema)
}
