//! Material Panel - schema-driven property editing for a 3D scene editor
//!
//! A declarative [`schema::PropertySchema`] describes the editable material
//! properties. When the user picks an object, [`binding::SelectionSync`]
//! instantiates the schema into a snapshot, reads the live material into it,
//! and writes panel edits back through per-kind codecs.

pub mod app;
pub mod binding;
pub mod config;
pub mod material;
pub mod render;
pub mod scene;
pub mod schema;
pub mod ui;
