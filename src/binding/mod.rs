//! Binding between the property schema and a live target.
//!
//! A [`SchemaSnapshot`] is the schema instantiated for one selection. Values
//! flow target → snapshot through the codecs' read pass, and UI edits flow
//! back through [`SelectionSync`], which owns both the selection and the
//! snapshot.

pub mod codec;
mod sync;
mod texture;

pub use codec::{codec_for, CodecError, EditInput, Reading, ValueCodec};
pub use sync::{EditOutcome, SelectionSync};
pub use texture::{TextureLifecycle, TextureOutcome, DEFAULT_PLACEHOLDER_TEXTURE};

use crate::material::{PropertyError, PropertyTarget, PropertyValue};
use crate::render::RenderBackend;
use crate::schema::{PropertyDescriptor, PropertySchema};
use crate::scene::ObjectId;

/// Lookup of live targets by handle. The scene owns the objects; the binding
/// engine only borrows them for the duration of one read or write.
pub trait TargetStore {
    fn target(&self, id: ObjectId) -> Option<&dyn PropertyTarget>;

    fn target_mut(&mut self, id: ObjectId) -> Option<&mut dyn PropertyTarget>;

    /// Human-readable name for logs.
    fn describe(&self, id: ObjectId) -> String {
        id.to_string()
    }
}

/// A resolved storage slot: `name` on `host`, where `host` is either the
/// target or its `parent` sub-object.
pub struct Location<'a> {
    host: &'a dyn PropertyTarget,
    name: &'a str,
}

impl<'a> Location<'a> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn get(&self) -> Option<PropertyValue> {
        self.host.property(self.name)
    }
}

pub struct LocationMut<'a> {
    host: &'a mut dyn PropertyTarget,
    name: &'a str,
}

impl<'a> LocationMut<'a> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn get(&self) -> Option<PropertyValue> {
        self.host.property(self.name)
    }

    pub fn set(&mut self, value: PropertyValue) -> Result<(), PropertyError> {
        self.host.set_property(self.name, value)
    }
}

/// `target[name]` or `target[parent][name]`; `None` when the parent
/// sub-object is absent.
pub fn resolve<'a>(
    target: &'a dyn PropertyTarget,
    name: &'a str,
    parent: Option<&str>,
) -> Option<Location<'a>> {
    let host = match parent {
        Some(parent) => target.child(parent)?,
        None => target,
    };
    Some(Location { host, name })
}

pub fn resolve_mut<'a>(
    target: &'a mut dyn PropertyTarget,
    name: &'a str,
    parent: Option<&str>,
) -> Option<LocationMut<'a>> {
    let host = match parent {
        Some(parent) => target.child_mut(parent)?,
        None => target,
    };
    Some(LocationMut { host, name })
}

/// The schema instantiated for one selected target.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSnapshot {
    target: ObjectId,
    descriptors: Vec<PropertyDescriptor>,
}

impl SchemaSnapshot {
    /// Fresh copy of `schema` with every value at its schema default.
    pub(crate) fn instantiate(schema: &PropertySchema, target: ObjectId) -> Self {
        Self {
            target,
            descriptors: schema.descriptors().to_vec(),
        }
    }

    pub fn target(&self) -> ObjectId {
        self.target
    }

    pub fn descriptors(&self) -> &[PropertyDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, index: usize) -> Option<&PropertyDescriptor> {
        self.descriptors.get(index)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn index_of(&self, name: &str, parent: Option<&str>) -> Option<usize> {
        self.descriptors
            .iter()
            .position(|descriptor| descriptor.addresses(name, parent))
    }

    pub(crate) fn descriptor_mut(&mut self, index: usize) -> Option<&mut PropertyDescriptor> {
        self.descriptors.get_mut(index)
    }

    /// Run every descriptor's codec against `target`. A missing target reads
    /// as if every location were unresolved.
    pub(crate) fn read_all(
        &mut self,
        target: Option<&dyn PropertyTarget>,
        backend: &dyn RenderBackend,
    ) {
        for descriptor in &mut self.descriptors {
            read_into(descriptor, target, backend);
        }
    }

    /// Re-read descriptors nested under the top-level property `parent`.
    pub(crate) fn read_children(
        &mut self,
        parent: &str,
        target: &dyn PropertyTarget,
        backend: &dyn RenderBackend,
    ) {
        for descriptor in &mut self.descriptors {
            if descriptor.parent() == Some(parent) {
                read_into(descriptor, Some(target), backend);
            }
        }
    }
}

fn read_into(
    descriptor: &mut PropertyDescriptor,
    target: Option<&dyn PropertyTarget>,
    backend: &dyn RenderBackend,
) {
    let reading = {
        let location =
            target.and_then(|target| resolve(target, &descriptor.name, descriptor.parent()));
        codec_for(descriptor.kind).read(location, backend)
    };
    reading.apply(descriptor);
}
