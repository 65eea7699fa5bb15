//! Selection state and the edit path back into the live target.

use std::sync::Arc;

use super::{
    codec_for, CodecError, EditInput, SchemaSnapshot, TargetStore, TextureLifecycle,
    TextureOutcome,
};
use crate::render::RenderBackend;
use crate::schema::{PropertyKind, PropertySchema};
use crate::scene::ObjectId;

/// What happened to a single edit. Edits never fail loudly; the panel keeps
/// running whatever the outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Applied,
    /// The parent sub-object is absent. The target is untouched but the panel
    /// still shows the entered value.
    ParentMissing,
    Texture(TextureOutcome),
    Rejected(CodecError),
    NoSelection,
    /// The selected object no longer exists or has nothing to edit.
    TargetUnavailable,
    UnknownProperty(usize),
}

enum TextureRequest<'a> {
    EnableDefault,
    SetEnabled { enabled: bool, source: Option<&'a str> },
}

/// Owns the current selection and its snapshot.
pub struct SelectionSync {
    schema: Arc<PropertySchema>,
    textures: TextureLifecycle,
    snapshot: Option<SchemaSnapshot>,
    generation: u64,
}

impl SelectionSync {
    pub fn new(schema: Arc<PropertySchema>, textures: TextureLifecycle) -> Self {
        Self {
            schema,
            textures,
            snapshot: None,
            generation: 0,
        }
    }

    pub fn selection(&self) -> Option<ObjectId> {
        self.snapshot.as_ref().map(SchemaSnapshot::target)
    }

    /// The published snapshot; `None` while nothing is selected.
    pub fn snapshot(&self) -> Option<&SchemaSnapshot> {
        self.snapshot.as_ref()
    }

    /// Bumped every time a new snapshot is published.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn descriptor_index(&self, name: &str, parent: Option<&str>) -> Option<usize> {
        self.snapshot.as_ref()?.index_of(name, parent)
    }

    /// Replace the selection. `None` deselects.
    pub fn on_select(
        &mut self,
        store: &dyn TargetStore,
        backend: &dyn RenderBackend,
        target: Option<ObjectId>,
    ) {
        let Some(id) = target else {
            if self.snapshot.take().is_some() {
                log::info!("Selection cleared");
                self.generation += 1;
            }
            return;
        };

        let mut snapshot = SchemaSnapshot::instantiate(&self.schema, id);
        let live = store.target(id);
        if live.is_none() {
            log::debug!("{} has no editable target", store.describe(id));
        }
        snapshot.read_all(live, backend);

        self.snapshot = Some(snapshot);
        self.generation += 1;
        log::info!("Selected {}", store.describe(id));
    }

    /// Re-read the current selection into a fresh snapshot.
    pub fn refresh(&mut self, store: &dyn TargetStore, backend: &dyn RenderBackend) {
        let selection = self.selection();
        if selection.is_some() {
            self.on_select(store, backend, selection);
        }
    }

    /// Apply a panel edit to the descriptor at `index`.
    pub fn on_edit(
        &mut self,
        store: &mut dyn TargetStore,
        backend: &mut dyn RenderBackend,
        index: usize,
        input: EditInput,
    ) -> EditOutcome {
        let Some(snapshot) = self.snapshot.as_mut() else {
            return EditOutcome::NoSelection;
        };
        let id = snapshot.target();
        let Some(descriptor) = snapshot.descriptor_mut(index) else {
            return EditOutcome::UnknownProperty(index);
        };

        if descriptor.kind == PropertyKind::TextureRef {
            let request = match &input {
                EditInput::Bool(enabled) => TextureRequest::SetEnabled {
                    enabled: *enabled,
                    source: None,
                },
                EditInput::Text(source) => TextureRequest::SetEnabled {
                    enabled: true,
                    source: Some(source.as_str()),
                },
                EditInput::Number(_) => {
                    let err = CodecError::UnexpectedInput {
                        kind: PropertyKind::TextureRef.label(),
                        input: "number",
                    };
                    log::warn!("Rejected edit of {}: {}", descriptor.path(), err);
                    return EditOutcome::Rejected(err);
                }
            };
            return self.texture_request(store, backend, index, request);
        }

        let codec = codec_for(descriptor.kind);
        let (display, value) = match codec.decode(&input, backend) {
            Ok(decoded) => decoded,
            Err(err) => {
                log::warn!("Rejected edit of {}: {}", descriptor.path(), err);
                return EditOutcome::Rejected(err);
            }
        };

        let Some(target) = store.target_mut(id) else {
            log::warn!("Edit of {} dropped: {} is unavailable", descriptor.path(), id);
            return EditOutcome::TargetUnavailable;
        };

        let outcome = match super::resolve_mut(target, &descriptor.name, descriptor.parent()) {
            Some(location) => match codec.write(location, value) {
                Ok(()) => EditOutcome::Applied,
                Err(err) => {
                    log::warn!("Rejected edit of {}: {}", descriptor.path(), err);
                    return EditOutcome::Rejected(err);
                }
            },
            None => {
                log::debug!("{} not written: parent is absent", descriptor.path());
                EditOutcome::ParentMissing
            }
        };

        descriptor.display_value = display;
        outcome
    }

    /// Bind the placeholder texture to the texture property at `index`.
    pub fn enable_default_texture(
        &mut self,
        store: &mut dyn TargetStore,
        backend: &mut dyn RenderBackend,
        index: usize,
    ) -> EditOutcome {
        self.texture_request(store, backend, index, TextureRequest::EnableDefault)
    }

    /// Toggle the texture property at `index`. Enabling without a `source`
    /// reuses the path the panel currently shows.
    pub fn set_texture_enabled(
        &mut self,
        store: &mut dyn TargetStore,
        backend: &mut dyn RenderBackend,
        index: usize,
        enabled: bool,
        source: Option<&str>,
    ) -> EditOutcome {
        self.texture_request(
            store,
            backend,
            index,
            TextureRequest::SetEnabled { enabled, source },
        )
    }

    fn texture_request(
        &mut self,
        store: &mut dyn TargetStore,
        backend: &mut dyn RenderBackend,
        index: usize,
        request: TextureRequest<'_>,
    ) -> EditOutcome {
        let Some(snapshot) = self.snapshot.as_mut() else {
            return EditOutcome::NoSelection;
        };
        let id = snapshot.target();
        let Some(descriptor) = snapshot.descriptor_mut(index) else {
            return EditOutcome::UnknownProperty(index);
        };
        if descriptor.kind != PropertyKind::TextureRef {
            let err = CodecError::UnexpectedInput {
                kind: descriptor.kind.label(),
                input: "texture",
            };
            log::warn!("Rejected texture request on {}: {}", descriptor.path(), err);
            return EditOutcome::Rejected(err);
        }
        let Some(target) = store.target_mut(id) else {
            log::warn!("Texture request on {} dropped: {} is unavailable", descriptor.path(), id);
            return EditOutcome::TargetUnavailable;
        };

        let outcome = match request {
            TextureRequest::EnableDefault => self.textures.enable_default(target, backend, descriptor),
            TextureRequest::SetEnabled { enabled, source } => {
                let source = match source {
                    Some(source) => source.to_string(),
                    None => descriptor
                        .display_value
                        .as_text()
                        .unwrap_or_default()
                        .to_string(),
                };
                self.textures
                    .set_enabled(target, backend, descriptor, enabled, &source)
            }
        };

        // Sub-properties such as uScale live on the texture itself.
        if descriptor.parent.is_none() {
            let name = descriptor.name.clone();
            if let Some(target) = store.target(id) {
                snapshot.read_children(&name, target, backend);
            }
        }

        match outcome {
            TextureOutcome::ParentMissing => EditOutcome::ParentMissing,
            TextureOutcome::Rejected(err) => EditOutcome::Rejected(err),
            other => EditOutcome::Texture(other),
        }
    }
}
