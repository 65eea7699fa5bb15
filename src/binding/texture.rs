//! Creating, binding and releasing textures on behalf of texture slots.

use super::{resolve_mut, CodecError};
use crate::material::{PropertyTarget, PropertyValue, TextureId};
use crate::render::RenderBackend;
use crate::schema::{DisplayValue, PropertyDescriptor};

pub const DEFAULT_PLACEHOLDER_TEXTURE: &str = "assets/images/texture2.jpg";

#[derive(Debug, Clone, PartialEq)]
pub enum TextureOutcome {
    /// A new texture was created and bound.
    Bound(TextureId),
    /// The requested source was already bound.
    Kept(TextureId),
    Unbound(TextureId),
    AlreadyUnbound,
    /// The slot's parent sub-object is absent; nothing changed.
    ParentMissing,
    Rejected(CodecError),
}

#[derive(Debug, Clone)]
pub struct TextureLifecycle {
    placeholder: String,
}

impl Default for TextureLifecycle {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_TEXTURE)
    }
}

impl TextureLifecycle {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }

    /// Bind the placeholder texture to an empty slot.
    pub fn enable_default(
        &self,
        target: &mut dyn PropertyTarget,
        backend: &mut dyn RenderBackend,
        descriptor: &mut PropertyDescriptor,
    ) -> TextureOutcome {
        self.bind(target, backend, descriptor, &self.placeholder)
    }

    /// Bind `source` (falling back to the placeholder when blank) or release
    /// whatever the slot holds.
    pub fn set_enabled(
        &self,
        target: &mut dyn PropertyTarget,
        backend: &mut dyn RenderBackend,
        descriptor: &mut PropertyDescriptor,
        enabled: bool,
        source: &str,
    ) -> TextureOutcome {
        if !enabled {
            return self.unbind(target, backend, descriptor);
        }
        let source = match source.trim() {
            "" => self.placeholder.as_str(),
            trimmed => trimmed,
        };
        self.bind(target, backend, descriptor, source)
    }

    fn bind(
        &self,
        target: &mut dyn PropertyTarget,
        backend: &mut dyn RenderBackend,
        descriptor: &mut PropertyDescriptor,
        source: &str,
    ) -> TextureOutcome {
        let Some(mut location) = resolve_mut(target, &descriptor.name, descriptor.parent()) else {
            log::debug!("Cannot bind {}: parent is absent", descriptor.path());
            return TextureOutcome::ParentMissing;
        };

        let previous = match location.get() {
            Some(PropertyValue::Texture(previous)) => previous,
            None => None,
            Some(other) => {
                log::warn!("{} holds a {}, not a texture", descriptor.path(), other.type_name());
                return TextureOutcome::Rejected(CodecError::UnexpectedInput {
                    kind: other.type_name(),
                    input: "texture",
                });
            }
        };

        let outcome = match previous {
            Some(current) if current.url() == source => TextureOutcome::Kept(current.id()),
            previous => {
                let texture = backend.create_placeholder_texture(source);
                let id = texture.id();
                if let Err(err) = location.set(PropertyValue::Texture(Some(texture.clone()))) {
                    backend.release_texture(&texture);
                    log::warn!("Binding {} to {} failed: {}", source, descriptor.path(), err);
                    return TextureOutcome::Rejected(err.into());
                }
                if let Some(previous) = previous {
                    backend.release_texture(&previous);
                }
                log::info!("Bound {} ({}) to {}", source, id, descriptor.path());
                TextureOutcome::Bound(id)
            }
        };

        descriptor.display_value = DisplayValue::Text(source.to_string());
        descriptor.texture_enabled = true;
        outcome
    }

    fn unbind(
        &self,
        target: &mut dyn PropertyTarget,
        backend: &mut dyn RenderBackend,
        descriptor: &mut PropertyDescriptor,
    ) -> TextureOutcome {
        let Some(mut location) = resolve_mut(target, &descriptor.name, descriptor.parent()) else {
            log::debug!("Cannot unbind {}: parent is absent", descriptor.path());
            return TextureOutcome::ParentMissing;
        };

        let outcome = match location.get() {
            Some(PropertyValue::Texture(Some(current))) => {
                if let Err(err) = location.set(PropertyValue::Texture(None)) {
                    log::warn!("Unbinding {} failed: {}", descriptor.path(), err);
                    return TextureOutcome::Rejected(err.into());
                }
                backend.release_texture(&current);
                log::info!("Released {} from {}", current.id(), descriptor.path());
                TextureOutcome::Unbound(current.id())
            }
            _ => TextureOutcome::AlreadyUnbound,
        };

        descriptor.texture_enabled = false;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::PbrMaterial;
    use crate::render::MemoryRenderer;

    #[test]
    fn enable_default_binds_placeholder() {
        let lifecycle = TextureLifecycle::default();
        let mut renderer = MemoryRenderer::new();
        let mut material = PbrMaterial::new("m");
        let mut descriptor = PropertyDescriptor::texture("albedoTexture");

        let outcome = lifecycle.enable_default(&mut material, &mut renderer, &mut descriptor);
        assert!(matches!(outcome, TextureOutcome::Bound(_)));
        assert_eq!(
            material.albedo_texture.as_ref().map(|t| t.url()),
            Some(DEFAULT_PLACEHOLDER_TEXTURE)
        );
        assert!(descriptor.texture_enabled);
        assert_eq!(
            descriptor.display_value,
            DisplayValue::Text(DEFAULT_PLACEHOLDER_TEXTURE.into())
        );
    }

    #[test]
    fn enabling_twice_keeps_one_texture() {
        let lifecycle = TextureLifecycle::default();
        let mut renderer = MemoryRenderer::new();
        let mut material = PbrMaterial::new("m");
        let mut descriptor = PropertyDescriptor::texture("albedoTexture");

        let first = lifecycle.enable_default(&mut material, &mut renderer, &mut descriptor);
        let second = lifecycle.enable_default(&mut material, &mut renderer, &mut descriptor);
        let TextureOutcome::Bound(id) = first else {
            panic!("expected a bound texture, got {:?}", first);
        };
        assert_eq!(second, TextureOutcome::Kept(id));
        assert_eq!(renderer.live_texture_count(), 1);
    }

    #[test]
    fn rebinding_releases_previous_texture() {
        let lifecycle = TextureLifecycle::default();
        let mut renderer = MemoryRenderer::new();
        let mut material = PbrMaterial::new("m");
        let mut descriptor = PropertyDescriptor::texture("bumpTexture");

        lifecycle.set_enabled(&mut material, &mut renderer, &mut descriptor, true, "a.png");
        lifecycle.set_enabled(&mut material, &mut renderer, &mut descriptor, true, "b.png");
        assert_eq!(renderer.live_sources().collect::<Vec<_>>(), vec!["b.png"]);
        assert_eq!(material.bump_texture.as_ref().map(|t| t.url()), Some("b.png"));
    }

    #[test]
    fn disable_releases_and_clears() {
        let lifecycle = TextureLifecycle::new("placeholder.png");
        let mut renderer = MemoryRenderer::new();
        let mut material = PbrMaterial::new("m");
        let mut descriptor = PropertyDescriptor::texture("albedoTexture");

        lifecycle.set_enabled(&mut material, &mut renderer, &mut descriptor, true, "");
        assert_eq!(descriptor.display_value, DisplayValue::Text("placeholder.png".into()));

        let outcome = lifecycle.set_enabled(&mut material, &mut renderer, &mut descriptor, false, "");
        assert!(matches!(outcome, TextureOutcome::Unbound(_)));
        assert!(material.albedo_texture.is_none());
        assert!(!descriptor.texture_enabled);
        assert_eq!(renderer.live_texture_count(), 0);
        // the source stays visible so the slot can be re-enabled
        assert_eq!(descriptor.display_value, DisplayValue::Text("placeholder.png".into()));

        let again = lifecycle.set_enabled(&mut material, &mut renderer, &mut descriptor, false, "");
        assert_eq!(again, TextureOutcome::AlreadyUnbound);
    }

    #[test]
    fn missing_parent_leaves_everything_alone() {
        let lifecycle = TextureLifecycle::default();
        let mut renderer = MemoryRenderer::new();
        let mut material = PbrMaterial::new("m");
        let mut descriptor = PropertyDescriptor::texture("detail").under("albedoTexture");

        let outcome = lifecycle.enable_default(&mut material, &mut renderer, &mut descriptor);
        assert_eq!(outcome, TextureOutcome::ParentMissing);
        assert_eq!(renderer.live_texture_count(), 0);
        assert!(!descriptor.texture_enabled);
    }

    #[test]
    fn non_texture_slot_is_rejected() {
        let lifecycle = TextureLifecycle::default();
        let mut renderer = MemoryRenderer::new();
        let mut material = PbrMaterial::new("m");
        let mut descriptor = PropertyDescriptor::texture("unlit");

        let outcome = lifecycle.enable_default(&mut material, &mut renderer, &mut descriptor);
        assert!(matches!(outcome, TextureOutcome::Rejected(_)));
        assert_eq!(renderer.live_texture_count(), 0);
    }
}
