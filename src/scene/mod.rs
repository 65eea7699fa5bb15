use crate::binding::TargetStore;
use crate::material::{Color3, PbrMaterial, PropertyTarget};
use crate::render::RenderBackend;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshShape {
    Sphere,
    Box,
    Cylinder,
    Ground,
}

/// A mesh in the scene with its world bounds and optional material.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub shape: MeshShape,
    pub center: [f32; 3],
    pub extent: [f32; 3],
    pub material: Option<PbrMaterial>,
}

#[derive(Debug, Default)]
pub struct SceneState {
    objects: Vec<SceneObject>,
    next_id: u32,
}

impl SceneState {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
        }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    pub fn add_object(
        &mut self,
        name: &str,
        shape: MeshShape,
        center: [f32; 3],
        extent: [f32; 3],
        material: Option<PbrMaterial>,
    ) -> ObjectId {
        let id = ObjectId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.objects.push(SceneObject {
            id,
            name: name.to_string(),
            shape,
            center,
            extent,
            material,
        });
        id
    }

    /// Remove an object and release the textures its material still binds.
    pub fn remove_object(
        &mut self,
        id: ObjectId,
        backend: &mut dyn RenderBackend,
    ) -> Option<SceneObject> {
        let index = self.objects.iter().position(|object| object.id == id)?;
        let object = self.objects.remove(index);
        if let Some(material) = &object.material {
            for texture in material.bound_textures() {
                backend.release_texture(texture);
            }
        }
        log::info!("Removed {} ({:?} {})", object.name, object.shape, id);
        Some(object)
    }

    /// The starter scene: three shaded primitives on a ground plane. The
    /// ground carries no material.
    pub fn demo(backend: &mut dyn RenderBackend) -> Self {
        let mut scene = Self::new();

        let mut sphere = gold_material("sphereMat");
        sphere.reflection_texture =
            Some(backend.create_placeholder_texture("/textures/environment.dds"));
        sphere.metallic_texture = Some(backend.create_placeholder_texture("/textures/mr.jpg"));
        scene.add_object(
            "sphere1",
            MeshShape::Sphere,
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 1.0],
            Some(sphere),
        );
        scene.add_object(
            "box1",
            MeshShape::Box,
            [3.0, 1.0, 0.0],
            [1.0, 1.0, 1.0],
            Some(gold_material("boxMat")),
        );
        scene.add_object(
            "cylinder",
            MeshShape::Cylinder,
            [-3.0, 1.0, 0.0],
            [0.5, 1.0, 0.5],
            Some(gold_material("cylinderMat")),
        );
        scene.add_object(
            "ground",
            MeshShape::Ground,
            [0.0, 0.0, 0.0],
            [3.0, 0.0, 3.0],
            None,
        );

        log::info!("Demo scene ready with {} objects", scene.objects.len());
        scene
    }
}

fn gold_material(name: &str) -> PbrMaterial {
    let mut material = PbrMaterial::new(name);
    material.albedo_color = Some(Color3::new(1.0, 0.766, 0.336));
    material.metallic = Some(1.0);
    material.roughness = Some(1.0);
    material
}

impl TargetStore for SceneState {
    fn target(&self, id: ObjectId) -> Option<&dyn PropertyTarget> {
        self.object(id)?
            .material
            .as_ref()
            .map(|material| material as &dyn PropertyTarget)
    }

    fn target_mut(&mut self, id: ObjectId) -> Option<&mut dyn PropertyTarget> {
        self.object_mut(id)?
            .material
            .as_mut()
            .map(|material| material as &mut dyn PropertyTarget)
    }

    fn describe(&self, id: ObjectId) -> String {
        match self.object(id) {
            Some(object) => format!("{} ({:?} {})", object.name, object.shape, id),
            None => id.to_string(),
        }
    }
}
