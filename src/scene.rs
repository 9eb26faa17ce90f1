//! A small host scene: objects with mesh data, parenting, modifiers,
//! materials, collections and custom properties.
//!
//! Transforms compose as `world = parent_world · parent_inverse · local`.
//! Detaching a child folds the old parent's world matrix into its
//! `parent_inverse`, so a child never has to be decomposed back into
//! location/rotation/scale to keep its placement.

use crate::errors::{ReprimitiveError, Result};
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::params::{PrimitiveFamily, PrimitiveParams};
use crate::shapes::{PrimitiveGenerator, generate_with_cuts};
use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name of the collection a fresh scene links new objects to.
pub const DEFAULT_COLLECTION: &str = "Collection";

/// Custom property keys with this prefix are host bookkeeping and are never
/// carried over to a rebuilt object.
pub const INTERNAL_PROPERTY_PREFIX: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectId(u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Location, rotation and scale of an object relative to its parent space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub location: Point3<Real>,
    pub rotation: UnitQuaternion<Real>,
    pub scale: Vector3<Real>,
}

impl Default for Transform {
    fn default() -> Self {
        Transform {
            location: Point3::origin(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::repeat(1.0),
        }
    }
}

impl Transform {
    pub fn from_location_rotation(location: Point3<Real>, rotation: UnitQuaternion<Real>) -> Self {
        Transform {
            location,
            rotation,
            ..Default::default()
        }
    }

    /// `T · R · S`
    pub fn matrix(&self) -> Matrix4<Real> {
        Matrix4::new_translation(&self.location.coords)
            * self.rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Real(Real),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModifierKind {
    Array,
    Bevel,
    Boolean,
    Mirror,
    Solidify,
    Subdivision,
    /// A kind this crate does not know how to copy settings for
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub name: String,
    pub kind: ModifierKind,
    pub settings: BTreeMap<String, Real>,
    /// Object the modifier reads from (mirror object, boolean operand, ...)
    pub target: Option<ObjectId>,
}

impl Modifier {
    pub fn new(name: impl Into<String>, kind: ModifierKind) -> Self {
        Modifier {
            name: name.into(),
            kind,
            settings: BTreeMap::new(),
            target: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayType {
    #[default]
    Textured,
    Solid,
    Wire,
    Bounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplaySettings {
    pub display_type: DisplayType,
    pub show_wire: bool,
    pub show_in_front: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub name: String,
    pub mesh_name: String,
    /// `None` for empties and other non-mesh objects
    pub mesh: Option<Mesh>,
    pub transform: Transform,
    pub parent: Option<ObjectId>,
    pub parent_inverse: Matrix4<Real>,
    pub modifiers: Vec<Modifier>,
    pub materials: Vec<String>,
    pub collections: BTreeSet<String>,
    pub custom_properties: BTreeMap<String, PropertyValue>,
    pub display: DisplaySettings,
    /// Hidden from the viewport; temporary helper objects are created hidden
    pub hidden: bool,
    pub generate_uvs: bool,
    /// Family recorded by the generator that created the mesh
    pub family_tag: Option<PrimitiveFamily>,
}

impl Object {
    pub fn new(name: impl Into<String>, mesh: Option<Mesh>) -> Self {
        let name = name.into();
        Object {
            mesh_name: name.clone(),
            name,
            mesh,
            transform: Transform::default(),
            parent: None,
            parent_inverse: Matrix4::identity(),
            modifiers: Vec::new(),
            materials: Vec::new(),
            collections: BTreeSet::new(),
            custom_properties: BTreeMap::new(),
            display: DisplaySettings::default(),
            hidden: false,
            generate_uvs: false,
            family_tag: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn local_matrix(&self) -> Matrix4<Real> {
        self.transform.matrix()
    }

    /// Smooth shading as read from the first face.
    pub fn is_smooth(&self) -> bool {
        self.mesh
            .as_ref()
            .and_then(|m| m.faces.first())
            .is_some_and(|f| f.smooth)
    }
}

/// Where [`Scene::set_origin`] moves an object's origin. World geometry is
/// unchanged in every mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OriginMode {
    /// Median of all vertices
    GeometryMedian,
    /// Centroid of the enclosed volume; falls back to the median for open
    /// meshes
    CenterOfVolume,
    /// A world-space point
    Cursor(Point3<Real>),
}

#[derive(Debug, Clone)]
pub struct Scene {
    objects: BTreeMap<ObjectId, Object>,
    next_id: u64,
    /// Collection new objects are linked into
    pub active_collection: String,
    /// Rotation used by [`AlignMode::View`](crate::replace::AlignMode::View)
    pub view_rotation: UnitQuaternion<Real>,
    pub cursor_location: Point3<Real>,
    pub cursor_rotation: UnitQuaternion<Real>,
}

impl Default for Scene {
    fn default() -> Self {
        Scene::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Scene {
            objects: BTreeMap::new(),
            next_id: 1,
            active_collection: DEFAULT_COLLECTION.to_string(),
            view_rotation: UnitQuaternion::identity(),
            cursor_location: Point3::origin(),
            cursor_rotation: UnitQuaternion::identity(),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(&id, _)| id)
    }

    /// `base`, or `base.001`, `base.002`, ... whichever is free first.
    pub fn unique_name(&self, base: &str) -> String {
        if self.find_by_name(base).is_none() {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{base}.{n:03}"))
            .find(|candidate| self.find_by_name(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    /// Insert an object. Names are made unique; an object with no collection
    /// is linked into the active one.
    pub fn add_object(&mut self, mut object: Object) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        object.name = self.unique_name(&object.name);
        if object.collections.is_empty() {
            object.collections.insert(self.active_collection.clone());
        }
        self.objects.insert(id, object);
        id
    }

    /// Generate a primitive (loop cuts included) and add it as a tagged object.
    pub fn add_primitive<G: PrimitiveGenerator + ?Sized>(
        &mut self,
        generator: &G,
        params: &PrimitiveParams,
        transform: Transform,
        generate_uvs: bool,
    ) -> Result<ObjectId> {
        let mesh = generate_with_cuts(generator, params, generate_uvs)?;
        let mut object =
            Object::new(family_name(params.family()), Some(mesh)).with_transform(transform);
        object.generate_uvs = generate_uvs;
        object.family_tag = Some(params.family());
        Ok(self.add_object(object))
    }

    pub fn object(&self, id: ObjectId) -> Result<&Object> {
        self.objects.get(&id).ok_or(ReprimitiveError::MissingObject(id))
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut Object> {
        self.objects
            .get_mut(&id)
            .ok_or(ReprimitiveError::MissingObject(id))
    }

    pub fn mesh(&self, id: ObjectId) -> Result<&Mesh> {
        self.object(id)?
            .mesh
            .as_ref()
            .ok_or(ReprimitiveError::NotAMesh(id))
    }

    pub fn mesh_mut(&mut self, id: ObjectId) -> Result<&mut Mesh> {
        self.object_mut(id)?
            .mesh
            .as_mut()
            .ok_or(ReprimitiveError::NotAMesh(id))
    }

    /// Remove an object together with its mesh data. Children stay where
    /// they are in world space and modifier targets pointing at it are
    /// cleared.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<Object> {
        self.object(id)?;
        for child in self.children_of(id) {
            self.reparent_keep_transform(child, None)?;
        }
        let removed = self
            .objects
            .remove(&id)
            .ok_or(ReprimitiveError::MissingObject(id))?;
        for object in self.objects.values_mut() {
            for modifier in &mut object.modifiers {
                if modifier.target == Some(id) {
                    modifier.target = None;
                }
            }
        }
        Ok(removed)
    }

    pub fn children_of(&self, id: ObjectId) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, object)| object.parent == Some(id))
            .map(|(&child, _)| child)
            .collect()
    }

    pub fn local_matrix(&self, id: ObjectId) -> Result<Matrix4<Real>> {
        Ok(self.object(id)?.local_matrix())
    }

    /// World matrix of the parent chain above `id` (identity at the root),
    /// not including `id`'s own parent inverse.
    pub fn parent_world(&self, id: ObjectId) -> Result<Matrix4<Real>> {
        match self.object(id)?.parent {
            Some(parent) => self.world_matrix(parent),
            None => Ok(Matrix4::identity()),
        }
    }

    pub fn world_matrix(&self, id: ObjectId) -> Result<Matrix4<Real>> {
        let object = self.object(id)?;
        Ok(self.parent_world(id)? * object.parent_inverse * object.local_matrix())
    }

    /// World-space position of the object's origin.
    pub fn world_location(&self, id: ObjectId) -> Result<Point3<Real>> {
        Ok(self.world_matrix(id)?.transform_point(&Point3::origin()))
    }

    /// Mesh vertices in world space.
    pub fn world_vertices(&self, id: ObjectId) -> Result<Vec<Point3<Real>>> {
        let world = self.world_matrix(id)?;
        Ok(self
            .mesh(id)?
            .vertices
            .iter()
            .map(|p| world.transform_point(p))
            .collect())
    }

    /// Bake the selected transform channels into the mesh and reset them.
    /// World geometry does not move.
    pub fn apply_transform(
        &mut self,
        id: ObjectId,
        location: bool,
        rotation: bool,
        scale: bool,
    ) -> Result<()> {
        let object = self.object(id)?;
        let before = object.local_matrix();
        let mut kept = object.transform;
        if location {
            kept.location = Point3::origin();
        }
        if rotation {
            kept.rotation = UnitQuaternion::identity();
        }
        if scale {
            kept.scale = Vector3::repeat(1.0);
        }
        let kept_inverse = kept
            .matrix()
            .try_inverse()
            .ok_or_else(|| degenerate_transform(id))?;
        let bake = kept_inverse * before;

        let object = self.object_mut(id)?;
        object.transform = kept;
        if let Some(mesh) = object.mesh.as_mut() {
            mesh.transform(&bake);
        }
        log::debug!(
            "applied transform of {id} (location {location}, rotation {rotation}, scale {scale})"
        );
        Ok(())
    }

    /// Move the origin without moving the geometry.
    pub fn set_origin(&mut self, id: ObjectId, mode: OriginMode) -> Result<()> {
        let mesh = self.mesh(id)?;
        let local = match mode {
            OriginMode::GeometryMedian => mesh.median(),
            OriginMode::CenterOfVolume => mesh.volume_centroid().unwrap_or_else(|| mesh.median()),
            OriginMode::Cursor(world) => self
                .world_matrix(id)?
                .try_inverse()
                .ok_or_else(|| degenerate_transform(id))?
                .transform_point(&world),
        };
        self.move_origin_local(id, &local)
    }

    /// Move the origin to a point given in mesh coordinates.
    pub(crate) fn move_origin_local(&mut self, id: ObjectId, point: &Point3<Real>) -> Result<()> {
        let object = self.object_mut(id)?;
        let shift = object.local_matrix().transform_point(point) - object.transform.location;
        object.transform.location += shift;
        if let Some(mesh) = object.mesh.as_mut() {
            mesh.translate(&-point.coords);
        }
        Ok(())
    }

    /// Copy modifiers and materials from `from` onto `to`. Modifier kinds
    /// this crate does not understand are linked by name with empty settings.
    pub fn link_modifiers_and_materials(&mut self, from: ObjectId, to: ObjectId) -> Result<()> {
        let source = self.object(from)?;
        let modifiers: Vec<Modifier> = source
            .modifiers
            .iter()
            .map(|modifier| match &modifier.kind {
                ModifierKind::Unknown(kind) => {
                    log::warn!(
                        "modifier '{}' of unknown kind '{kind}' linked without settings",
                        modifier.name
                    );
                    Modifier {
                        settings: BTreeMap::new(),
                        ..modifier.clone()
                    }
                },
                _ => modifier.clone(),
            })
            .collect();
        let materials = source.materials.clone();

        let target = self.object_mut(to)?;
        target.modifiers = modifiers;
        target.materials = materials;
        Ok(())
    }

    /// Point every modifier that reads from `from` at `to` instead. Returns
    /// how many were changed.
    pub fn redirect_modifier_targets(&mut self, from: ObjectId, to: ObjectId) -> usize {
        let mut changed = 0;
        for (&id, object) in &mut self.objects {
            if id == from {
                continue;
            }
            for modifier in &mut object.modifiers {
                if modifier.target == Some(from) {
                    modifier.target = Some(to);
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Attach `child` to `parent` (or detach it with `None`) without moving
    /// it in world space.
    pub fn reparent_keep_transform(
        &mut self,
        child: ObjectId,
        parent: Option<ObjectId>,
    ) -> Result<()> {
        let world = self.world_matrix(child)?;
        let parent_world = match parent {
            Some(p) => self.world_matrix(p)?,
            None => Matrix4::identity(),
        };
        let object = self.object(child)?;
        let local_inverse = object
            .local_matrix()
            .try_inverse()
            .ok_or_else(|| degenerate_transform(child))?;
        let parent_world_inverse = parent_world
            .try_inverse()
            .ok_or_else(|| degenerate_transform(child))?;

        let object = self.object_mut(child)?;
        object.parent = parent;
        object.parent_inverse = parent_world_inverse * world * local_inverse;
        Ok(())
    }

    pub fn link_collection(&mut self, id: ObjectId, collection: &str) -> Result<()> {
        self.object_mut(id)?.collections.insert(collection.to_string());
        Ok(())
    }

    pub fn unlink_collection(&mut self, id: ObjectId, collection: &str) -> Result<()> {
        self.object_mut(id)?.collections.remove(collection);
        Ok(())
    }
}

fn degenerate_transform(id: ObjectId) -> ReprimitiveError {
    ReprimitiveError::DegenerateGeometry(format!("object {id} has a singular transform"))
}

/// Default object name for a family, as the generators name them.
pub fn family_name(family: PrimitiveFamily) -> &'static str {
    match family {
        PrimitiveFamily::Circle => "Circle",
        PrimitiveFamily::Cylinder => "Cylinder",
        PrimitiveFamily::Cone => "Cone",
        PrimitiveFamily::Torus => "Torus",
        PrimitiveFamily::UvSphere => "Sphere",
        PrimitiveFamily::IcoSphere => "Icosphere",
        PrimitiveFamily::Unknown => "Mesh",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_types::FRAC_PI_2;
    use crate::params::{FillType, TorusDimensions, TorusParams};
    use crate::shapes::StandardGenerator;

    fn torus_params() -> PrimitiveParams {
        PrimitiveParams::Torus(TorusParams {
            major_segments: 8,
            minor_segments: 4,
            major_radius: 1.0,
            minor_radius: 0.25,
            mode: TorusDimensions::MajorMinor,
        })
    }

    fn rotated() -> Transform {
        Transform {
            location: Point3::new(1.0, 2.0, 3.0),
            rotation: UnitQuaternion::from_euler_angles(0.4, 0.0, FRAC_PI_2),
            scale: Vector3::new(2.0, 2.0, 2.0),
        }
    }

    #[test]
    fn names_are_made_unique() {
        let mut scene = Scene::new();
        let a = scene.add_object(Object::new("Cube", None));
        let b = scene.add_object(Object::new("Cube", None));
        assert_eq!(scene.object(a).map(|o| o.name.as_str()), Ok("Cube"));
        assert_eq!(scene.object(b).map(|o| o.name.as_str()), Ok("Cube.001"));
        assert!(scene.object(b).is_ok_and(|o| o.collections.contains(DEFAULT_COLLECTION)));
    }

    #[test]
    fn apply_transform_keeps_world_geometry() {
        let mut scene = Scene::new();
        let id = scene
            .add_primitive(&StandardGenerator, &torus_params(), rotated(), false)
            .expect("add");
        let before = scene.world_vertices(id).expect("world");
        scene.apply_transform(id, false, true, false).expect("apply");
        let after = scene.world_vertices(id).expect("world");
        let object = scene.object(id).expect("object");
        assert_eq!(object.transform.rotation, UnitQuaternion::identity());
        assert_eq!(object.transform.location, Point3::new(1.0, 2.0, 3.0));
        for (a, b) in before.iter().zip(&after) {
            assert!((a - b).norm() < 1e-9);
        }
    }

    #[test]
    fn set_origin_keeps_world_geometry() {
        let mut scene = Scene::new();
        let id = scene
            .add_primitive(&StandardGenerator, &torus_params(), rotated(), false)
            .expect("add");
        let before = scene.world_vertices(id).expect("world");
        let target = Point3::new(-1.0, 0.5, 0.0);
        scene.set_origin(id, OriginMode::Cursor(target)).expect("origin");
        assert!((scene.world_location(id).expect("location") - target).norm() < 1e-9);
        let after = scene.world_vertices(id).expect("world");
        for (a, b) in before.iter().zip(&after) {
            assert!((a - b).norm() < 1e-9);
        }
        scene.set_origin(id, OriginMode::GeometryMedian).expect("origin");
        let center = scene.world_location(id).expect("location");
        assert!((center - Point3::new(1.0, 2.0, 3.0)).norm() < 1e-9);
    }

    #[test]
    fn reparenting_keeps_world_matrix() {
        let mut scene = Scene::new();
        let parent = scene.add_object(Object::new("Empty", None).with_transform(rotated()));
        let child = scene
            .add_primitive(
                &StandardGenerator,
                &PrimitiveParams::Circle(crate::params::CircleParams {
                    vertices: 6,
                    radius: 1.0,
                    fill: FillType::NGon,
                }),
                Transform::from_location_rotation(
                    Point3::new(0.0, 1.0, 0.0),
                    UnitQuaternion::identity(),
                ),
                false,
            )
            .expect("add");
        let world = scene.world_matrix(child).expect("world");
        scene.reparent_keep_transform(child, Some(parent)).expect("parent");
        assert_eq!(scene.children_of(parent), vec![child]);
        assert!((scene.world_matrix(child).expect("world") - world).norm() < 1e-9);

        scene.remove_object(parent).expect("remove");
        let object = scene.object(child).expect("child survives");
        assert_eq!(object.parent, None);
        assert!((scene.world_matrix(child).expect("world") - world).norm() < 1e-9);
    }

    #[test]
    fn unknown_modifiers_lose_their_settings() {
        let mut scene = Scene::new();
        let mut source = Object::new("Source", None);
        let mut modifier = Modifier::new("Weld", ModifierKind::Unknown("WELD".into()));
        modifier.settings.insert("distance".into(), 0.1);
        source.modifiers.push(modifier);
        source.materials.push("Steel".into());
        let from = scene.add_object(source);
        let to = scene.add_object(Object::new("Target", None));
        scene.link_modifiers_and_materials(from, to).expect("link");
        let target = scene.object(to).expect("target");
        assert_eq!(target.modifiers.len(), 1);
        assert!(target.modifiers[0].settings.is_empty());
        assert_eq!(target.materials, vec!["Steel".to_string()]);
    }
}
