//! Swap an object's mesh for a freshly generated primitive while keeping
//! everything else about the object: placement, parent, children, modifiers,
//! materials, collections and user properties.

use crate::errors::{ReprimitiveError, Result};
use crate::float_types::Real;
use crate::params::PrimitiveParams;
use crate::scene::{
    INTERNAL_PROPERTY_PREFIX, Object, ObjectId, OriginMode, Scene, Transform, family_name,
};
use crate::shapes::{PrimitiveGenerator, generate_with_cuts};
use nalgebra::{Point3, UnitQuaternion};
use std::collections::BTreeMap;

/// Which rotation the rebuilt object gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignMode {
    /// The rotation given in the request
    #[default]
    World,
    /// The scene's view rotation
    View,
    /// The 3D cursor's rotation
    Cursor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceRequest {
    pub params: PrimitiveParams,
    /// Origin of the new primitive in the original's parent space
    pub location: Point3<Real>,
    pub rotation: UnitQuaternion<Real>,
    pub align: AlignMode,
    pub generate_uvs: bool,
    /// World point to move the new object's origin to once it is built
    pub origin: Option<Point3<Real>>,
}

impl ReplaceRequest {
    pub fn new(
        params: PrimitiveParams,
        location: Point3<Real>,
        rotation: UnitQuaternion<Real>,
    ) -> Self {
        ReplaceRequest {
            params,
            location,
            rotation,
            align: AlignMode::World,
            generate_uvs: false,
            origin: None,
        }
    }
}

/// Rebuild `original` from `request` and return the id of the object that
/// replaces it. The new object takes over the original's name.
///
/// Parameters are validated and the mesh is generated before the scene is
/// touched, so a rejected request leaves the scene exactly as it was.
pub fn replace<G: PrimitiveGenerator + ?Sized>(
    scene: &mut Scene,
    generator: &G,
    original: ObjectId,
    request: &ReplaceRequest,
) -> Result<ObjectId> {
    let source = scene.object(original)?;
    let Some(old_mesh) = source.mesh.as_ref() else {
        return Err(ReprimitiveError::NotAMesh(original));
    };
    let mut mesh = generate_with_cuts(generator, &request.params, request.generate_uvs)?;
    mesh.set_smooth(old_mesh.faces.first().is_some_and(|f| f.smooth));

    let rotation = match request.align {
        AlignMode::World => request.rotation,
        AlignMode::View => scene.view_rotation,
        AlignMode::Cursor => scene.cursor_rotation,
    };
    let name = source.name.clone();
    let mesh_name = source.mesh_name.clone();
    let collections = source.collections.clone();
    let properties: BTreeMap<_, _> = source
        .custom_properties
        .iter()
        .filter(|(key, _)| !key.starts_with(INTERNAL_PROPERTY_PREFIX))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let mut object =
        Object::new(family_name(request.params.family()), Some(mesh)).with_transform(Transform {
            location: request.location,
            rotation,
            scale: source.transform.scale,
        });
    object.display = source.display;
    object.parent = source.parent;
    object.parent_inverse = source.parent_inverse;
    object.generate_uvs = request.generate_uvs;
    object.custom_properties = properties;
    object.family_tag = Some(request.params.family());

    let children = scene.children_of(original);
    for &child in &children {
        scene.reparent_keep_transform(child, None)?;
    }

    let replacement = scene.add_object(object);
    scene.link_modifiers_and_materials(original, replacement)?;
    let redirected = scene.redirect_modifier_targets(original, replacement);
    if redirected > 0 {
        log::debug!("redirected {redirected} modifier targets from {original} to {replacement}");
    }

    for &child in &children {
        scene.reparent_keep_transform(child, Some(replacement))?;
    }

    let active = scene.active_collection.clone();
    for collection in &collections {
        scene.link_collection(replacement, collection)?;
    }
    if !collections.contains(&active) {
        scene.unlink_collection(replacement, &active)?;
    }

    scene.remove_object(original)?;
    let rebuilt = scene.object_mut(replacement)?;
    rebuilt.name = name;
    rebuilt.mesh_name = mesh_name;

    if let Some(origin) = request.origin {
        scene.set_origin(replacement, OriginMode::Cursor(origin))?;
    }

    log::info!(
        "replaced {original} with {replacement} ({:?}, {} children kept)",
        request.params.family(),
        children.len()
    );
    Ok(replacement)
}
