//! Transform recovery: where the canonical primitive has to be placed, and
//! how it has to be rotated, to reproduce an object's current geometry.
//!
//! Three paths, picked by what the object still knows about itself:
//!
//! - **baked**: the rotation channel is identity, so any rotation lives in
//!   the vertex data. A twin is generated and rigidly fitted onto the mesh
//!   by index correspondence ([`math::procrustes`]).
//! - **fast**: the rotation channel is intact and there are no loop cuts.
//!   The canonical origin is the vertex median (center of volume shifted by
//!   a quarter of the depth for sharp cones), so moving the origin there is
//!   enough.
//! - **cut**: the rotation channel is intact but loop cuts shifted the
//!   median. Vertex 0 of a twin placed at the object's transform gives the
//!   offset directly.

use crate::errors::{ReprimitiveError, Result};
use crate::float_types::{Real, tolerance};
use crate::math;
use crate::mesh::edit::DeleteMode;
use crate::params::{ConeEnd, PrimitiveParams};
use crate::scene::{Object, ObjectId, OriginMode, Scene, Transform};
use crate::shapes::PrimitiveGenerator;
use nalgebra::{Point3, UnitQuaternion, Vector3};

/// Where the rebuilt primitive goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecoveredTransform {
    /// Origin of the canonical primitive, in the object's parent space
    pub location: Point3<Real>,
    pub rotation: UnitQuaternion<Real>,
    /// The rotation had been applied to the vertex data
    pub baked_rotation: bool,
    /// World-space origin of the object before recovery touched it
    pub original_origin: Point3<Real>,
}

/// A hidden helper object that lives exactly as long as the guard.
///
/// Dropping the guard deletes the object, retrying once and logging a
/// warning if it is still there. [`TwinGuard::release`] does the same but
/// reports the leak as [`ReprimitiveError::TwinLeak`].
pub struct TwinGuard<'s> {
    scene: &'s mut Scene,
    id: Option<ObjectId>,
}

impl<'s> TwinGuard<'s> {
    /// Generate `params` without loop cuts and add the result as a hidden
    /// object at `transform`.
    pub fn spawn<G: PrimitiveGenerator + ?Sized>(
        scene: &'s mut Scene,
        generator: &G,
        params: &PrimitiveParams,
        transform: Transform,
    ) -> Result<Self> {
        let mesh = generator.generate(&params.without_loop_cuts(), false)?;
        let mut twin = Object::new("Twin", Some(mesh)).with_transform(transform);
        twin.hidden = true;
        twin.family_tag = Some(params.family());
        let id = scene.add_object(twin);
        log::debug!("spawned twin {id}");
        Ok(TwinGuard {
            scene,
            id: Some(id),
        })
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }

    pub fn twin(&self) -> Result<&Object> {
        let id = self.id.ok_or_else(|| {
            ReprimitiveError::DegenerateGeometry("twin already released".to_string())
        })?;
        self.scene.object(id)
    }

    /// Delete the twin now and report whether it is really gone.
    pub fn release(mut self) -> Result<()> {
        match self.id.take() {
            Some(id) => remove_with_retry(self.scene, id),
            None => Ok(()),
        }
    }
}

impl Drop for TwinGuard<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            if let Err(error) = remove_with_retry(self.scene, id) {
                log::warn!("{error}");
            }
        }
    }
}

fn remove_with_retry(scene: &mut Scene, id: ObjectId) -> Result<()> {
    for attempt in 0..2 {
        if !scene.contains(id) {
            return Ok(());
        }
        if let Err(error) = scene.remove_object(id) {
            log::warn!("removing twin {id} failed (attempt {}): {error}", attempt + 1);
        }
    }
    if scene.contains(id) {
        Err(ReprimitiveError::TwinLeak(id))
    } else {
        Ok(())
    }
}

/// Indices the baked fit is solved over: the whole uncut vertex list for
/// ring families, the first face for closed surfaces.
fn reference_indices(params: &PrimitiveParams, twin: &crate::mesh::Mesh) -> Vec<usize> {
    match params {
        PrimitiveParams::Circle(_) | PrimitiveParams::Cylinder(_) | PrimitiveParams::Cone(_) => {
            (0..twin.vertices.len()).collect()
        },
        PrimitiveParams::Torus(_)
        | PrimitiveParams::UvSphere(_)
        | PrimitiveParams::IcoSphere(_) => {
            twin.faces.first().map(|f| f.indices.clone()).unwrap_or_default()
        },
    }
}

/// Recover location and rotation for `id`, whose mesh was produced by
/// `generator` with `params` (loop cuts included).
///
/// On the fast path the object's origin is moved to the canonical origin;
/// world geometry is never changed.
pub fn recover_transform<G: PrimitiveGenerator + ?Sized>(
    scene: &mut Scene,
    generator: &G,
    id: ObjectId,
    params: &PrimitiveParams,
) -> Result<RecoveredTransform> {
    let original_origin = scene.world_location(id)?;
    let object = scene.object(id)?;
    let rotation = object.transform.rotation;
    let baked = rotation.angle() < tolerance();

    let (location, rotation) = if baked {
        recover_baked(scene, generator, id, params)?
    } else if params.loop_cuts().is_empty() {
        (recover_fast(scene, id, params)?, rotation)
    } else {
        (recover_cut(scene, generator, id, params)?, rotation)
    };

    log::debug!("recovered {id}: location {location:?}, baked {baked}");
    Ok(RecoveredTransform {
        location,
        rotation,
        baked_rotation: baked,
        original_origin,
    })
}

fn recover_baked<G: PrimitiveGenerator + ?Sized>(
    scene: &mut Scene,
    generator: &G,
    id: ObjectId,
    params: &PrimitiveParams,
) -> Result<(Point3<Real>, UnitQuaternion<Real>)> {
    let guard = TwinGuard::spawn(scene, generator, params, Transform::default())?;
    let twin_mesh = guard
        .twin()?
        .mesh
        .as_ref()
        .ok_or_else(|| ReprimitiveError::DegenerateGeometry("twin has no mesh".to_string()))?;
    let indices = reference_indices(params, twin_mesh);
    let twin_points = twin_mesh.points(&indices);

    let object = guard.scene().object(id)?;
    let mesh = guard.scene().mesh(id)?;
    if indices.iter().any(|&i| i >= mesh.vertices.len()) {
        return Err(ReprimitiveError::DegenerateGeometry(format!(
            "object {id} has fewer vertices than its twin"
        )));
    }
    let original_points = mesh.points(&indices);

    let (fit, offset) = math::procrustes(&twin_points, &original_points)?;
    let fitted = math::snap_identity(UnitQuaternion::from_rotation_matrix(&fit));
    let rotation = math::snap_identity(object.transform.rotation * fitted);
    let location = object.local_matrix().transform_point(&Point3::from(offset));
    guard.release()?;
    Ok((location, rotation))
}

fn recover_fast(scene: &mut Scene, id: ObjectId, params: &PrimitiveParams) -> Result<Point3<Real>> {
    let sharp = match params {
        PrimitiveParams::Cone(cone) => cone.sharp_end().map(|end| (end, cone.depth)),
        _ => None,
    };
    let Some((end, depth)) = sharp else {
        scene.set_origin(id, OriginMode::GeometryMedian)?;
        return Ok(scene.object(id)?.transform.location);
    };

    // the volume centroid of a closed cone sits a quarter of the depth above
    // its base; the canonical origin is halfway up
    let mesh = scene.mesh_mut(id)?;
    let face_count = mesh.faces.len();
    let filled = mesh.fill_boundary_holes();
    let centroid = mesh.volume_centroid().unwrap_or_else(|| mesh.median());
    let shift = match end {
        ConeEnd::Top => depth / 4.0,
        ConeEnd::Bottom => -depth / 4.0,
    };
    if filled > 0 {
        let temporary: Vec<usize> = (face_count..face_count + filled).collect();
        mesh.delete_faces(&temporary, DeleteMode::FacesOnly);
    }
    scene.move_origin_local(id, &(centroid + Vector3::new(0.0, 0.0, shift)))?;
    Ok(scene.object(id)?.transform.location)
}

fn recover_cut<G: PrimitiveGenerator + ?Sized>(
    scene: &mut Scene,
    generator: &G,
    id: ObjectId,
    params: &PrimitiveParams,
) -> Result<Point3<Real>> {
    let object = scene.object(id)?;
    let unscaled = Transform {
        scale: Vector3::repeat(1.0),
        ..object.transform
    };
    let local = object.local_matrix();
    let original_first = unscaled
        .matrix()
        .transform_point(&scene.mesh(id)?.vertices[0]);

    let guard = TwinGuard::spawn(scene, generator, params, unscaled)?;
    let twin = guard.twin()?;
    let twin_first = twin
        .mesh
        .as_ref()
        .and_then(|m| m.vertices.first())
        .map(|p| twin.local_matrix().transform_point(p))
        .ok_or_else(|| ReprimitiveError::DegenerateGeometry("twin has no vertices".to_string()))?;
    guard.release()?;

    // back into mesh coordinates, then through the real (scaled) transform
    let offset = unscaled.rotation.inverse() * (original_first - twin_first);
    Ok(local.transform_point(&Point3::from(offset)))
}
