//! One-shot operations built on top of [`EditSession`] and [`replace`].

use crate::classify::classify_object;
use crate::errors::{ReprimitiveError, Result};
use crate::extract::measure;
use crate::params::{PrimitiveFamily, PrimitiveParams};
use crate::replace::{ReplaceRequest, replace};
use crate::scene::{ObjectId, Scene};
use crate::session::EditSession;
use crate::shapes::PrimitiveGenerator;
use crate::symmetry::symmetric_rotation;
use crate::transform::recover_transform;

/// Recover `id`'s parameters, let `edit` change them, and rebuild the object
/// in a single committed session. Returns `None` for objects that are not
/// recognizable primitives.
pub fn tweak_primitive<G, F>(
    scene: &mut Scene,
    generator: &G,
    id: ObjectId,
    edit: F,
) -> Result<Option<ObjectId>>
where
    G: PrimitiveGenerator + ?Sized,
    F: FnOnce(&mut PrimitiveParams),
{
    let Some(mut session) = EditSession::begin(scene, generator, id)? else {
        return Ok(None);
    };
    let mut params = session.params().clone();
    edit(&mut params);
    if let Err(error) = session.preview(scene, params) {
        // recovery may have moved the origin
        session.cancel(scene)?;
        return Err(error);
    }
    session.commit().map(Some)
}

/// Rebuild a primitive whose rotation was applied to its vertices so that
/// the rotation lives on the object again, with the smallest angle the
/// primitive's symmetry allows. Parameters are unchanged.
pub fn fix_applied_rotation<G: PrimitiveGenerator + ?Sized>(
    scene: &mut Scene,
    generator: &G,
    id: ObjectId,
) -> Result<Option<ObjectId>> {
    let object = scene.object(id)?;
    let Some(mesh) = object.mesh.as_ref() else {
        return Err(ReprimitiveError::NotAMesh(id));
    };
    mesh.validate()?;
    let family = classify_object(object);
    if family == PrimitiveFamily::Unknown {
        return Ok(None);
    }
    let params = match measure(mesh, family) {
        Ok(params) => params,
        Err(ReprimitiveError::Unclassified) => return Ok(None),
        Err(error) => return Err(error),
    };
    let rotation = object.transform.rotation * symmetric_rotation(mesh, &params)?;
    let generate_uvs = object.generate_uvs;

    let recovered = recover_transform(scene, generator, id, &params)?;
    let mut request = ReplaceRequest::new(params, recovered.location, rotation);
    request.generate_uvs = generate_uvs;
    request.origin = Some(recovered.original_origin);
    let rebuilt = replace(scene, generator, id, &request)?;
    log::info!("fixed applied rotation of {id}: {:?}", rotation.euler_angles());
    Ok(Some(rebuilt))
}
