//! Interactive edit sessions: recover an object's parameters once, then
//! rebuild it as often as the user likes before committing or cancelling.

use crate::classify::classify_object;
use crate::errors::{ReprimitiveError, Result};
use crate::extract::measure;
use crate::params::{PrimitiveFamily, PrimitiveParams};
use crate::replace::{ReplaceRequest, replace};
use crate::scene::{ObjectId, OriginMode, Scene};
use crate::shapes::PrimitiveGenerator;
use crate::transform::{RecoveredTransform, recover_transform};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SessionState {
    Previewing,
    Committed,
    Cancelled,
}

/// One edit of one object.
///
/// Every preview replaces the current object, starting from the transform
/// recovered in [`EditSession::begin`], so previews never accumulate drift.
/// After [`commit`](EditSession::commit) or [`cancel`](EditSession::cancel)
/// every further call fails with [`ReprimitiveError::SessionClosed`].
#[derive(Debug)]
pub struct EditSession<'g, G: PrimitiveGenerator + ?Sized> {
    generator: &'g G,
    object: ObjectId,
    confirmed: PrimitiveParams,
    last: PrimitiveParams,
    transform: RecoveredTransform,
    generate_uvs: bool,
    previewed: bool,
    state: SessionState,
}

impl<'g, G: PrimitiveGenerator + ?Sized> EditSession<'g, G> {
    /// Classify, extract and locate `id`. Returns `Ok(None)` when the object
    /// is not a recognizable primitive.
    pub fn begin(scene: &mut Scene, generator: &'g G, id: ObjectId) -> Result<Option<Self>> {
        let object = scene.object(id)?;
        let Some(mesh) = object.mesh.as_ref() else {
            return Err(ReprimitiveError::NotAMesh(id));
        };
        mesh.validate()?;
        let family = classify_object(object);
        if family == PrimitiveFamily::Unknown {
            log::info!("{} is not a known primitive", object.name);
            return Ok(None);
        }
        let params = match measure(mesh, family) {
            Ok(params) => params,
            Err(ReprimitiveError::Unclassified) => return Ok(None),
            Err(error) => return Err(error),
        };
        let generate_uvs = object.generate_uvs;
        let transform = recover_transform(scene, generator, id, &params)?;

        log::info!("editing {id} as {params:?}");
        Ok(Some(EditSession {
            generator,
            object: id,
            confirmed: params.clone(),
            last: params,
            transform,
            generate_uvs,
            previewed: false,
            state: SessionState::Previewing,
        }))
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            SessionState::Previewing => Ok(()),
            closed => Err(ReprimitiveError::SessionClosed(closed)),
        }
    }

    fn rebuild(&mut self, scene: &mut Scene, params: &PrimitiveParams) -> Result<ObjectId> {
        let mut request = ReplaceRequest::new(
            params.clone(),
            self.transform.location,
            self.transform.rotation,
        );
        request.generate_uvs = self.generate_uvs;
        request.origin = Some(self.transform.original_origin);
        let id = replace(scene, self.generator, self.object, &request)?;
        self.object = id;
        Ok(id)
    }

    /// Rebuild the object from `params`. A rejected parameter set leaves the
    /// scene and the session untouched.
    pub fn preview(&mut self, scene: &mut Scene, params: PrimitiveParams) -> Result<ObjectId> {
        self.ensure_open()?;
        let id = self.rebuild(scene, &params)?;
        self.last = params;
        self.previewed = true;
        Ok(id)
    }

    /// Keep the last preview.
    pub fn commit(&mut self) -> Result<ObjectId> {
        self.ensure_open()?;
        self.confirmed = self.last.clone();
        self.state = SessionState::Committed;
        log::info!("committed {} as {:?}", self.object, self.confirmed);
        Ok(self.object)
    }

    /// Go back to the parameters the session started from.
    pub fn cancel(&mut self, scene: &mut Scene) -> Result<ObjectId> {
        self.ensure_open()?;
        if !self.previewed {
            scene.set_origin(self.object, OriginMode::Cursor(self.transform.original_origin))?;
        } else if !self.last.approx_eq(&self.confirmed) {
            let confirmed = self.confirmed.clone();
            self.rebuild(scene, &confirmed)?;
            self.last = confirmed;
        }
        self.state = SessionState::Cancelled;
        log::info!("cancelled edit of {}", self.object);
        Ok(self.object)
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// The object currently standing for the edited primitive.
    pub const fn object(&self) -> ObjectId {
        self.object
    }

    /// Parameters extracted at [`begin`](EditSession::begin), or committed.
    pub const fn params(&self) -> &PrimitiveParams {
        &self.confirmed
    }

    /// The most recently built parameters. Readable in every state.
    pub const fn last_preview(&self) -> &PrimitiveParams {
        &self.last
    }

    pub const fn transform(&self) -> &RecoveredTransform {
        &self.transform
    }
}
