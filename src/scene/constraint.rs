use crate::body::{Body, BodyId};
use crate::error::{Error, Result};
use crate::geo::*;
use log::debug;

#[derive(Copy, Clone, Debug)]
struct Grab {
    body: BodyId,
    offset: V2,
    was_active: bool,
}

/// Drags one body along with a pointer.
///
/// The dragged body is made inactive, so collision impulses can't move it,
/// and follows the pointer kinematically. Its velocity is synthesized from
/// the pointer movement so it can be thrown on release.
#[derive(Clone, Debug)]
pub struct PointerConstraint {
    grab: Option<Grab>,
    pointer: P2,
    last_pointer: P2,
}

impl Default for PointerConstraint {
    fn default() -> Self {
        PointerConstraint {
            grab: None,
            pointer: P2::origin(),
            last_pointer: P2::origin(),
        }
    }
}

impl PointerConstraint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grabbed(&self) -> Option<BodyId> {
        self.grab.map(|g| g.body)
    }

    pub fn pointer(&self) -> P2 {
        self.pointer
    }

    pub fn move_to(&mut self, pointer: P2) {
        self.pointer = pointer;
    }

    /// Grabs `body` at `pointer`. A previous grab must be released first.
    pub(crate) fn grab(&mut self, body: &mut Body, pointer: P2) -> Result<()> {
        if body.is_static() {
            return Err(Error::StaticBody(body.id()));
        }
        debug!("pointer grabs {} at {:?}", body.id(), pointer);
        self.grab = Some(Grab {
            body: body.id(),
            offset: body.position() - pointer,
            was_active: body.active,
        });
        body.active = false;
        self.pointer = pointer;
        self.last_pointer = pointer;
        Ok(())
    }

    /// Lets go of the dragged body, if it is still in `bodies`.
    pub(crate) fn release(&mut self, bodies: &mut [Body]) -> Option<BodyId> {
        let grab = self.grab.take()?;
        if let Some(body) = bodies.iter_mut().find(|b| b.id() == grab.body) {
            body.active = grab.was_active;
        }
        debug!("pointer releases {}", grab.body);
        Some(grab.body)
    }

    /// Places the dragged body under the pointer and returns its index.
    pub(crate) fn apply(&mut self, bodies: &mut [Body]) -> Option<usize> {
        let grab = self.grab?;
        let index = bodies.iter().position(|b| b.id() == grab.body);
        match index {
            Some(i) => bodies[i].set_position(self.pointer + grab.offset),
            None => self.grab = None,
        }
        index
    }

    /// Pointer movement since the previous call, per unit of `time_scale`.
    pub(crate) fn take_velocity(&mut self, time_scale: Float) -> V2 {
        let delta = self.pointer - self.last_pointer;
        self.last_pointer = self.pointer;
        if time_scale > 0.0 {
            delta / time_scale
        } else {
            V2::zeros()
        }
    }
}
