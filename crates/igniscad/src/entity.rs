use crate::error::IgnisError;
use crate::session::Session;
use crate::validate;
use ignis_kernel::{Axis, BoundingBox, RenderMesh, SolidHandle};
use std::fmt;
use tracing::instrument;

/// A named handle to one kernel-owned solid.
///
/// Entities are values: every operation returns a new Entity and leaves the
/// receiver untouched. Cloning shares the underlying solid.
#[derive(Clone)]
pub struct Entity {
    name: Option<String>,
    handle: SolidHandle,
    session: Session,
}

impl Entity {
    pub(crate) fn new(session: &Session, handle: SolidHandle, name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            handle,
            session: session.clone(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn handle(&self) -> SolidHandle {
        self.handle
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Same session and same kernel solid.
    pub fn same_shape(&self, other: &Entity) -> bool {
        self.session.ptr_eq(&other.session) && self.handle == other.handle
    }

    /// The same shape carrying `name`.
    pub fn with_name(self, name: impl Into<String>) -> Entity {
        Entity {
            name: Some(name.into()),
            ..self
        }
    }

    fn check_session(&self, other: &Entity) -> Result<(), IgnisError> {
        if self.session.ptr_eq(&other.session) {
            Ok(())
        } else {
            Err(IgnisError::ForeignEntity)
        }
    }

    fn derive(&self, handle: SolidHandle, name: Option<&str>) -> Entity {
        Entity::new(&self.session, handle, name)
    }

    /// Boolean union. The result is unnamed.
    #[instrument(skip_all, fields(left = ?self.name, right = ?other.name))]
    pub fn union(&self, other: &Entity) -> Result<Entity, IgnisError> {
        self.check_session(other)?;
        let handle = self
            .session
            .kernel()
            .boolean_union(&self.handle, &other.handle)
            .map_err(|e| IgnisError::from_kernel("union", e))?;
        Ok(self.derive(handle, None))
    }

    /// Boolean difference, `self` minus `other`. The result is unnamed.
    #[instrument(skip_all, fields(left = ?self.name, right = ?other.name))]
    pub fn difference(&self, other: &Entity) -> Result<Entity, IgnisError> {
        self.check_session(other)?;
        let handle = self
            .session
            .kernel()
            .boolean_subtract(&self.handle, &other.handle)
            .map_err(|e| IgnisError::from_kernel("difference", e))?;
        Ok(self.derive(handle, None))
    }

    /// Boolean intersection. The result is unnamed.
    #[instrument(skip_all, fields(left = ?self.name, right = ?other.name))]
    pub fn intersection(&self, other: &Entity) -> Result<Entity, IgnisError> {
        self.check_session(other)?;
        let handle = self
            .session
            .kernel()
            .boolean_intersect(&self.handle, &other.handle)
            .map_err(|e| IgnisError::from_kernel("intersection", e))?;
        Ok(self.derive(handle, None))
    }

    /// Translate by (x, y, z). Keeps the name.
    pub fn moved(&self, x: f64, y: f64, z: f64) -> Result<Entity, IgnisError> {
        let handle = self
            .session
            .kernel()
            .translate(&self.handle, [x, y, z])
            .map_err(|e| IgnisError::from_kernel("move", e))?;
        Ok(self.derive(handle, self.name()))
    }

    /// Rotate by `degrees` about `axis` through the world origin. Keeps the name.
    pub fn rotate(&self, axis: Axis, degrees: f64) -> Result<Entity, IgnisError> {
        let handle = self
            .session
            .kernel()
            .rotate(&self.handle, axis, degrees.to_radians())
            .map_err(|e| IgnisError::from_kernel("rotate", e))?;
        Ok(self.derive(handle, self.name()))
    }

    /// Rotate about the global X, then Y, then Z axes (degrees). Zero angles are skipped.
    pub fn rotate_xyz(&self, x: f64, y: f64, z: f64) -> Result<Entity, IgnisError> {
        let mut current = self.clone();
        for (axis, degrees) in [(Axis::X, x), (Axis::Y, y), (Axis::Z, z)] {
            if degrees != 0.0 {
                current = current.rotate(axis, degrees)?;
            }
        }
        Ok(current)
    }

    pub fn bbox(&self) -> Result<BoundingBox, IgnisError> {
        self.session
            .kernel()
            .bounding_box(&self.handle)
            .map_err(|e| IgnisError::from_kernel("bounding box", e))
    }

    /// Triangle mesh within `tolerance` of the surface; `tolerance` must be positive.
    pub fn tessellate(&self, tolerance: f64) -> Result<RenderMesh, IgnisError> {
        if !(tolerance > 0.0) || tolerance.is_infinite() {
            return Err(IgnisError::InvalidParameter {
                label: validate::label("Tessellate", self.name()),
                reasons: vec![format!("Tolerance must be positive, got {tolerance}")],
            });
        }
        self.session
            .kernel()
            .tessellate(&self.handle, tolerance)
            .map_err(|e| IgnisError::from_kernel("tessellate", e))
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("handle", &self.handle)
            .finish()
    }
}
