//! Planar profiles in the XY plane that become solids by extrusion or revolution.

use crate::entity::Entity;
use crate::error::IgnisError;
use crate::session::Session;
use crate::validate;
use ignis_kernel::{Axis, Profile};
use tracing::debug;

/// A closed 2D profile. Sketches cannot be added to a Model directly.
#[derive(Debug, Clone)]
pub struct Sketch {
    name: Option<String>,
    profile: Profile,
    session: Session,
}

impl Sketch {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Sweep the profile `amount` along +Z.
    pub fn extrude(&self, amount: f64, name: Option<&str>) -> Result<Entity, IgnisError> {
        let tolerance = self.session.config().dimension_tolerance;
        validate::positive_dimensions("Extrude", name, &[("amount", amount)], tolerance)?;
        let handle = self
            .session
            .kernel()
            .extrude_profile(&self.profile, amount)
            .map_err(|e| IgnisError::from_kernel(&validate::label("Extrude", name), e))?;
        debug!(?name, amount, "extruded sketch");
        Ok(Entity::new(&self.session, handle, name))
    }

    /// Full revolution about an axis through the origin lying in the XY plane.
    pub fn revolve(&self, axis: Axis, name: Option<&str>) -> Result<Entity, IgnisError> {
        let handle = self
            .session
            .kernel()
            .revolve_profile(&self.profile, axis)
            .map_err(|e| IgnisError::from_kernel(&validate::label("Revolve", name), e))?;
        debug!(?name, ?axis, "revolved sketch");
        Ok(Entity::new(&self.session, handle, name))
    }
}

impl Session {
    fn sketch(&self, profile: Profile, name: Option<&str>) -> Sketch {
        Sketch {
            name: name.map(str::to_string),
            profile,
            session: self.clone(),
        }
    }

    /// Rectangle `width` × `height` centered on the origin.
    pub fn rectangle(&self, width: f64, height: f64, name: Option<&str>) -> Result<Sketch, IgnisError> {
        let tolerance = self.config().dimension_tolerance;
        validate::positive_dimensions("Rectangle", name, &[("x", width), ("y", height)], tolerance)?;
        Ok(self.sketch(Profile::Rectangle { width, height }, name))
    }

    pub fn circle(&self, radius: f64, name: Option<&str>) -> Result<Sketch, IgnisError> {
        let tolerance = self.config().dimension_tolerance;
        validate::positive_dimensions("Circle", name, &[("r", radius)], tolerance)?;
        Ok(self.sketch(Profile::Circle { radius }, name))
    }

    /// Closed polygon through `points`; the last point connects back to the first.
    pub fn polygon(&self, points: &[[f64; 2]], name: Option<&str>) -> Result<Sketch, IgnisError> {
        let tolerance = self.config().dimension_tolerance;
        validate::vertices("Polygon", name, points, 3, tolerance)?;
        Ok(self.sketch(
            Profile::Polygon {
                points: points.to_vec(),
            },
            name,
        ))
    }
}
