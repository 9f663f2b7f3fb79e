//! ModelBuilder: fluent API for scripting modeling workflows in tests.
//!
//! Drives the public `igniscad` surface so scenarios exercise the same path a
//! script would. Intermediate shapes are kept under string names; only the
//! ones passed to `keep` end up in the Model.

use std::collections::HashMap;
use std::path::Path;

use igniscad::{Axis, Entity, IgnisConfig, Model, RenderMesh, Session, ShowMode, ShowOptions};

use crate::helpers::HarnessError;
use crate::oracle;

/// A fluent builder for constructing and verifying models in tests.
pub struct ModelBuilder {
    session: Session,
    model: Model,
    named: HashMap<String, Entity>,
    history: Vec<(String, String)>,
    tolerance: f64,
}

impl ModelBuilder {
    /// Create a new ModelBuilder with MockKernel (deterministic, fast).
    pub fn mock() -> Self {
        Self::with_session(Session::mock())
    }

    /// Create a new ModelBuilder with TruckKernel (real geometry).
    pub fn truck() -> Self {
        Self::with_session(Session::truck())
    }

    pub fn with_config(truck: bool, config: IgnisConfig) -> Self {
        if truck {
            Self::with_session(Session::truck_with_config(config))
        } else {
            Self::with_session(Session::mock_with_config(config))
        }
    }

    fn with_session(session: Session) -> Self {
        let tolerance = session.config().export.tolerance;
        Self {
            model: session.model("scenario"),
            session,
            named: HashMap::new(),
            history: Vec::new(),
            tolerance,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn check_name_available(&self, name: &str) -> Result<(), HarnessError> {
        if self.named.contains_key(name) {
            return Err(HarnessError::DuplicateName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn record(&mut self, name: &str, op: &str, entity: Entity) -> Result<&mut Self, HarnessError> {
        self.check_name_available(name)?;
        self.named.insert(name.to_string(), entity);
        self.history.push((name.to_string(), op.to_string()));
        Ok(self)
    }

    // ── Primitives ──────────────────────────────────────────────────────

    pub fn cuboid(&mut self, name: &str, x: f64, y: f64, z: f64) -> Result<&mut Self, HarnessError> {
        let e = self.session.cuboid(x, y, z, Some(name))?;
        self.record(name, "Box", e)
    }

    pub fn cylinder(&mut self, name: &str, radius: f64, height: f64) -> Result<&mut Self, HarnessError> {
        let e = self.session.cylinder(radius, height, Some(name))?;
        self.record(name, "Cylinder", e)
    }

    pub fn sphere(&mut self, name: &str, radius: f64) -> Result<&mut Self, HarnessError> {
        let e = self.session.sphere(radius, Some(name))?;
        self.record(name, "Sphere", e)
    }

    pub fn torus(&mut self, name: &str, major: f64, minor: f64) -> Result<&mut Self, HarnessError> {
        let e = self.session.torus(major, minor, Some(name))?;
        self.record(name, "Torus", e)
    }

    pub fn slot(&mut self, name: &str, length: f64, diameter: f64, depth: f64) -> Result<&mut Self, HarnessError> {
        let e = self.session.slot(length, diameter, depth, Some(name))?;
        self.record(name, "Slot", e)
    }

    pub fn iso_hole(&mut self, name: &str, size: &str, depth: f64) -> Result<&mut Self, HarnessError> {
        let e = self.session.iso_hole(size, depth, Default::default(), Some(name))?;
        self.record(name, "ISO_Hole", e)
    }

    /// Rectangle sketch extruded along +Z.
    pub fn plate(&mut self, name: &str, width: f64, height: f64, depth: f64) -> Result<&mut Self, HarnessError> {
        let e = self
            .session
            .rectangle(width, height, None)?
            .extrude(depth, Some(name))?;
        self.record(name, "Extrude", e)
    }

    // ── Operations ──────────────────────────────────────────────────────

    pub fn union(&mut self, name: &str, a: &str, b: &str) -> Result<&mut Self, HarnessError> {
        let e = self.entity(a)?.union(self.entity(b)?)?.with_name(name);
        self.record(name, "Union", e)
    }

    pub fn difference(&mut self, name: &str, a: &str, b: &str) -> Result<&mut Self, HarnessError> {
        let e = self.entity(a)?.difference(self.entity(b)?)?.with_name(name);
        self.record(name, "Difference", e)
    }

    pub fn intersection(&mut self, name: &str, a: &str, b: &str) -> Result<&mut Self, HarnessError> {
        let e = self.entity(a)?.intersection(self.entity(b)?)?.with_name(name);
        self.record(name, "Intersection", e)
    }

    pub fn moved(&mut self, name: &str, source: &str, x: f64, y: f64, z: f64) -> Result<&mut Self, HarnessError> {
        let e = self.entity(source)?.moved(x, y, z)?.with_name(name);
        self.record(name, "Move", e)
    }

    pub fn rotated(&mut self, name: &str, source: &str, axis: Axis, degrees: f64) -> Result<&mut Self, HarnessError> {
        let e = self.entity(source)?.rotate(axis, degrees)?.with_name(name);
        self.record(name, "Rotate", e)
    }

    pub fn on_top_of(&mut self, name: &str, source: &str, target: &str) -> Result<&mut Self, HarnessError> {
        let e = self
            .entity(source)?
            .on_top_of(self.entity(target)?, 0.0)?
            .with_name(name);
        self.record(name, "Align", e)
    }

    /// Register a named shape in the Model.
    pub fn keep(&mut self, name: &str) -> Result<&mut Self, HarnessError> {
        let e = self.entity(name)?.clone();
        self.model.add(e)?;
        Ok(self)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn entity(&self, name: &str) -> Result<&Entity, HarnessError> {
        self.named.get(name).ok_or_else(|| HarnessError::EntityNotFound {
            name: name.to_string(),
        })
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn history(&self) -> &[(String, String)] {
        &self.history
    }

    pub fn tessellate(&self, name: &str) -> Result<RenderMesh, HarnessError> {
        Ok(self.entity(name)?.tessellate(self.tolerance)?)
    }

    pub fn export_stl(&self, name: &str) -> Result<Vec<u8>, HarnessError> {
        let mesh = self.tessellate(name)?;
        ignis_export::encode_binary_stl(&mesh).map_err(|e| HarnessError::StlError {
            reason: e.to_string(),
        })
    }

    /// Export the kept parts to `path` through `Model::show`.
    pub fn export_model(&mut self, path: &Path) -> Result<(), HarnessError> {
        self.model
            .show(ShowMode::Export, &ShowOptions::to_path(path))?;
        Ok(())
    }

    // ── Assertions ──────────────────────────────────────────────────────

    pub fn assert_has_solid(&self, name: &str) -> Result<&Self, HarnessError> {
        let mesh = self.tessellate(name)?;
        if mesh.is_empty() {
            return Err(HarnessError::AssertionFailed {
                detail: format!("'{}' tessellated to an empty mesh", name),
            });
        }
        Ok(self)
    }

    pub fn check_mesh(&self, name: &str) -> Result<Vec<oracle::OracleVerdict>, HarnessError> {
        Ok(oracle::run_all_mesh_checks(&self.tessellate(name)?))
    }
}
