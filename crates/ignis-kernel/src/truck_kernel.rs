//! TruckKernel: real geometry kernel wrapping truck's API.

use crate::primitives;
use crate::tessellation;
use crate::traits::Kernel;
use crate::types::*;
use std::collections::HashMap;
use tracing::{debug, instrument};

// Import truck types selectively to avoid shadowing std::result::Result
use truck_modeling::builder;
use truck_modeling::topology::Solid;
use truck_modeling::{EuclideanSpace, Point3, Rad, Vector3};

/// Default tolerance handed to truck-shapeops.
pub const DEFAULT_BOOLEAN_TOLERANCE: f64 = 0.05;
/// Default chord tolerance for bounding-box meshes.
pub const DEFAULT_MESH_TOLERANCE: f64 = 0.05;

/// Real geometry kernel backed by the truck BREP library.
pub struct TruckKernel {
    next_handle: u64,
    solids: HashMap<u64, Solid>,
    boolean_tolerance: f64,
    mesh_tolerance: f64,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self::with_tolerances(DEFAULT_BOOLEAN_TOLERANCE, DEFAULT_MESH_TOLERANCE)
    }

    pub fn with_tolerances(boolean_tolerance: f64, mesh_tolerance: f64) -> Self {
        Self {
            next_handle: 1,
            solids: HashMap::new(),
            boolean_tolerance,
            mesh_tolerance,
        }
    }

    fn alloc_handle(&mut self) -> SolidHandle {
        let h = SolidHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    pub(crate) fn store_solid(&mut self, solid: Solid) -> SolidHandle {
        let handle = self.alloc_handle();
        self.solids.insert(handle.id(), solid);
        handle
    }

    pub fn get_solid(&self, handle: &SolidHandle) -> Option<&Solid> {
        self.solids.get(&handle.id())
    }

    fn solid(&self, handle: &SolidHandle) -> Result<&Solid, KernelError> {
        self.get_solid(handle)
            .ok_or(KernelError::SolidNotFound { handle: *handle })
    }

    fn store_boolean(
        &mut self,
        operation: &str,
        result: Option<Solid>,
    ) -> Result<SolidHandle, KernelError> {
        let solid = result.ok_or_else(|| KernelError::BooleanFailed {
            reason: format!("truck {operation} returned None"),
        })?;
        if solid.boundaries().is_empty() {
            return Err(KernelError::EmptyResult {
                operation: operation.to_string(),
            });
        }
        Ok(self.store_solid(solid))
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for TruckKernel {
    fn name(&self) -> &str {
        "truck"
    }

    fn make_box(&mut self, x: f64, y: f64, z: f64) -> Result<SolidHandle, KernelError> {
        Ok(self.store_solid(primitives::make_box(x, y, z)))
    }

    fn make_cylinder(&mut self, radius: f64, height: f64) -> Result<SolidHandle, KernelError> {
        let solid = primitives::make_cylinder(radius, height)?;
        Ok(self.store_solid(solid))
    }

    fn make_sphere(&mut self, radius: f64) -> Result<SolidHandle, KernelError> {
        let solid = primitives::make_sphere(radius)?;
        Ok(self.store_solid(solid))
    }

    fn make_torus(
        &mut self,
        major_radius: f64,
        minor_radius: f64,
    ) -> Result<SolidHandle, KernelError> {
        let solid = primitives::make_torus(major_radius, minor_radius)?;
        Ok(self.store_solid(solid))
    }

    fn make_lathe(&mut self, profile: &[[f64; 2]]) -> Result<SolidHandle, KernelError> {
        let solid = primitives::make_lathe(profile)?;
        Ok(self.store_solid(solid))
    }

    fn make_slot(
        &mut self,
        length: f64,
        diameter: f64,
        depth: f64,
    ) -> Result<SolidHandle, KernelError> {
        let solid = primitives::make_slot(length, diameter, depth)?;
        Ok(self.store_solid(solid))
    }

    fn extrude_profile(
        &mut self,
        profile: &Profile,
        depth: f64,
    ) -> Result<SolidHandle, KernelError> {
        let solid = primitives::extrude_profile(profile, depth)?;
        Ok(self.store_solid(solid))
    }

    fn revolve_profile(
        &mut self,
        profile: &Profile,
        axis: Axis,
    ) -> Result<SolidHandle, KernelError> {
        let solid = primitives::revolve_profile(profile, axis)?;
        Ok(self.store_solid(solid))
    }

    #[instrument(skip(self))]
    fn boolean_union(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        let result = truck_shapeops::or(self.solid(a)?, self.solid(b)?, self.boolean_tolerance);
        self.store_boolean("union", result)
    }

    #[instrument(skip(self))]
    fn boolean_subtract(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        // Subtraction = A ∩ ¬B. not() mutates in place.
        let mut solid_b = self.solid(b)?.clone();
        solid_b.not();
        let result = truck_shapeops::and(self.solid(a)?, &solid_b, self.boolean_tolerance);
        self.store_boolean("subtraction", result)
    }

    #[instrument(skip(self))]
    fn boolean_intersect(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        let result = truck_shapeops::and(self.solid(a)?, self.solid(b)?, self.boolean_tolerance);
        self.store_boolean("intersection", result)
    }

    fn translate(
        &mut self,
        solid: &SolidHandle,
        offset: [f64; 3],
    ) -> Result<SolidHandle, KernelError> {
        let moved = builder::translated(
            self.solid(solid)?,
            Vector3::new(offset[0], offset[1], offset[2]),
        );
        Ok(self.store_solid(moved))
    }

    fn rotate(
        &mut self,
        solid: &SolidHandle,
        axis: Axis,
        angle: f64,
    ) -> Result<SolidHandle, KernelError> {
        let dir = axis.direction().ok_or_else(|| KernelError::InvalidParameter {
            reason: "rotation axis has zero length".to_string(),
        })?;
        let rotated = builder::rotated(
            self.solid(solid)?,
            Point3::origin(),
            Vector3::new(dir[0], dir[1], dir[2]),
            Rad(angle),
        );
        Ok(self.store_solid(rotated))
    }

    fn bounding_box(&mut self, solid: &SolidHandle) -> Result<BoundingBox, KernelError> {
        use truck_meshalgo::tessellation::{MeshableShape, MeshedShape};

        let polygon = self
            .solid(solid)?
            .triangulation(self.mesh_tolerance)
            .to_polygon();
        BoundingBox::from_points(polygon.positions().iter().map(|p| [p.x, p.y, p.z])).ok_or_else(
            || KernelError::TessellationFailed {
                reason: "solid has no vertices".to_string(),
            },
        )
    }

    fn tessellate(
        &mut self,
        solid: &SolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        let mesh = tessellation::tessellate_solid(self.solid(solid)?, tolerance)?;
        debug!(
            handle = solid.id(),
            triangles = mesh.triangle_count(),
            "tessellated solid"
        );
        Ok(mesh)
    }

    fn export_step(&mut self, solid: &SolidHandle, name: &str) -> Result<String, KernelError> {
        use truck_stepio::out::{CompleteStepDisplay, StepHeaderDescriptor, StepModel};

        let compressed = self.solid(solid)?.compress();
        let header = StepHeaderDescriptor {
            organization_system: "igniscad".to_string(),
            ..Default::default()
        };
        let step = CompleteStepDisplay::new(StepModel::from(&compressed), header).to_string();
        debug!(handle = solid.id(), name, bytes = step.len(), "serialized STEP");
        Ok(step)
    }
}
