use crate::types::*;

/// Core geometry kernel trait. Owns every solid it creates; callers only ever
/// hold `SolidHandle`s. Stored solids are never mutated: every operation
/// returns a fresh handle.
///
/// Implemented by TruckKernel (wraps real truck) and MockKernel (deterministic test double).
pub trait Kernel {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Axis-aligned box centered on the origin.
    fn make_box(&mut self, x: f64, y: f64, z: f64) -> Result<SolidHandle, KernelError>;

    /// Cylinder along Z, centered on the origin.
    fn make_cylinder(&mut self, radius: f64, height: f64) -> Result<SolidHandle, KernelError>;

    fn make_sphere(&mut self, radius: f64) -> Result<SolidHandle, KernelError>;

    /// Torus around the Z axis, centered on the origin.
    fn make_torus(&mut self, major_radius: f64, minor_radius: f64)
        -> Result<SolidHandle, KernelError>;

    /// Solid of revolution around Z. `profile` lists `[radius, z]` points of
    /// a closed outline in the half-plane `radius >= 0`; the first and last
    /// points must lie on the axis.
    fn make_lathe(&mut self, profile: &[[f64; 2]]) -> Result<SolidHandle, KernelError>;

    /// Stadium of overall `length` along X and end `diameter`, extruded
    /// symmetrically along Z by `depth`.
    fn make_slot(
        &mut self,
        length: f64,
        diameter: f64,
        depth: f64,
    ) -> Result<SolidHandle, KernelError>;

    /// Sweep an XY-plane profile along +Z (or -Z for negative depth).
    fn extrude_profile(&mut self, profile: &Profile, depth: f64)
        -> Result<SolidHandle, KernelError>;

    /// Full revolution of an XY-plane profile about an axis lying in that plane.
    fn revolve_profile(&mut self, profile: &Profile, axis: Axis)
        -> Result<SolidHandle, KernelError>;

    /// Boolean union of two solids.
    fn boolean_union(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError>;

    /// Boolean subtraction: a minus b.
    fn boolean_subtract(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError>;

    /// Boolean intersection of two solids.
    fn boolean_intersect(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError>;

    fn translate(
        &mut self,
        solid: &SolidHandle,
        offset: [f64; 3],
    ) -> Result<SolidHandle, KernelError>;

    /// Rotate about an axis through the world origin. `angle` is in radians,
    /// right-handed.
    fn rotate(
        &mut self,
        solid: &SolidHandle,
        axis: Axis,
        angle: f64,
    ) -> Result<SolidHandle, KernelError>;

    fn bounding_box(&mut self, solid: &SolidHandle) -> Result<BoundingBox, KernelError>;

    /// Tessellate a solid to a triangle mesh.
    fn tessellate(
        &mut self,
        solid: &SolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError>;

    /// Serialize a solid as a STEP (ISO 10303-21) document.
    fn export_step(&mut self, solid: &SolidHandle, name: &str) -> Result<String, KernelError> {
        let _ = (solid, name);
        Err(KernelError::NotSupported {
            operation: format!("STEP export on {} kernel", self.name()),
        })
    }
}
