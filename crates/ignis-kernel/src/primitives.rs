//! Higher-level primitive builders on top of truck's sweep API.
//!
//! truck has no built-in box/cylinder/sphere; everything is successive sweeps.
//! All builders center the solid on the origin.

use crate::tessellation;
use crate::types::{Axis, KernelError, Profile};
use std::f64::consts::PI;
use truck_modeling::builder;
use truck_modeling::topology::{Face, Solid, Wire};
use truck_modeling::{EuclideanSpace, Point3, Rad, Vector3};

fn attach_plane(wire: Wire, what: &str) -> Result<Face, KernelError> {
    builder::try_attach_plane(&[wire]).map_err(|e| KernelError::ConstructionFailed {
        reason: format!("failed to create {what} face: {e}"),
    })
}

/// Closed polyline wire through `points`, sharing vertices between edges.
fn polyline_wire(points: &[Point3]) -> Wire {
    let vertices: Vec<_> = points.iter().map(|&p| builder::vertex(p)).collect();
    let n = vertices.len();
    Wire::from_iter((0..n).map(|i| builder::line(&vertices[i], &vertices[(i + 1) % n])))
}

/// Turn `solid` outside-in when its boundary encloses negative volume.
///
/// An rsweep face keeps the orientation of its profile, so whether the shell
/// faces out depends on the profile winding relative to the sweep direction.
fn outward(mut solid: Solid, scale: f64) -> Result<Solid, KernelError> {
    let mesh = tessellation::tessellate_solid(&solid, scale * 0.05)?;
    if tessellation::signed_volume(&mesh) < 0.0 {
        solid.not();
    }
    Ok(solid)
}

/// Create a box solid via successive translational sweeps.
pub fn make_box(x: f64, y: f64, z: f64) -> Solid {
    let v = builder::vertex(Point3::new(-x / 2.0, -y / 2.0, -z / 2.0));
    let edge = builder::tsweep(&v, Vector3::new(x, 0.0, 0.0));
    let face = builder::tsweep(&edge, Vector3::new(0.0, y, 0.0));
    builder::tsweep(&face, Vector3::new(0.0, 0.0, z))
}

/// Create a cylinder solid: circle wire → face → translational sweep.
pub fn make_cylinder(radius: f64, height: f64) -> Result<Solid, KernelError> {
    let v = builder::vertex(Point3::new(radius, 0.0, -height / 2.0));
    let wire = builder::rsweep(
        &v,
        Point3::new(0.0, 0.0, -height / 2.0),
        Vector3::unit_z(),
        Rad(2.0 * PI),
    );
    let face = attach_plane(wire, "circular")?;
    Ok(builder::tsweep(&face, Vector3::new(0.0, 0.0, height)))
}

/// Create a sphere solid: half-disc in XZ → rotational sweep 2π around Z.
pub fn make_sphere(radius: f64) -> Result<Solid, KernelError> {
    let bottom = builder::vertex(Point3::new(0.0, 0.0, -radius));
    let top = builder::vertex(Point3::new(0.0, 0.0, radius));
    let arc = builder::circle_arc(&bottom, &top, Point3::new(radius, 0.0, 0.0));
    let axis = builder::line(&top, &bottom);
    let face = attach_plane(Wire::from_iter([arc, axis]), "half-disc")?;
    let solid = builder::rsweep(&face, Point3::origin(), Vector3::unit_z(), Rad(2.0 * PI));
    outward(solid, radius)
}

/// Create a torus: disc in XZ centered at (major, 0, 0) swept around Z.
pub fn make_torus(major_radius: f64, minor_radius: f64) -> Result<Solid, KernelError> {
    let v = builder::vertex(Point3::new(major_radius + minor_radius, 0.0, 0.0));
    let wire = builder::rsweep(
        &v,
        Point3::new(major_radius, 0.0, 0.0),
        Vector3::unit_y(),
        Rad(2.0 * PI),
    );
    let face = attach_plane(wire, "torus section")?;
    let solid = builder::rsweep(&face, Point3::origin(), Vector3::unit_z(), Rad(2.0 * PI));
    outward(solid, minor_radius)
}

/// Revolve a closed `[radius, z]` outline in the XZ plane around Z.
pub fn make_lathe(profile: &[[f64; 2]]) -> Result<Solid, KernelError> {
    if profile.len() < 3 {
        return Err(KernelError::InvalidParameter {
            reason: format!("lathe profile needs at least 3 points, got {}", profile.len()),
        });
    }
    if profile.iter().any(|p| p[0] < 0.0) {
        return Err(KernelError::InvalidParameter {
            reason: "lathe profile crosses the axis".to_string(),
        });
    }
    let points: Vec<Point3> = profile
        .iter()
        .map(|p| Point3::new(p[0], 0.0, p[1]))
        .collect();
    let face = attach_plane(polyline_wire(&points), "lathe profile")?;
    let solid = builder::rsweep(&face, Point3::origin(), Vector3::unit_z(), Rad(2.0 * PI));
    outward(solid, extent(profile))
}

/// Stadium outline (two lines, two half circles) extruded symmetrically in Z.
pub fn make_slot(length: f64, diameter: f64, depth: f64) -> Result<Solid, KernelError> {
    let r = diameter / 2.0;
    let a = (length - diameter) / 2.0;
    if a < 0.0 {
        return Err(KernelError::InvalidParameter {
            reason: format!("slot length {length} is shorter than its diameter {diameter}"),
        });
    }
    if a < 1e-9 {
        return make_cylinder(r, depth);
    }
    let z0 = -depth / 2.0;
    let v0 = builder::vertex(Point3::new(-a, -r, z0));
    let v1 = builder::vertex(Point3::new(a, -r, z0));
    let v2 = builder::vertex(Point3::new(a, r, z0));
    let v3 = builder::vertex(Point3::new(-a, r, z0));
    let wire = Wire::from_iter([
        builder::line(&v0, &v1),
        builder::circle_arc(&v1, &v2, Point3::new(a + r, 0.0, z0)),
        builder::line(&v2, &v3),
        builder::circle_arc(&v3, &v0, Point3::new(-a - r, 0.0, z0)),
    ]);
    let face = attach_plane(wire, "slot")?;
    Ok(builder::tsweep(&face, Vector3::new(0.0, 0.0, depth)))
}

/// Planar face in z = 0 bounded by the profile outline.
pub fn profile_face(profile: &Profile) -> Result<Face, KernelError> {
    match profile {
        Profile::Circle { radius } => {
            let v = builder::vertex(Point3::new(*radius, 0.0, 0.0));
            let wire = builder::rsweep(&v, Point3::origin(), Vector3::unit_z(), Rad(2.0 * PI));
            attach_plane(wire, "circular")
        }
        Profile::Rectangle { .. } | Profile::Polygon { .. } => {
            let points: Vec<Point3> = profile
                .outline(0)
                .iter()
                .map(|p| Point3::new(p[0], p[1], 0.0))
                .collect();
            if points.len() < 3 {
                return Err(KernelError::InvalidParameter {
                    reason: format!("profile needs at least 3 points, got {}", points.len()),
                });
            }
            attach_plane(polyline_wire(&points), "profile")
        }
    }
}

pub fn extrude_profile(profile: &Profile, depth: f64) -> Result<Solid, KernelError> {
    let face = profile_face(profile)?;
    Ok(builder::tsweep(&face, Vector3::new(0.0, 0.0, depth)))
}

pub fn revolve_profile(profile: &Profile, axis: Axis) -> Result<Solid, KernelError> {
    let dir = in_plane_axis(axis)?;
    let face = profile_face(profile)?;
    let solid = builder::rsweep(
        &face,
        Point3::origin(),
        Vector3::new(dir[0], dir[1], 0.0),
        Rad(2.0 * PI),
    );
    outward(solid, extent(&profile.outline(16)))
}

/// Largest coordinate magnitude of a 2D outline.
fn extent(points: &[[f64; 2]]) -> f64 {
    points
        .iter()
        .flat_map(|p| [p[0].abs(), p[1].abs()])
        .fold(0.0, f64::max)
}

/// Revolution axes must lie in the sketch plane.
pub(crate) fn in_plane_axis(axis: Axis) -> Result<[f64; 2], KernelError> {
    let dir = axis.direction().ok_or_else(|| KernelError::InvalidParameter {
        reason: "revolve axis has zero length".to_string(),
    })?;
    if dir[2].abs() > 1e-9 {
        return Err(KernelError::InvalidParameter {
            reason: format!("revolve axis {dir:?} does not lie in the XY plane"),
        });
    }
    Ok([dir[0], dir[1]])
}
