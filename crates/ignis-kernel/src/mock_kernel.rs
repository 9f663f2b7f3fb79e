//! MockKernel: deterministic test double implementing Kernel.
//!
//! Solids are kept as CSG trees of analytic primitives, so point membership
//! is exact and bounding boxes are cheap. Tessellation returns the bounding
//! box as a 12-triangle proxy mesh.

use crate::traits::Kernel;
use crate::types::*;
use std::collections::HashMap;
use std::rc::Rc;
use truck_modeling::{EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3};

#[derive(Debug)]
enum Node {
    Cuboid {
        half: [f64; 3],
    },
    Cylinder {
        radius: f64,
        half_height: f64,
    },
    Sphere {
        radius: f64,
    },
    Torus {
        major: f64,
        minor: f64,
    },
    /// `[radius, z]` outline revolved around Z.
    Lathe {
        profile: Vec<[f64; 2]>,
    },
    Slot {
        half_straight: f64,
        radius: f64,
        half_depth: f64,
    },
    Prism {
        profile: Profile,
        depth: f64,
    },
    /// Full revolution about an in-plane unit axis through the origin.
    Revolution {
        profile: Profile,
        axis: [f64; 2],
    },
    Union(Rc<Node>, Rc<Node>),
    Difference(Rc<Node>, Rc<Node>),
    Intersection(Rc<Node>, Rc<Node>),
    Transformed {
        node: Rc<Node>,
        matrix: Matrix4,
        inverse: Matrix4,
    },
}

fn apply(m: &Matrix4, p: [f64; 3]) -> [f64; 3] {
    let v = *m * Point3::new(p[0], p[1], p[2]).to_vec().extend(1.0);
    [v.x, v.y, v.z]
}

impl Node {
    fn contains(&self, p: [f64; 3]) -> bool {
        let [x, y, z] = p;
        match self {
            Node::Cuboid { half } => (0..3).all(|i| p[i].abs() <= half[i]),
            Node::Cylinder {
                radius,
                half_height,
            } => z.abs() <= *half_height && x * x + y * y <= radius * radius,
            Node::Sphere { radius } => x * x + y * y + z * z <= radius * radius,
            Node::Torus { major, minor } => {
                let rho = (x * x + y * y).sqrt() - major;
                rho * rho + z * z <= minor * minor
            }
            Node::Lathe { profile } => point_in_polygon(profile, [(x * x + y * y).sqrt(), z]),
            Node::Slot {
                half_straight,
                radius,
                half_depth,
            } => {
                let dx = (x.abs() - half_straight).max(0.0);
                z.abs() <= *half_depth && dx * dx + y * y <= radius * radius
            }
            Node::Prism { profile, depth } => {
                z >= depth.min(0.0) && z <= depth.max(0.0) && profile.contains([x, y])
            }
            Node::Revolution { profile, axis } => {
                let t = x * axis[0] + y * axis[1];
                let rx = x - t * axis[0];
                let ry = y - t * axis[1];
                let rho = (rx * rx + ry * ry + z * z).sqrt();
                let perp = [-axis[1], axis[0]];
                [rho, -rho].iter().any(|s| {
                    profile.contains([t * axis[0] + s * perp[0], t * axis[1] + s * perp[1]])
                })
            }
            Node::Union(a, b) => a.contains(p) || b.contains(p),
            Node::Difference(a, b) => a.contains(p) && !b.contains(p),
            Node::Intersection(a, b) => a.contains(p) && b.contains(p),
            Node::Transformed { node, inverse, .. } => node.contains(apply(inverse, p)),
        }
    }

    /// Conservative axis-aligned bounds; `None` when provably empty.
    fn bounds(&self) -> Option<BoundingBox> {
        match self {
            Node::Cuboid { half } => Some(BoundingBox::new(
                [-half[0], -half[1], -half[2]],
                *half,
            )),
            Node::Cylinder {
                radius,
                half_height,
            } => Some(BoundingBox::new(
                [-radius, -radius, -half_height],
                [*radius, *radius, *half_height],
            )),
            Node::Sphere { radius } => Some(BoundingBox::new([-radius; 3], [*radius; 3])),
            Node::Torus { major, minor } => {
                let r = major + minor;
                Some(BoundingBox::new([-r, -r, -minor], [r, r, *minor]))
            }
            Node::Lathe { profile } => {
                let r = profile.iter().map(|p| p[0]).fold(0.0, f64::max);
                let z_min = profile.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min);
                let z_max = profile.iter().map(|p| p[1]).fold(f64::NEG_INFINITY, f64::max);
                Some(BoundingBox::new([-r, -r, z_min], [r, r, z_max]))
            }
            Node::Slot {
                half_straight,
                radius,
                half_depth,
            } => {
                let hx = half_straight + radius;
                Some(BoundingBox::new(
                    [-hx, -radius, -half_depth],
                    [hx, *radius, *half_depth],
                ))
            }
            Node::Prism { profile, depth } => {
                let outline = profile.outline(64);
                BoundingBox::from_points(
                    outline
                        .iter()
                        .flat_map(|p| [[p[0], p[1], 0.0], [p[0], p[1], *depth]]),
                )
            }
            Node::Revolution { profile, axis } => {
                let outline = profile.outline(64);
                let perp = [-axis[1], axis[0]];
                let along = outline.iter().map(|p| p[0] * axis[0] + p[1] * axis[1]);
                let t_min = along.clone().fold(f64::INFINITY, f64::min);
                let t_max = along.fold(f64::NEG_INFINITY, f64::max);
                let r = outline
                    .iter()
                    .map(|p| (p[0] * perp[0] + p[1] * perp[1]).abs())
                    .fold(0.0, f64::max);
                let dir = [axis[0], axis[1], 0.0];
                let mut min = [0.0; 3];
                let mut max = [0.0; 3];
                for i in 0..3 {
                    let spread = r * (1.0 - dir[i] * dir[i]).max(0.0).sqrt();
                    min[i] = (t_min * dir[i]).min(t_max * dir[i]) - spread;
                    max[i] = (t_min * dir[i]).max(t_max * dir[i]) + spread;
                }
                Some(BoundingBox::new(min, max))
            }
            Node::Union(a, b) => match (a.bounds(), b.bounds()) {
                (Some(a), Some(b)) => Some(a.union(&b)),
                (a, b) => a.or(b),
            },
            Node::Difference(a, _) => a.bounds(),
            Node::Intersection(a, b) => a.bounds()?.intersection(&b.bounds()?),
            Node::Transformed { node, matrix, .. } => {
                let inner = node.bounds()?;
                BoundingBox::from_points(inner.corners().iter().map(|&c| apply(matrix, c)))
            }
        }
    }
}

/// Deterministic test double for the geometry kernel.
pub struct MockKernel {
    next_handle: u64,
    solids: HashMap<u64, Rc<Node>>,
    fail_booleans: bool,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            solids: HashMap::new(),
            fail_booleans: false,
        }
    }

    /// A kernel whose boolean operations always fail, for exercising error paths.
    pub fn with_failing_booleans() -> Self {
        Self {
            fail_booleans: true,
            ..Self::new()
        }
    }

    fn alloc_handle(&mut self) -> SolidHandle {
        let h = SolidHandle(self.next_handle);
        self.next_handle += 1;
        h
    }

    fn store(&mut self, node: Node) -> SolidHandle {
        let handle = self.alloc_handle();
        self.solids.insert(handle.id(), Rc::new(node));
        handle
    }

    fn node(&self, handle: &SolidHandle) -> Result<Rc<Node>, KernelError> {
        self.solids
            .get(&handle.id())
            .cloned()
            .ok_or(KernelError::SolidNotFound { handle: *handle })
    }

    /// Number of solids created so far.
    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    /// Exact point membership test against the stored CSG tree.
    pub fn contains_point(&self, solid: &SolidHandle, point: [f64; 3]) -> Result<bool, KernelError> {
        Ok(self.node(solid)?.contains(point))
    }

    fn boolean(
        &mut self,
        operation: &str,
        a: &SolidHandle,
        b: &SolidHandle,
        combine: fn(Rc<Node>, Rc<Node>) -> Node,
    ) -> Result<SolidHandle, KernelError> {
        let (na, nb) = (self.node(a)?, self.node(b)?);
        if self.fail_booleans {
            return Err(KernelError::BooleanFailed {
                reason: format!("mock {operation} configured to fail"),
            });
        }
        let node = combine(na, nb);
        if node.bounds().is_none() {
            return Err(KernelError::EmptyResult {
                operation: operation.to_string(),
            });
        }
        Ok(self.store(node))
    }

    fn transformed(
        &mut self,
        solid: &SolidHandle,
        matrix: Matrix4,
        inverse: Matrix4,
    ) -> Result<SolidHandle, KernelError> {
        let node = self.node(solid)?;
        Ok(self.store(Node::Transformed {
            node,
            matrix,
            inverse,
        }))
    }

    /// 6 faces × 2 triangles over the given box, wound outward.
    fn tessellate_box(bbox: &BoundingBox) -> RenderMesh {
        const FACES: [([usize; 4], [f32; 3]); 6] = [
            ([0, 3, 2, 1], [0.0, 0.0, -1.0]),
            ([4, 5, 6, 7], [0.0, 0.0, 1.0]),
            ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
            ([2, 3, 7, 6], [0.0, 1.0, 0.0]),
            ([0, 4, 7, 3], [-1.0, 0.0, 0.0]),
            ([1, 2, 6, 5], [1.0, 0.0, 0.0]),
        ];
        let corners = bbox.corners();
        let mut mesh = RenderMesh::default();
        for (quad, normal) in FACES {
            let base_vertex = mesh.vertex_count() as u32;
            for i in quad {
                let c = corners[i];
                mesh.vertices
                    .extend_from_slice(&[c[0] as f32, c[1] as f32, c[2] as f32]);
                mesh.normals.extend_from_slice(&normal);
            }
            // Two triangles: 0-1-2 and 0-2-3
            mesh.indices.extend_from_slice(&[
                base_vertex,
                base_vertex + 1,
                base_vertex + 2,
                base_vertex,
                base_vertex + 2,
                base_vertex + 3,
            ]);
        }
        mesh
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for MockKernel {
    fn name(&self) -> &str {
        "mock"
    }

    fn make_box(&mut self, x: f64, y: f64, z: f64) -> Result<SolidHandle, KernelError> {
        Ok(self.store(Node::Cuboid {
            half: [x / 2.0, y / 2.0, z / 2.0],
        }))
    }

    fn make_cylinder(&mut self, radius: f64, height: f64) -> Result<SolidHandle, KernelError> {
        Ok(self.store(Node::Cylinder {
            radius,
            half_height: height / 2.0,
        }))
    }

    fn make_sphere(&mut self, radius: f64) -> Result<SolidHandle, KernelError> {
        Ok(self.store(Node::Sphere { radius }))
    }

    fn make_torus(
        &mut self,
        major_radius: f64,
        minor_radius: f64,
    ) -> Result<SolidHandle, KernelError> {
        Ok(self.store(Node::Torus {
            major: major_radius,
            minor: minor_radius,
        }))
    }

    fn make_lathe(&mut self, profile: &[[f64; 2]]) -> Result<SolidHandle, KernelError> {
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
        Ok(self.store(Node::Lathe {
            profile: profile.to_vec(),
        }))
    }

    fn make_slot(
        &mut self,
        length: f64,
        diameter: f64,
        depth: f64,
    ) -> Result<SolidHandle, KernelError> {
        if length < diameter {
            return Err(KernelError::InvalidParameter {
                reason: format!("slot length {length} is shorter than its diameter {diameter}"),
            });
        }
        Ok(self.store(Node::Slot {
            half_straight: (length - diameter) / 2.0,
            radius: diameter / 2.0,
            half_depth: depth / 2.0,
        }))
    }

    fn extrude_profile(
        &mut self,
        profile: &Profile,
        depth: f64,
    ) -> Result<SolidHandle, KernelError> {
        Ok(self.store(Node::Prism {
            profile: profile.clone(),
            depth,
        }))
    }

    fn revolve_profile(
        &mut self,
        profile: &Profile,
        axis: Axis,
    ) -> Result<SolidHandle, KernelError> {
        let axis = crate::primitives::in_plane_axis(axis)?;
        Ok(self.store(Node::Revolution {
            profile: profile.clone(),
            axis,
        }))
    }

    fn boolean_union(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        self.boolean("union", a, b, Node::Union)
    }

    fn boolean_subtract(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        self.boolean("subtraction", a, b, Node::Difference)
    }

    fn boolean_intersect(
        &mut self,
        a: &SolidHandle,
        b: &SolidHandle,
    ) -> Result<SolidHandle, KernelError> {
        self.boolean("intersection", a, b, Node::Intersection)
    }

    fn translate(
        &mut self,
        solid: &SolidHandle,
        offset: [f64; 3],
    ) -> Result<SolidHandle, KernelError> {
        let v = Vector3::new(offset[0], offset[1], offset[2]);
        self.transformed(
            solid,
            Matrix4::from_translation(v),
            Matrix4::from_translation(-v),
        )
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
        let axis = Vector3::new(dir[0], dir[1], dir[2]).normalize();
        self.transformed(
            solid,
            Matrix4::from_axis_angle(axis, Rad(angle)),
            Matrix4::from_axis_angle(axis, Rad(-angle)),
        )
    }

    fn bounding_box(&mut self, solid: &SolidHandle) -> Result<BoundingBox, KernelError> {
        self.node(solid)?
            .bounds()
            .ok_or_else(|| KernelError::EmptyResult {
                operation: "bounding_box".to_string(),
            })
    }

    fn tessellate(
        &mut self,
        solid: &SolidHandle,
        _tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        let bbox = self.bounding_box(solid)?;
        Ok(Self::tessellate_box(&bbox))
    }
}
