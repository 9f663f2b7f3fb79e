use serde::{Deserialize, Serialize};

/// Opaque handle to a solid in the geometry kernel.
/// NEVER persisted. Valid only for the kernel that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SolidHandle(pub(crate) u64);

impl SolidHandle {
    pub(crate) fn id(&self) -> u64 {
        self.0
    }
}

/// Errors from kernel operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("{operation} produced an empty solid")]
    EmptyResult { operation: String },

    #[error("shape construction failed: {reason}")]
    ConstructionFailed { reason: String },

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("tessellation failed: {reason}")]
    TessellationFailed { reason: String },

    #[error("solid not found: {handle:?}")]
    SolidNotFound { handle: SolidHandle },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },
}

/// Principal or custom rotation axis through the world origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    Custom([f64; 3]),
}

impl Axis {
    /// Unit direction of the axis, or `None` for a zero-length custom axis.
    pub fn direction(&self) -> Option<[f64; 3]> {
        match *self {
            Axis::X => Some([1.0, 0.0, 0.0]),
            Axis::Y => Some([0.0, 1.0, 0.0]),
            Axis::Z => Some([0.0, 0.0, 1.0]),
            Axis::Custom(d) => {
                let len = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
                if len < 1e-12 || !len.is_finite() {
                    None
                } else {
                    Some([d[0] / len, d[1] / len, d[2] / len])
                }
            }
        }
    }
}

/// Axis-aligned bounding box in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point; `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = [f64; 3]>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self::new(first, first);
        for p in iter {
            for i in 0..3 {
                bbox.min[i] = bbox.min[i].min(p[i]);
                bbox.max[i] = bbox.max[i].max(p[i]);
            }
        }
        Some(bbox)
    }

    pub fn center(&self) -> [f64; 3] {
        [
            (self.min[0] + self.max[0]) / 2.0,
            (self.min[1] + self.max[1]) / 2.0,
            (self.min[2] + self.max[2]) / 2.0,
        ]
    }

    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut out = *self;
        for i in 0..3 {
            out.min[i] = out.min[i].min(other.min[i]);
            out.max[i] = out.max[i].max(other.max[i]);
        }
        out
    }

    /// Overlap of two boxes, `None` when they do not overlap with positive volume.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let mut out = *self;
        for i in 0..3 {
            out.min[i] = out.min[i].max(other.min[i]);
            out.max[i] = out.max[i].min(other.max[i]);
            if out.max[i] <= out.min[i] {
                return None;
            }
        }
        Some(out)
    }

    pub fn contains(&self, p: [f64; 3]) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    /// The eight corners, bottom face first.
    pub fn corners(&self) -> [[f64; 3]; 8] {
        let (a, b) = (self.min, self.max);
        [
            [a[0], a[1], a[2]],
            [b[0], a[1], a[2]],
            [b[0], b[1], a[2]],
            [a[0], b[1], a[2]],
            [a[0], a[1], b[2]],
            [b[0], a[1], b[2]],
            [b[0], b[1], b[2]],
            [a[0], b[1], b[2]],
        ]
    }
}

/// Closed planar profile in the XY plane, centered on the origin unless
/// given as explicit points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Profile {
    Rectangle { width: f64, height: f64 },
    Circle { radius: f64 },
    Polygon { points: Vec<[f64; 2]> },
}

impl Profile {
    /// Polyline approximation of the boundary, counter-clockwise.
    pub fn outline(&self, segments: usize) -> Vec<[f64; 2]> {
        match self {
            Profile::Rectangle { width, height } => {
                let (w, h) = (width / 2.0, height / 2.0);
                vec![[-w, -h], [w, -h], [w, h], [-w, h]]
            }
            Profile::Circle { radius } => {
                let n = segments.max(8);
                (0..n)
                    .map(|i| {
                        let t = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
                        [radius * t.cos(), radius * t.sin()]
                    })
                    .collect()
            }
            Profile::Polygon { points } => {
                if signed_area(points) < 0.0 {
                    points.iter().rev().copied().collect()
                } else {
                    points.clone()
                }
            }
        }
    }

    /// Point membership in the closed region.
    pub fn contains(&self, p: [f64; 2]) -> bool {
        match self {
            Profile::Rectangle { width, height } => {
                p[0].abs() <= width / 2.0 && p[1].abs() <= height / 2.0
            }
            Profile::Circle { radius } => p[0] * p[0] + p[1] * p[1] <= radius * radius,
            Profile::Polygon { points } => point_in_polygon(points, p),
        }
    }
}

/// Signed area of a 2D polygon (shoelace). Positive for counter-clockwise.
pub fn signed_area(pts: &[[f64; 2]]) -> f64 {
    let n = pts.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += pts[i][0] * pts[j][1];
        area -= pts[j][0] * pts[i][1];
    }
    area / 2.0
}

/// Even-odd ray casting test.
pub fn point_in_polygon(pts: &[[f64; 2]], p: [f64; 2]) -> bool {
    let n = pts.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (pts[i], pts[j]);
        if (a[1] > p[1]) != (b[1] > p[1]) {
            let x = a[0] + (p[1] - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
            if p[0] <= x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Tessellated triangle mesh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderMesh {
    /// Flat array of vertex positions [x0, y0, z0, x1, y1, z1, ...].
    pub vertices: Vec<f32>,
    /// Flat array of vertex normals [nx0, ny0, nz0, nx1, ny1, nz1, ...].
    pub normals: Vec<f32>,
    /// Triangle indices into the vertex array.
    pub indices: Vec<u32>,
}

impl RenderMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append another mesh, re-basing its indices.
    pub fn append(&mut self, other: &RenderMesh) {
        let base = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}
