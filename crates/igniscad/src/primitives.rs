//! Parametric solids. Every primitive is centered on the origin with its
//! axis (where it has one) along Z.

use crate::entity::Entity;
use crate::error::IgnisError;
use crate::session::Session;
use crate::validate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Clearance class for ISO 273 through holes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HoleFit {
    Close,
    #[default]
    Normal,
    Loose,
}

/// A fit name that is not one of Close, Normal or Loose.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported fit: {0}. Supported fits are: Close, Normal, Loose")]
pub struct UnknownHoleFit(pub String);

impl FromStr for HoleFit {
    type Err = UnknownHoleFit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "close" => Ok(HoleFit::Close),
            "normal" => Ok(HoleFit::Normal),
            "loose" => Ok(HoleFit::Loose),
            _ => Err(UnknownHoleFit(s.to_string())),
        }
    }
}

impl fmt::Display for HoleFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// ISO 273 clearance diameters in mm: (size, close, normal, loose).
const ISO_CLEARANCE: [(&str, f64, f64, f64); 8] = [
    ("M2", 2.2, 2.4, 2.6),
    ("M3", 3.2, 3.4, 3.6),
    ("M4", 4.3, 4.5, 4.8),
    ("M5", 5.3, 5.5, 5.8),
    ("M6", 6.4, 6.6, 7.0),
    ("M8", 8.4, 9.0, 10.0),
    ("M10", 10.5, 11.0, 12.0),
    ("M12", 13.0, 13.5, 14.5),
];

/// Clearance hole diameter for a metric screw size such as "M6" (case-insensitive).
pub fn iso_clearance_diameter(size: &str, fit: HoleFit) -> Option<f64> {
    let size = size.to_ascii_uppercase();
    ISO_CLEARANCE
        .iter()
        .find(|(s, ..)| *s == size)
        .map(|&(_, close, normal, loose)| match fit {
            HoleFit::Close => close,
            HoleFit::Normal => normal,
            HoleFit::Loose => loose,
        })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Cuboid {
        x: f64,
        y: f64,
        z: f64,
    },
    Cylinder {
        radius: f64,
        height: f64,
    },
    Sphere {
        radius: f64,
    },
    Torus {
        major_radius: f64,
        minor_radius: f64,
    },
    Cone {
        bottom_radius: f64,
        top_radius: f64,
        height: f64,
    },
    /// Stadium of overall `length` along X with end `diameter`, `depth` along Z.
    Slot {
        length: f64,
        diameter: f64,
        depth: f64,
    },
    /// Through hole of `radius` with a wider `cb_radius` pocket at the top.
    CounterBoreHole {
        radius: f64,
        cb_radius: f64,
        cb_depth: f64,
        height: f64,
    },
    /// Through hole flaring to `csk_radius` at the top with an included
    /// angle of `csk_angle` degrees.
    CountersinkHole {
        radius: f64,
        csk_radius: f64,
        csk_angle: f64,
        height: f64,
    },
    IsoHole {
        size: String,
        depth: f64,
        fit: HoleFit,
    },
}

impl Primitive {
    /// Name used in error labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Cuboid { .. } => "Box",
            Primitive::Cylinder { .. } => "Cylinder",
            Primitive::Sphere { .. } => "Sphere",
            Primitive::Torus { .. } => "Torus",
            Primitive::Cone { .. } => "Cone",
            Primitive::Slot { .. } => "Slot",
            Primitive::CounterBoreHole { .. } => "CounterBoreHole",
            Primitive::CountersinkHole { .. } => "CountersinkHole",
            Primitive::IsoHole { .. } => "ISO_Hole",
        }
    }

    fn dimensions(&self) -> Vec<(&'static str, f64)> {
        match *self {
            Primitive::Cuboid { x, y, z } => vec![("x", x), ("y", y), ("z", z)],
            Primitive::Cylinder { radius, height } => vec![("r", radius), ("h", height)],
            Primitive::Sphere { radius } => vec![("r", radius)],
            Primitive::Torus {
                major_radius,
                minor_radius,
            } => vec![("major", major_radius), ("minor", minor_radius)],
            Primitive::Cone {
                bottom_radius,
                top_radius,
                height,
            } => vec![
                ("bottom_radius", bottom_radius),
                ("top_radius", top_radius),
                ("h", height),
            ],
            Primitive::Slot {
                length,
                diameter,
                depth,
            } => vec![("length", length), ("diameter", diameter), ("depth", depth)],
            Primitive::CounterBoreHole {
                radius,
                cb_radius,
                cb_depth,
                height,
            } => vec![
                ("radius", radius),
                ("cb_radius", cb_radius),
                ("cb_depth", cb_depth),
                ("height", height),
            ],
            Primitive::CountersinkHole {
                radius,
                csk_radius,
                csk_angle,
                height,
            } => vec![
                ("radius", radius),
                ("csk_radius", csk_radius),
                ("csk_angle", csk_angle),
                ("height", height),
            ],
            Primitive::IsoHole { depth, .. } => vec![("depth", depth)],
        }
    }

    /// Relations between dimensions that positivity alone does not cover.
    fn feasibility(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        match *self {
            Primitive::Torus {
                major_radius,
                minor_radius,
            } if minor_radius >= major_radius => reasons.push(format!(
                "Minor radius {minor_radius} must be smaller than major radius {major_radius}."
            )),
            Primitive::Slot {
                length, diameter, ..
            } if length < diameter => reasons.push(format!(
                "Slot length {length} must be at least its diameter {diameter}."
            )),
            Primitive::CounterBoreHole {
                radius,
                cb_radius,
                cb_depth,
                height,
            } => {
                if cb_radius <= radius {
                    reasons.push(format!(
                        "Counter-bore radius {cb_radius} must exceed hole radius {radius}."
                    ));
                }
                if cb_depth >= height {
                    reasons.push(format!(
                        "Counter-bore depth {cb_depth} must be less than hole height {height}."
                    ));
                }
            }
            Primitive::CountersinkHole {
                radius,
                csk_radius,
                csk_angle,
                height,
            } => {
                if csk_radius <= radius {
                    reasons.push(format!(
                        "Countersink radius {csk_radius} must exceed hole radius {radius}."
                    ));
                }
                if csk_angle >= 180.0 {
                    reasons.push(format!("Countersink angle {csk_angle} must be below 180."));
                } else if countersink_depth(radius, csk_radius, csk_angle) >= height {
                    reasons.push(format!(
                        "Countersink depth {:.3} must be less than hole height {height}.",
                        countersink_depth(radius, csk_radius, csk_angle)
                    ));
                }
            }
            Primitive::IsoHole { ref size, fit, .. } if iso_clearance_diameter(size, fit).is_none() => {
                let supported: Vec<&str> = ISO_CLEARANCE.iter().map(|(s, ..)| *s).collect();
                reasons.push(format!(
                    "Unsupported ISO hole size: {size}. Supported sizes are: {}",
                    supported.join(", ")
                ));
            }
            _ => {}
        }
        reasons
    }
}

fn countersink_depth(radius: f64, csk_radius: f64, csk_angle: f64) -> f64 {
    (csk_radius - radius) / (csk_angle / 2.0).to_radians().tan()
}

impl Session {
    /// Validate and build a primitive.
    pub fn create(&self, primitive: Primitive, name: Option<&str>) -> Result<Entity, IgnisError> {
        let kind = primitive.kind();
        let tolerance = self.config().dimension_tolerance;
        validate::positive_dimensions(kind, name, &primitive.dimensions(), tolerance)?;
        let reasons = primitive.feasibility();
        if !reasons.is_empty() {
            return Err(IgnisError::InvalidParameter {
                label: validate::label(kind, name),
                reasons,
            });
        }

        let result = {
            let mut kernel = self.kernel();
            match primitive {
                Primitive::Cuboid { x, y, z } => kernel.make_box(x, y, z),
                Primitive::Cylinder { radius, height } => kernel.make_cylinder(radius, height),
                Primitive::Sphere { radius } => kernel.make_sphere(radius),
                Primitive::Torus {
                    major_radius,
                    minor_radius,
                } => kernel.make_torus(major_radius, minor_radius),
                Primitive::Cone {
                    bottom_radius,
                    top_radius,
                    height,
                } => {
                    let (lo, hi) = (-height / 2.0, height / 2.0);
                    kernel.make_lathe(&[
                        [0.0, lo],
                        [bottom_radius, lo],
                        [top_radius, hi],
                        [0.0, hi],
                    ])
                }
                Primitive::Slot {
                    length,
                    diameter,
                    depth,
                } => kernel.make_slot(length, diameter, depth),
                Primitive::CounterBoreHole {
                    radius,
                    cb_radius,
                    cb_depth,
                    height,
                } => {
                    let (lo, hi) = (-height / 2.0, height / 2.0);
                    kernel.make_lathe(&[
                        [0.0, lo],
                        [radius, lo],
                        [radius, hi - cb_depth],
                        [cb_radius, hi - cb_depth],
                        [cb_radius, hi],
                        [0.0, hi],
                    ])
                }
                Primitive::CountersinkHole {
                    radius,
                    csk_radius,
                    csk_angle,
                    height,
                } => {
                    let (lo, hi) = (-height / 2.0, height / 2.0);
                    let csk_depth = countersink_depth(radius, csk_radius, csk_angle);
                    kernel.make_lathe(&[
                        [0.0, lo],
                        [radius, lo],
                        [radius, hi - csk_depth],
                        [csk_radius, hi],
                        [0.0, hi],
                    ])
                }
                Primitive::IsoHole { size, depth, fit } => {
                    // Size was checked in feasibility().
                    let diameter = iso_clearance_diameter(&size, fit).unwrap_or_default();
                    kernel.make_cylinder(diameter / 2.0, depth)
                }
            }
        };

        let handle =
            result.map_err(|e| IgnisError::from_kernel(&validate::label(kind, name), e))?;
        debug!(kind, ?name, ?handle, "created primitive");
        Ok(Entity::new(self, handle, name))
    }

    pub fn cuboid(&self, x: f64, y: f64, z: f64, name: Option<&str>) -> Result<Entity, IgnisError> {
        self.create(Primitive::Cuboid { x, y, z }, name)
    }

    pub fn cylinder(&self, radius: f64, height: f64, name: Option<&str>) -> Result<Entity, IgnisError> {
        self.create(Primitive::Cylinder { radius, height }, name)
    }

    pub fn sphere(&self, radius: f64, name: Option<&str>) -> Result<Entity, IgnisError> {
        self.create(Primitive::Sphere { radius }, name)
    }

    pub fn torus(
        &self,
        major_radius: f64,
        minor_radius: f64,
        name: Option<&str>,
    ) -> Result<Entity, IgnisError> {
        self.create(
            Primitive::Torus {
                major_radius,
                minor_radius,
            },
            name,
        )
    }

    pub fn cone(
        &self,
        bottom_radius: f64,
        top_radius: f64,
        height: f64,
        name: Option<&str>,
    ) -> Result<Entity, IgnisError> {
        self.create(
            Primitive::Cone {
                bottom_radius,
                top_radius,
                height,
            },
            name,
        )
    }

    pub fn slot(
        &self,
        length: f64,
        diameter: f64,
        depth: f64,
        name: Option<&str>,
    ) -> Result<Entity, IgnisError> {
        self.create(
            Primitive::Slot {
                length,
                diameter,
                depth,
            },
            name,
        )
    }

    pub fn counterbore_hole(
        &self,
        radius: f64,
        cb_radius: f64,
        cb_depth: f64,
        height: f64,
        name: Option<&str>,
    ) -> Result<Entity, IgnisError> {
        self.create(
            Primitive::CounterBoreHole {
                radius,
                cb_radius,
                cb_depth,
                height,
            },
            name,
        )
    }

    pub fn countersink_hole(
        &self,
        radius: f64,
        csk_radius: f64,
        csk_angle: f64,
        height: f64,
        name: Option<&str>,
    ) -> Result<Entity, IgnisError> {
        self.create(
            Primitive::CountersinkHole {
                radius,
                csk_radius,
                csk_angle,
                height,
            },
            name,
        )
    }

    pub fn iso_hole(
        &self,
        size: &str,
        depth: f64,
        fit: HoleFit,
        name: Option<&str>,
    ) -> Result<Entity, IgnisError> {
        self.create(
            Primitive::IsoHole {
                size: size.to_string(),
                depth,
                fit,
            },
            name,
        )
    }

    /// `iso_hole` with the fit given by name, e.g. "loose".
    pub fn iso_hole_with_fit(
        &self,
        size: &str,
        depth: f64,
        fit: &str,
        name: Option<&str>,
    ) -> Result<Entity, IgnisError> {
        let fit = fit
            .parse::<HoleFit>()
            .map_err(|e| IgnisError::InvalidParameter {
                label: validate::label("ISO_Hole", name),
                reasons: vec![e.to_string()],
            })?;
        self.iso_hole(size, depth, fit, name)
    }
}
