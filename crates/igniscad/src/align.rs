//! Bounding-box driven placement of one entity against another.

use crate::entity::Entity;
use crate::error::IgnisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side of a target's bounding box to snap against.
///
/// Front is the -Y side, back is +Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    Top,
    Bottom,
    Left,
    Right,
    Front,
    Back,
}

impl Face {
    fn as_str(self) -> &'static str {
        match self {
            Face::Top => "top",
            Face::Bottom => "bottom",
            Face::Left => "left",
            Face::Right => "right",
            Face::Front => "front",
            Face::Back => "back",
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Face {
    type Err = IgnisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(Face::Top),
            "bottom" => Ok(Face::Bottom),
            "left" => Ok(Face::Left),
            "right" => Ok(Face::Right),
            "front" => Ok(Face::Front),
            "back" => Ok(Face::Back),
            _ => Err(IgnisError::InvalidParameter {
                label: "align".to_string(),
                reasons: vec![format!(
                    "Unknown face: {s}. Use top/bottom/left/right/front/back"
                )],
            }),
        }
    }
}

impl Entity {
    /// Maximum Z of the bounding box.
    pub fn top(&self) -> Result<f64, IgnisError> {
        Ok(self.bbox()?.max[2])
    }

    /// Maximum X of the bounding box.
    pub fn right(&self) -> Result<f64, IgnisError> {
        Ok(self.bbox()?.max[0])
    }

    /// Half the X extent. Only meaningful for round shapes.
    pub fn radius(&self) -> Result<f64, IgnisError> {
        Ok(self.bbox()?.size()[0] / 2.0)
    }

    /// Move so this entity's bounding box sits centered against `face` of
    /// `target`. A positive `offset` leaves a gap, a negative one embeds.
    pub fn align(&self, target: &Entity, face: Face, offset: f64) -> Result<Entity, IgnisError> {
        let t_box = target.bbox()?;
        let s_box = self.bbox()?;
        let size = s_box.size();
        let mut dest = t_box.center();

        match face {
            Face::Top => dest[2] = t_box.max[2] + size[2] / 2.0 + offset,
            Face::Bottom => dest[2] = t_box.min[2] - size[2] / 2.0 - offset,
            Face::Right => dest[0] = t_box.max[0] + size[0] / 2.0 + offset,
            Face::Left => dest[0] = t_box.min[0] - size[0] / 2.0 - offset,
            Face::Back => dest[1] = t_box.max[1] + size[1] / 2.0 + offset,
            Face::Front => dest[1] = t_box.min[1] - size[1] / 2.0 - offset,
        }

        let current = s_box.center();
        self.moved(
            dest[0] - current[0],
            dest[1] - current[1],
            dest[2] - current[2],
        )
    }

    pub fn on_top_of(&self, target: &Entity, offset: f64) -> Result<Entity, IgnisError> {
        self.align(target, Face::Top, offset)
    }

    pub fn under(&self, target: &Entity, offset: f64) -> Result<Entity, IgnisError> {
        self.align(target, Face::Bottom, offset)
    }

    pub fn right_of(&self, target: &Entity, offset: f64) -> Result<Entity, IgnisError> {
        self.align(target, Face::Right, offset)
    }

    pub fn left_of(&self, target: &Entity, offset: f64) -> Result<Entity, IgnisError> {
        self.align(target, Face::Left, offset)
    }

    pub fn in_front_of(&self, target: &Entity, offset: f64) -> Result<Entity, IgnisError> {
        self.align(target, Face::Front, offset)
    }

    pub fn behind(&self, target: &Entity, offset: f64) -> Result<Entity, IgnisError> {
        self.align(target, Face::Back, offset)
    }
}
