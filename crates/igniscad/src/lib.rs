//! Named solids composed into models and exported to STL.
//!
//! ```no_run
//! use igniscad::{Model, OnExit, Session, ShowMode, ShowOptions};
//!
//! let session = Session::truck();
//! Model::scoped(&session, "Example", OnExit::Show(ShowMode::Export, ShowOptions::default()), |m| {
//!     m.add(session.cylinder(5.0, 38.0, Some("pole"))?)?;
//!     Ok(())
//! })?;
//! # Ok::<(), igniscad::IgnisError>(())
//! ```

pub mod align;
pub mod config;
pub mod entity;
pub mod error;
pub mod group;
pub mod model;
pub mod primitives;
pub mod session;
pub mod show;
pub mod sketch;
mod validate;

pub use align::Face;
pub use config::{ConfigError, IgnisConfig};
pub use entity::Entity;
pub use error::IgnisError;
pub use group::Group;
pub use model::{Model, OnExit};
pub use primitives::{HoleFit, Primitive, UnknownHoleFit};
pub use session::Session;
pub use show::{show, ShowMode, ShowOptions, ShowOutcome, Viewer};
pub use sketch::Sketch;

pub use ignis_export::{CombineMode, ExportFormat, ExportOptions};
pub use ignis_kernel::{Axis, BoundingBox, RenderMesh};
