//! Turning a finished Model into a file or an on-screen preview.

use crate::error::IgnisError;
use crate::model::Model;
use ignis_export::{
    encode_ascii_stl, encode_binary_stl, write_atomically, CombineMode, ExportError,
    ExportFormat, ExportOptions,
};
use ignis_kernel::RenderMesh;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Something that can display a tessellated model, e.g. a browser viewer bridge.
pub trait Viewer {
    fn name(&self) -> &str;

    fn display(&self, label: &str, mesh: &RenderMesh) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowMode {
    /// Write the model to disk.
    #[default]
    Export,
    /// Hand the mesh to the session's viewer.
    View,
    /// Try the viewer, export if it is missing or fails.
    Fallback,
}

/// Per-call overrides. Unset fields fall back to the session config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowOptions {
    pub destination: Option<PathBuf>,
    pub export: Option<ExportOptions>,
}

impl ShowOptions {
    pub fn to_path(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: Some(destination.into()),
            export: None,
        }
    }

    pub fn with_export(mut self, export: ExportOptions) -> Self {
        self.export = Some(export);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowOutcome {
    Exported(PathBuf),
    Viewed,
}

/// Display or export `model` according to `mode`.
///
/// A successful export seals the model; later `add` and `show` calls fail
/// with `AlreadyExported`.
#[instrument(skip_all, fields(model = model.name(), ?mode))]
pub fn show(model: &mut Model, mode: ShowMode, options: &ShowOptions) -> Result<ShowOutcome, IgnisError> {
    model.ensure_open()?;
    if model.is_empty() {
        return Err(IgnisError::EmptyModel {
            model: model.name().to_string(),
        });
    }
    let export = options
        .export
        .clone()
        .unwrap_or_else(|| model.session().config().export.clone());

    match mode {
        ShowMode::Export => export_model(model, &export, options),
        ShowMode::View => {
            view_model(model, &export)?;
            Ok(ShowOutcome::Viewed)
        }
        ShowMode::Fallback => match view_model(model, &export) {
            Ok(()) => Ok(ShowOutcome::Viewed),
            Err(err @ (IgnisError::ViewerUnavailable | IgnisError::Viewer { .. })) => {
                warn!(error = %err, "viewer unavailable, exporting instead");
                export_model(model, &export, options)
            }
            Err(err) => Err(err),
        },
    }
}

fn view_model(model: &Model, export: &ExportOptions) -> Result<(), IgnisError> {
    let viewer = model
        .session()
        .viewer()
        .ok_or(IgnisError::ViewerUnavailable)?;
    let mesh = model_mesh(model, export)?;
    viewer
        .display(model.name(), &mesh)
        .map_err(|reason| IgnisError::Viewer {
            viewer: viewer.name().to_string(),
            reason,
        })?;
    info!(viewer = viewer.name(), triangles = mesh.triangle_count(), "model sent to viewer");
    Ok(())
}

/// One mesh for the whole model: a union of all parts, or every part's mesh
/// side by side.
fn model_mesh(model: &Model, export: &ExportOptions) -> Result<RenderMesh, IgnisError> {
    match export.combine {
        CombineMode::Union => model.combined()?.tessellate(export.tolerance),
        CombineMode::Compound => {
            let mut mesh = RenderMesh::default();
            for part in model.entities() {
                mesh.append(&part.tessellate(export.tolerance)?);
            }
            Ok(mesh)
        }
    }
}

fn export_model(
    model: &mut Model,
    export: &ExportOptions,
    options: &ShowOptions,
) -> Result<ShowOutcome, IgnisError> {
    let path = options.destination.clone().unwrap_or_else(|| {
        model
            .session()
            .config()
            .output_dir
            .join(format!("{}.{}", model.name(), export.format.extension()))
    });

    let bytes = match export.format {
        ExportFormat::StlBinary | ExportFormat::StlAscii => {
            let mesh = model_mesh(model, export)?;
            if mesh.is_empty() {
                return Err(ExportError::EmptyMesh.into());
            }
            info!(triangles = mesh.triangle_count(), "tessellated model");
            if export.format == ExportFormat::StlBinary {
                encode_binary_stl(&mesh)?
            } else {
                encode_ascii_stl(&mesh)?.into_bytes()
            }
        }
        ExportFormat::Step => {
            let solid = match export.combine {
                CombineMode::Union => model.combined()?,
                CombineMode::Compound if model.len() == 1 => model.entities()[0].clone(),
                CombineMode::Compound => {
                    return Err(ExportError::RequiresSingleSolid {
                        format: export.format.label().to_string(),
                        count: model.len(),
                    }
                    .into())
                }
            };
            model
                .session()
                .kernel()
                .export_step(&solid.handle(), model.name())
                .map_err(|e| ExportError::Kernel(e.to_string()))?
                .into_bytes()
        }
    };

    write_atomically(&path, &bytes)?;
    model.mark_exported();
    info!(path = %path.display(), format = export.format.label(), "model exported");
    Ok(ShowOutcome::Exported(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingViewer {
        shown: RefCell<Vec<(String, usize)>>,
        fail: bool,
    }

    impl Viewer for RecordingViewer {
        fn name(&self) -> &str {
            "recording"
        }

        fn display(&self, label: &str, mesh: &RenderMesh) -> Result<(), String> {
            if self.fail {
                return Err("connection refused".to_string());
            }
            self.shown
                .borrow_mut()
                .push((label.to_string(), mesh.triangle_count()));
            Ok(())
        }
    }

    fn populated(session: &Session, name: &str) -> Model {
        let mut model = Model::new(session, name);
        model.add(session.cuboid(2.0, 2.0, 2.0, Some("a")).unwrap()).unwrap();
        model
            .add(session.sphere(1.0, Some("b")).unwrap().moved(3.0, 0.0, 0.0).unwrap())
            .unwrap();
        model
    }

    #[test]
    fn test_view_without_viewer() {
        let session = Session::mock();
        let mut model = populated(&session, "Parts");
        let err = show(&mut model, ShowMode::View, &ShowOptions::default()).unwrap_err();
        assert!(matches!(err, IgnisError::ViewerUnavailable));
    }

    #[test]
    fn test_view_does_not_seal_model() {
        let session = Session::mock();
        let viewer = Rc::new(RecordingViewer::default());
        session.set_viewer(viewer.clone());
        let mut model = populated(&session, "Parts");

        let outcome = show(&mut model, ShowMode::View, &ShowOptions::default()).unwrap();
        assert_eq!(outcome, ShowOutcome::Viewed);
        assert_eq!(viewer.shown.borrow()[0].0, "Parts");
        assert!(!model.is_exported());
    }

    #[test]
    fn test_compound_mesh_keeps_every_part() {
        let session = Session::mock();
        let viewer = Rc::new(RecordingViewer::default());
        session.set_viewer(viewer.clone());
        let mut model = populated(&session, "Parts");
        let options = ShowOptions::default().with_export(ExportOptions {
            combine: CombineMode::Compound,
            ..Default::default()
        });

        show(&mut model, ShowMode::View, &options).unwrap();
        // Two bounding-box proxies of 12 triangles each.
        assert_eq!(viewer.shown.borrow()[0].1, 24);
    }

    #[test]
    fn test_fallback_exports_when_viewer_fails() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::mock();
        session.set_viewer(Rc::new(RecordingViewer {
            fail: true,
            ..Default::default()
        }));
        let mut model = populated(&session, "Parts");
        let path = dir.path().join("parts.stl");

        let outcome = show(&mut model, ShowMode::Fallback, &ShowOptions::to_path(&path)).unwrap();
        assert_eq!(outcome, ShowOutcome::Exported(path.clone()));
        assert!(path.exists());
        assert!(model.is_exported());
    }

    #[test]
    fn test_fallback_propagates_mesh_errors() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::mock();
        let viewer = Rc::new(RecordingViewer::default());
        session.set_viewer(viewer.clone());
        let mut model = populated(&session, "Parts");
        let path = dir.path().join("parts.stl");
        let options = ShowOptions::to_path(&path).with_export(ExportOptions {
            tolerance: 0.0,
            ..Default::default()
        });

        let err = show(&mut model, ShowMode::Fallback, &options).unwrap_err();
        assert!(matches!(err, IgnisError::InvalidParameter { .. }));
        assert!(viewer.shown.borrow().is_empty());
        assert!(!path.exists());
        assert!(!model.is_exported());
    }

    #[test]
    fn test_step_compound_needs_single_part() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::mock();
        let mut model = populated(&session, "Parts");
        let options = ShowOptions::to_path(dir.path().join("parts.step")).with_export(ExportOptions {
            format: ExportFormat::Step,
            combine: CombineMode::Compound,
            ..Default::default()
        });

        let err = show(&mut model, ShowMode::Export, &options).unwrap_err();
        assert!(matches!(
            err,
            IgnisError::Export(ExportError::RequiresSingleSolid { count: 2, .. })
        ));
    }

    #[test]
    fn test_step_on_mock_kernel_is_kernel_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::mock();
        let mut model = populated(&session, "Parts");
        let path = dir.path().join("parts.step");
        let options = ShowOptions::to_path(&path).with_export(ExportOptions {
            format: ExportFormat::Step,
            ..Default::default()
        });

        let err = show(&mut model, ShowMode::Export, &options).unwrap_err();
        assert!(matches!(err, IgnisError::Export(ExportError::Kernel(_))));
        assert!(!path.exists());
        assert!(!model.is_exported());
    }
}
