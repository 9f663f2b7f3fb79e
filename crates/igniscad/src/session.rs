use crate::config::IgnisConfig;
use crate::show::Viewer;
use ignis_kernel::{Kernel, MockKernel, TruckKernel};
use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

struct Inner {
    kernel: RefCell<Box<dyn Kernel>>,
    viewer: RefCell<Option<Rc<dyn Viewer>>>,
    config: IgnisConfig,
}

/// Shared handle to one kernel instance and its settings.
///
/// Every Entity keeps its Session alive; clones are cheap and refer to the
/// same kernel. Not `Send`: a session belongs to the thread that made it.
#[derive(Clone)]
pub struct Session {
    inner: Rc<Inner>,
}

impl Session {
    pub fn new(kernel: Box<dyn Kernel>, config: IgnisConfig) -> Self {
        Self {
            inner: Rc::new(Inner {
                kernel: RefCell::new(kernel),
                viewer: RefCell::new(None),
                config,
            }),
        }
    }

    /// Session on the truck B-rep kernel with default settings.
    pub fn truck() -> Self {
        Self::truck_with_config(IgnisConfig::default())
    }

    pub fn truck_with_config(config: IgnisConfig) -> Self {
        let kernel = TruckKernel::with_tolerances(config.boolean_tolerance, config.mesh_tolerance);
        Self::new(Box::new(kernel), config)
    }

    /// Session on the deterministic mock kernel.
    pub fn mock() -> Self {
        Self::mock_with_config(IgnisConfig::default())
    }

    pub fn mock_with_config(config: IgnisConfig) -> Self {
        Self::new(Box::new(MockKernel::new()), config)
    }

    pub fn config(&self) -> &IgnisConfig {
        &self.inner.config
    }

    pub fn kernel_name(&self) -> String {
        match self.inner.kernel.try_borrow() {
            Ok(kernel) => kernel.name().to_string(),
            Err(_) => "<busy>".to_string(),
        }
    }

    /// Attach (or replace) the viewer used by `ShowMode::View` and `Fallback`.
    pub fn set_viewer(&self, viewer: Rc<dyn Viewer>) {
        *self.inner.viewer.borrow_mut() = Some(viewer);
    }

    pub(crate) fn viewer(&self) -> Option<Rc<dyn Viewer>> {
        self.inner.viewer.borrow().clone()
    }

    pub(crate) fn kernel(&self) -> RefMut<'_, Box<dyn Kernel>> {
        self.inner.kernel.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &Session) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("kernel", &self.kernel_name())
            .finish_non_exhaustive()
    }
}
