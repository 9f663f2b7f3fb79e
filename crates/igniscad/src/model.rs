use crate::entity::Entity;
use crate::error::IgnisError;
use crate::session::Session;
use crate::show::{self, ShowMode, ShowOptions, ShowOutcome};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// What `Model::scoped` does once the build closure succeeds.
#[derive(Debug, Clone, Default)]
pub enum OnExit {
    #[default]
    Keep,
    Show(ShowMode, ShowOptions),
}

/// An ordered collection of parts with a name index.
///
/// Named parts are unique; unnamed parts are kept for export but cannot be
/// looked up.
#[derive(Debug)]
pub struct Model {
    name: String,
    session: Session,
    parts: Vec<Entity>,
    index: HashMap<String, usize>,
    exported: bool,
}

impl Model {
    pub fn new(session: &Session, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            session: session.clone(),
            parts: Vec::new(),
            index: HashMap::new(),
            exported: false,
        }
    }

    /// Build a model inside `build`, then run `on_exit`.
    ///
    /// If `build` fails nothing is exported and its error is returned as is.
    pub fn scoped<F>(
        session: &Session,
        name: impl Into<String>,
        on_exit: OnExit,
        build: F,
    ) -> Result<Model, IgnisError>
    where
        F: FnOnce(&mut Model) -> Result<(), IgnisError>,
    {
        let mut model = Model::new(session, name);
        build(&mut model)?;
        if let OnExit::Show(mode, options) = on_exit {
            model.show(mode, &options)?;
        }
        Ok(model)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Append a part, registering it under its name when it has one.
    pub fn add(&mut self, entity: Entity) -> Result<&mut Self, IgnisError> {
        self.ensure_open()?;
        if !entity.session().ptr_eq(&self.session) {
            return Err(IgnisError::ForeignEntity);
        }
        if let Some(name) = entity.name() {
            if self.index.contains_key(name) {
                return Err(IgnisError::DuplicateName {
                    name: name.to_string(),
                    model: self.name.clone(),
                });
            }
            self.index.insert(name.to_string(), self.parts.len());
        }
        debug!(model = %self.name, part = ?entity.name(), "part added");
        self.parts.push(entity);
        Ok(self)
    }

    /// The part registered under `name`.
    pub fn find(&self, name: &str) -> Result<&Entity, IgnisError> {
        self.index
            .get(name)
            .map(|&i| &self.parts[i])
            .ok_or_else(|| IgnisError::EntityNotFound {
                name: name.to_string(),
                model: self.name.clone(),
            })
    }

    /// Short alias for [`Model::find`].
    pub fn f(&self, name: &str) -> Result<&Entity, IgnisError> {
        self.find(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Parts in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.parts
    }

    /// Registered names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(Entity::name)
    }

    pub fn is_exported(&self) -> bool {
        self.exported
    }

    /// Union of every part in insertion order.
    #[instrument(skip(self), fields(model = %self.name, parts = self.parts.len()))]
    pub fn combined(&self) -> Result<Entity, IgnisError> {
        let (first, rest) = self.parts.split_first().ok_or_else(|| IgnisError::EmptyModel {
            model: self.name.clone(),
        })?;
        rest.iter()
            .try_fold(first.clone(), |acc, part| acc.union(part))
    }

    pub fn show(&mut self, mode: ShowMode, options: &ShowOptions) -> Result<ShowOutcome, IgnisError> {
        show::show(self, mode, options)
    }

    pub(crate) fn ensure_open(&self) -> Result<(), IgnisError> {
        if self.exported {
            return Err(IgnisError::AlreadyExported {
                model: self.name.clone(),
            });
        }
        Ok(())
    }

    pub(crate) fn mark_exported(&mut self) {
        self.exported = true;
    }
}

impl Session {
    pub fn model(&self, name: impl Into<String>) -> Model {
        Model::new(self, name)
    }
}
