use crate::entity::Entity;
use crate::error::IgnisError;
use crate::session::Session;
use tracing::debug;

/// Members are unioned as they are added; the result behaves like any Entity.
#[derive(Debug, Clone)]
pub struct Group {
    name: Option<String>,
    session: Session,
    shape: Option<Entity>,
}

impl Group {
    pub fn new(session: &Session, name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_string),
            session: session.clone(),
            shape: None,
        }
    }

    /// Build a group inside `build` and return it as an Entity.
    pub fn scoped<F>(session: &Session, name: Option<&str>, build: F) -> Result<Entity, IgnisError>
    where
        F: FnOnce(&mut Group) -> Result<(), IgnisError>,
    {
        let mut group = Group::new(session, name);
        build(&mut group)?;
        group.into_entity()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.shape.is_none()
    }

    pub fn add(&mut self, entity: &Entity) -> Result<&mut Self, IgnisError> {
        if !entity.session().ptr_eq(&self.session) {
            return Err(IgnisError::ForeignEntity);
        }
        let shape = match self.shape.take() {
            None => entity.clone(),
            Some(current) => match current.union(entity) {
                Ok(shape) => shape,
                Err(err) => {
                    self.shape = Some(current);
                    return Err(err);
                }
            },
        };
        debug!(group = ?self.name, member = ?entity.name(), "member added");
        self.shape = Some(shape);
        Ok(self)
    }

    /// The unioned shape, carrying the group's name.
    pub fn into_entity(self) -> Result<Entity, IgnisError> {
        let shape = self.shape.ok_or_else(|| IgnisError::EmptyGroup {
            group: self.name.clone().unwrap_or_else(|| "Group<Pending>".to_string()),
        })?;
        Ok(match self.name {
            Some(name) => shape.with_name(name),
            None => Entity::new(&self.session, shape.handle(), None),
        })
    }
}

impl Session {
    pub fn group(&self, name: Option<&str>) -> Group {
        Group::new(self, name)
    }
}
