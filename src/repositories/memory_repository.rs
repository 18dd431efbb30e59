//! Repositorio en memoria
//!
//! Colección ordenada de entidades con acceso por id. Conserva el orden de
//! inserción (los listados y filtros dependen de él) y recuerda todos los
//! ids emitidos para no reutilizarlos después de un borrado.

use std::collections::HashSet;
use std::hash::Hash;
use uuid::Uuid;

use crate::models::{Driver, DriverId, Route, RouteId};

/// Entidad almacenable en un `MemoryRepository`
pub trait Entity: Clone {
    type Id: Clone + Eq + Hash + From<String> + std::fmt::Display;

    fn id(&self) -> &Self::Id;
}

impl Entity for Driver {
    type Id = DriverId;

    fn id(&self) -> &DriverId {
        &self.id
    }
}

impl Entity for Route {
    type Id = RouteId;

    fn id(&self) -> &RouteId {
        &self.id
    }
}

pub struct MemoryRepository<T: Entity> {
    items: Vec<T>,
    issued_ids: HashSet<T::Id>,
}

pub type DriverRepository = MemoryRepository<Driver>;
pub type RouteRepository = MemoryRepository<Route>;

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            issued_ids: HashSet::new(),
        }
    }

    /// Generar un id que nunca se haya emitido en este repositorio
    pub fn next_id(&self) -> T::Id {
        loop {
            let candidate = T::Id::from(Uuid::new_v4().to_string());
            if !self.issued_ids.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Verificar si un id ya fue emitido (aunque la entidad se haya borrado)
    pub fn was_issued(&self, id: &T::Id) -> bool {
        self.issued_ids.contains(id)
    }

    /// Insertar al final de la colección
    ///
    /// Devuelve `false` sin modificar nada si el id ya fue emitido.
    pub fn insert(&mut self, item: T) -> bool {
        if !self.issued_ids.insert(item.id().clone()) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn find_by_id(&self, id: &T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Reemplazar el registro con el mismo id, conservando su posición
    ///
    /// Devuelve el registro anterior, o `None` si el id no existe.
    pub fn replace(&mut self, item: T) -> Option<T> {
        let index = self.items.iter().position(|current| current.id() == item.id())?;
        Some(std::mem::replace(&mut self.items[index], item))
    }

    pub fn delete(&mut self, id: &T::Id) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn all(&self) -> &[T] {
        &self.items
    }

    /// Copia inmutable de la colección completa
    pub fn snapshot(&self) -> Vec<T> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
