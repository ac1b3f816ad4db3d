//! Shared state that is hydrated exactly once and mutated freely afterwards.

use std::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Store is already initialized.")]
    AlreadyInitialized,
    #[error("Store is not initialized.")]
    Uninitialized,
    #[error("Store lock is poisoned.")]
    Poisoned,
}

#[derive(Debug)]
enum State<T> {
    Uninitialized,
    Initialized(T),
}

#[derive(Debug)]
pub struct Store<T> {
    state: RwLock<State<T>>,
}

impl<T: Clone> Store<T> {
    pub fn new() -> Self {
        Store {
            state: RwLock::new(State::Uninitialized),
        }
    }

    /// Sets the initial value. Only the first call wins.
    pub fn hydrate(&self, value: T) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        match *state {
            State::Initialized(_) => Err(StoreError::AlreadyInitialized),
            State::Uninitialized => {
                *state = State::Initialized(value);
                Ok(())
            }
        }
    }

    pub fn get(&self) -> Result<T, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        match &*state {
            State::Initialized(value) => Ok(value.clone()),
            State::Uninitialized => Err(StoreError::Uninitialized),
        }
    }

    /// Applies `f` to a copy of the stored value and commits the copy only
    /// when `f` returns `Ok`.
    pub fn update<F, E>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut T) -> Result<(), E>,
        E: From<StoreError>,
    {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        match &mut *state {
            State::Initialized(value) => {
                let mut candidate = value.clone();
                f(&mut candidate)?;
                *value = candidate.clone();
                Ok(candidate)
            }
            State::Uninitialized => Err(StoreError::Uninitialized.into()),
        }
    }
}

impl<T: Clone> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}
