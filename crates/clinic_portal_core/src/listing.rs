//! crates/clinic_portal_core/src/listing.rs
//!
//! The state of a displayed list. An empty result is its own state so the
//! front-end renders "nothing here" rather than an empty list.

use crate::ports::{PortError, PortResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing<T> {
    NotLoaded,
    Empty,
    Items(Vec<T>),
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Listing::NotLoaded
    }
}

impl<T> Listing<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            Listing::Empty
        } else {
            Listing::Items(items)
        }
    }

    /// Treats a 404 from a listing endpoint as an empty result. Every other
    /// failure is passed through.
    pub fn from_fetch(result: PortResult<Vec<T>>) -> PortResult<Self> {
        match result {
            Ok(items) => Ok(Self::from_items(items)),
            Err(PortError::NotFound(_)) => Ok(Listing::Empty),
            Err(e) => Err(e),
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Listing::Items(items) => items,
            _ => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn is_loaded(&self) -> bool {
        !matches!(self, Listing::NotLoaded)
    }
}
