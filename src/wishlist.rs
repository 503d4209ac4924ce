use std::path::PathBuf;

use tracing::warn;

use crate::storage::{read_json, write_json, DataDir};

const WISHLIST_FILE: &str = "wishlist.json";

/// Ordered set of wishlisted product ids, written through to disk on every
/// change.
///
/// Persistence is best effort: an unreadable file loads as an empty
/// wishlist and failed writes are only logged.
#[derive(Debug)]
pub struct Wishlist {
    path: PathBuf,
    ids: Vec<String>,
}

impl Wishlist {
    /// Reads `state/wishlist.json`, starting empty when it is missing or corrupt.
    pub fn load(data_dir: &DataDir) -> Self {
        let path = data_dir.state_file(WISHLIST_FILE);

        let ids = if path.exists() {
            read_json::<Vec<String>>(&path).unwrap_or_else(|e| {
                warn!(error = %e, "discarding unreadable wishlist");
                Vec::new()
            })
        } else {
            Vec::new()
        };

        Self { path, ids }
    }

    /// Ids in the order they were added.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Checks whether a product is wishlisted.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|i| i == id)
    }

    /// Appends the id and persists, unless it is already present.
    pub fn add(&mut self, id: &str) {
        if self.contains(id) {
            return;
        }
        self.ids.push(id.to_string());
        self.save();
    }

    /// Removes every occurrence of the id and persists.
    pub fn remove(&mut self, id: &str) {
        self.ids.retain(|i| i != id);
        self.save();
    }

    /// Returns whether the id is wishlisted afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.contains(id) {
            self.remove(id);
            false
        } else {
            self.add(id);
            true
        }
    }

    /// Empties the wishlist and persists.
    pub fn reset(&mut self) {
        self.ids.clear();
        self.save();
    }

    fn save(&self) {
        if let Err(e) = write_json(&self.path, &self.ids) {
            warn!(error = %e, "failed to save wishlist");
        }
    }
}

#[cfg(test)]
#[path = "wishlist_tests.rs"]
mod tests;
