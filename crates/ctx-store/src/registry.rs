use std::collections::HashMap;
use std::sync::Arc;

use ctx_types::Value;

/// Insertion-ordered map from context name to stored value.
///
/// Overwriting a name keeps its original position; removing and re-adding it
/// moves it to the end.
#[derive(Default)]
pub struct Registry {
    order: Vec<String>,
    entries: HashMap<String, Arc<Value>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `name`. Returns the previous value, if any.
    pub fn insert(&mut self, name: &str, value: Arc<Value>) -> Option<Arc<Value>> {
        let previous = self.entries.insert(name.to_string(), value);
        if previous.is_none() {
            self.order.push(name.to_string());
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<Arc<Value>> {
        self.entries.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<Value>> {
        let removed = self.entries.remove(name)?;
        self.order.retain(|n| n != name);
        Some(removed)
    }

    /// Names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.order)
            .finish()
    }
}
