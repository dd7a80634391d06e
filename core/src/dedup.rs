use crate::{JsonPointer, ObjectId, ObjectRef, Value};
use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

/// Remembers where each composite node was first written during one top-level write, so that
/// later references to it can be written as a pointer to that location.
///
/// Nodes are keyed by identity. The tracker keeps a handle to every recorded node, so an address
/// cannot be reused by another node while the write is in progress.
pub enum ReferenceTracker {
    /// Deduplication is off: lookups always miss and nothing is stored.
    Disabled,
    Enabled(HashMap<ObjectId, (ObjectRef, String)>),
}

impl ReferenceTracker {
    /// Constructs a tracker; only an enabled tracker allocates.
    pub fn new(enabled: bool) -> Self {
        if enabled {
            ReferenceTracker::Enabled(HashMap::new())
        } else {
            ReferenceTracker::Disabled
        }
    }

    /// Determines whether this tracker records anything.
    pub fn is_enabled(&self) -> bool {
        matches!(self, ReferenceTracker::Enabled(_))
    }

    /// Records that `object` is written at `path`, unless it was already recorded.
    pub fn record(&mut self, object: &ObjectRef, path: &JsonPointer<'_>) {
        if let ReferenceTracker::Enabled(map) = self {
            if let Entry::Vacant(entry) = map.entry(object.id()) {
                let path = path.to_string();
                tracing::trace!(object = ?object, %path, "recorded object");
                entry.insert((object.clone(), path));
            }
        }
    }

    /// Gets the path at which the given value was first written, if it is a recorded node.
    pub fn lookup(&self, value: &Value) -> Option<&str> {
        match (self, value) {
            (ReferenceTracker::Enabled(map), Value::Object(object)) => {
                let (_, path) = map.get(&object.id())?;
                tracing::trace!(object = ?object, %path, "repeated object");
                Some(path.as_str())
            }
            _ => None,
        }
    }

    /// The number of recorded nodes.
    pub fn len(&self) -> usize {
        match self {
            ReferenceTracker::Disabled => 0,
            ReferenceTracker::Enabled(map) => map.len(),
        }
    }

    /// Determines whether no node has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
