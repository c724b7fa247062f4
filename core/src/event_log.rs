//! The authoritative, queryable history of the run.
//!
//! Append-only. The entity index is maintained incrementally on append —
//! never recomputed from scratch on the hot path.

use crate::error::{SimError, SimResult};
use crate::event::WorldEvent;
use crate::types::{Entity, EventId};
use std::collections::{HashMap, HashSet};

#[derive(Default)]
pub struct EventLog {
    events: Vec<WorldEvent>,
    by_id: HashMap<EventId, usize>,
    by_entity: HashMap<Entity, Vec<EventId>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event. Ids must be strictly increasing — a stale or
    /// reused id is a fatal invariant violation, surfaced immediately.
    pub fn append(&mut self, event: WorldEvent) -> SimResult<()> {
        if let Some(last) = self.events.last() {
            if event.id.0 <= last.id.0 {
                return Err(SimError::NonMonotonicEvent {
                    id: event.id.0,
                    last: last.id.0,
                });
            }
        }
        for p in &event.participants {
            self.by_entity.entry(*p).or_default().push(event.id);
        }
        if let Some(loc) = event.location {
            // an entity that is both location and participant is indexed once
            if !event.participants.contains(&loc) {
                self.by_entity.entry(loc).or_default().push(event.id);
            }
        }
        self.by_id.insert(event.id, self.events.len());
        self.events.push(event);
        Ok(())
    }

    pub fn get(&self, id: EventId) -> Option<&WorldEvent> {
        self.by_id.get(&id).map(|idx| &self.events[*idx])
    }

    /// The full history in append order.
    pub fn all(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&WorldEvent> {
        self.events.last()
    }

    /// Events referencing the entity as participant or location,
    /// in append order.
    pub fn for_entity(&self, entity: Entity) -> Vec<&WorldEvent> {
        self.by_entity
            .get(&entity)
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    /// Build the consequence tree rooted at `root`, at most `max_depth`
    /// levels below it (root = depth 0).
    ///
    /// Cause/consequence links are authored by domain systems and are not
    /// guaranteed acyclic, so traversal carries a visited set: each event
    /// id appears in the tree at most once and cycles terminate. Links to
    /// ids that were never appended are skipped. Returns `None` for an
    /// unknown root.
    pub fn cascade(&self, root: EventId, max_depth: usize) -> Option<CascadeNode> {
        self.get(root)?;
        let mut visited = HashSet::new();
        visited.insert(root);
        Some(self.expand(root, 0, max_depth, &mut visited))
    }

    fn expand(
        &self,
        id: EventId,
        depth: usize,
        max_depth: usize,
        visited: &mut HashSet<EventId>,
    ) -> CascadeNode {
        let mut node = CascadeNode {
            id,
            depth,
            children: Vec::new(),
        };
        if depth >= max_depth {
            return node;
        }
        let event = self.get(id).expect("visited ids exist in the log");
        let consequences = event.consequences.clone();
        for c in consequences {
            if self.get(c).is_none() {
                continue;
            }
            if !visited.insert(c) {
                continue;
            }
            node.children.push(self.expand(c, depth + 1, max_depth, visited));
        }
        node
    }
}

/// One node of a consequence tree. A partial tree (bounded by max_depth
/// or cut by cycles) is a normal result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeNode {
    pub id: EventId,
    pub depth: usize,
    pub children: Vec<CascadeNode>,
}

impl CascadeNode {
    /// Total number of events in this tree, root included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(CascadeNode::count).sum::<usize>()
    }

    /// Deepest depth present in the tree.
    pub fn deepest(&self) -> usize {
        self.children
            .iter()
            .map(CascadeNode::deepest)
            .max()
            .unwrap_or(self.depth)
    }
}
