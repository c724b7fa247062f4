//! World events — the immutable record of everything that happens.
//!
//! The serialized shape of `WorldEvent` is the one bit-exact contract at
//! the kernel boundary. Field names and meanings never change; new
//! categories are appended, never removed or reordered.

use crate::error::{SimError, SimResult};
use crate::types::{Entity, EventId, Tick};
use serde::{Deserialize, Serialize};

/// Closed set of event categories. Domain systems pick one per event;
/// finer distinctions go in `subtype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Political,
    Military,
    Economic,
    Cultural,
    Religious,
    Magical,
    Natural,
    Social,
    Exploration,
    Personal,
}

impl EventCategory {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Political => "political",
            Self::Military => "military",
            Self::Economic => "economic",
            Self::Cultural => "cultural",
            Self::Religious => "religious",
            Self::Magical => "magical",
            Self::Natural => "natural",
            Self::Social => "social",
            Self::Exploration => "exploration",
            Self::Personal => "personal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldEvent {
    pub id: EventId,
    pub category: EventCategory,
    /// "domain.action" string, e.g. "war.declared".
    pub subtype: String,
    /// The tick at which the event happened.
    pub timestamp: Tick,
    pub participants: Vec<Entity>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub location: Option<Entity>,
    /// Advisory back-links to earlier events. Not enforced acyclic —
    /// traversal code carries a visited set (see event_log::cascade).
    pub causes: Vec<EventId>,
    /// Advisory forward-links to later events.
    pub consequences: Vec<EventId>,
    /// 0..=100. Validated by the factory.
    pub significance: u8,
    /// Free-form payload owned by the emitting domain system.
    pub data: serde_json::Value,
}

/// What an emitter builds. The factory assigns the id.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub category: EventCategory,
    pub subtype: String,
    pub timestamp: Tick,
    pub participants: Vec<Entity>,
    pub location: Option<Entity>,
    pub causes: Vec<EventId>,
    pub consequences: Vec<EventId>,
    pub significance: u8,
    pub data: serde_json::Value,
}

impl EventDraft {
    pub fn new(category: EventCategory, subtype: impl Into<String>, timestamp: Tick) -> Self {
        Self {
            category,
            subtype: subtype.into(),
            timestamp,
            participants: Vec::new(),
            location: None,
            causes: Vec::new(),
            consequences: Vec::new(),
            significance: 0,
            data: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    pub fn participant(mut self, entity: Entity) -> Self {
        self.participants.push(entity);
        self
    }

    pub fn participants(mut self, entities: impl IntoIterator<Item = Entity>) -> Self {
        self.participants.extend(entities);
        self
    }

    pub fn location(mut self, entity: Entity) -> Self {
        self.location = Some(entity);
        self
    }

    pub fn cause(mut self, id: EventId) -> Self {
        self.causes.push(id);
        self
    }

    pub fn consequence(mut self, id: EventId) -> Self {
        self.consequences.push(id);
        self
    }

    pub fn significance(mut self, significance: u8) -> Self {
        self.significance = significance;
        self
    }

    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

/// Monotonic event-id allocator.
///
/// Owned by whichever context creates the bus and injected there — never a
/// module-scope counter, so parallel tests and multiple simultaneous
/// simulations cannot collide or need manual resets.
#[derive(Debug, Default)]
pub struct EventFactory {
    next: u64,
}

impl EventFactory {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Resume allocation from a known id (replay tooling).
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Stamp the draft with the next id.
    pub fn create(&mut self, draft: EventDraft) -> SimResult<WorldEvent> {
        if draft.significance > 100 {
            return Err(SimError::SignificanceOutOfRange(draft.significance));
        }
        let id = EventId(self.next);
        self.next += 1;
        Ok(WorldEvent {
            id,
            category: draft.category,
            subtype: draft.subtype,
            timestamp: draft.timestamp,
            participants: draft.participants,
            location: draft.location,
            causes: draft.causes,
            consequences: draft.consequences,
            significance: draft.significance,
            data: draft.data,
        })
    }
}
