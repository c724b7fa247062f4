//! The event bus — synchronous fan-out of world events.
//!
//! RULE: every observable effect of a system is a WorldEvent emitted here.
//! `emit` appends to the event log first, then invokes every matching
//! subscriber in subscription order, before returning. There is no queue.
//!
//! Dispatch works from a snapshot of the subscriber table taken at emit
//! time, with every internal borrow released before the first handler
//! runs. Consequences of that:
//!   - a handler may itself emit (nested dispatch is legal; the emitter
//!     is responsible for bounding recursion),
//!   - handlers subscribed during dispatch do not see the event currently
//!     being dispatched,
//!   - a handler that re-enters *itself* trips its own borrow and is
//!     reported as an isolated subscriber failure.
//!
//! One panicking subscriber never prevents the rest from running.

use crate::error::SimResult;
use crate::event::{EventCategory, EventDraft, EventFactory, WorldEvent};
use crate::event_log::EventLog;
use crate::types::EventId;
use std::cell::{Cell, Ref, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

type Handler = Rc<RefCell<dyn FnMut(&WorldEvent)>>;

/// Token returned by the subscribe calls; pass back to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

enum Filter {
    Any,
    Category(EventCategory),
    Subtype(String),
}

impl Filter {
    fn matches(&self, event: &WorldEvent) -> bool {
        match self {
            Filter::Any => true,
            Filter::Category(c) => event.category == *c,
            Filter::Subtype(s) => event.subtype == *s,
        }
    }
}

struct Entry {
    token: u64,
    filter: Filter,
    handler: Handler,
}

pub struct EventBus {
    log: Rc<RefCell<EventLog>>,
    factory: RefCell<EventFactory>,
    subscribers: RefCell<Vec<Entry>>,
    next_token: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_factory(EventFactory::new())
    }

    /// Build a bus around an explicitly-owned id allocator.
    pub fn with_factory(factory: EventFactory) -> Self {
        Self {
            log: Rc::new(RefCell::new(EventLog::new())),
            factory: RefCell::new(factory),
            subscribers: RefCell::new(Vec::new()),
            next_token: Cell::new(0),
        }
    }

    /// Subscribe to every event.
    pub fn on_any(&self, handler: impl FnMut(&WorldEvent) + 'static) -> Subscription {
        self.subscribe(Filter::Any, handler)
    }

    /// Subscribe to one category.
    pub fn on(
        &self,
        category: EventCategory,
        handler: impl FnMut(&WorldEvent) + 'static,
    ) -> Subscription {
        self.subscribe(Filter::Category(category), handler)
    }

    /// Subscribe to an exact "domain.action" subtype.
    pub fn on_subtype(
        &self,
        subtype: impl Into<String>,
        handler: impl FnMut(&WorldEvent) + 'static,
    ) -> Subscription {
        self.subscribe(Filter::Subtype(subtype.into()), handler)
    }

    fn subscribe(&self, filter: Filter, handler: impl FnMut(&WorldEvent) + 'static) -> Subscription {
        let token = self.next_token.get();
        self.next_token.set(token + 1);
        self.subscribers.borrow_mut().push(Entry {
            token,
            filter,
            handler: Rc::new(RefCell::new(handler)),
        });
        Subscription(token)
    }

    pub fn unsubscribe(&self, sub: Subscription) {
        self.subscribers.borrow_mut().retain(|e| e.token != sub.0);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Stamp the draft with the next event id without publishing it.
    ///
    /// Two-phase emission lets an emitter wire forward links: create both
    /// events, push the consequence id onto the cause, then publish both
    /// in id order.
    pub fn create(&self, draft: EventDraft) -> SimResult<WorldEvent> {
        self.factory.borrow_mut().create(draft)
    }

    /// Publish a factory-created event: append to the log, then dispatch.
    pub fn publish(&self, event: WorldEvent) -> SimResult<EventId> {
        let id = event.id;
        self.log.borrow_mut().append(event.clone())?;
        let matched: Vec<Handler> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|e| e.filter.matches(&event))
            .map(|e| Rc::clone(&e.handler))
            .collect();
        for handler in matched {
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                let mut h = handler.borrow_mut();
                (&mut *h)(&event)
            }));
            if outcome.is_err() {
                log::error!(
                    "subscriber panicked handling '{}' (event {}), continuing dispatch",
                    event.subtype,
                    id.0
                );
            }
        }
        Ok(id)
    }

    /// One-shot convenience: create + publish.
    pub fn emit(&self, draft: EventDraft) -> SimResult<EventId> {
        let event = self.create(draft)?;
        self.publish(event)
    }

    /// Read access to the log. Do not hold the guard across an `emit`.
    pub fn log(&self) -> Ref<'_, EventLog> {
        self.log.borrow()
    }

    /// Shared handle for consumers that outlive a borrow (e.g. archive
    /// mirrors, inspection panels).
    pub fn log_handle(&self) -> Rc<RefCell<EventLog>> {
        Rc::clone(&self.log)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
