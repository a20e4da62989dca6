//! Publish/subscribe channels for game events
//!
//! Two independent channels: phase changes and named domain events.
//! Listeners run synchronously in subscription order. A listener that
//! returns `Err` is logged and skipped; the rest still run.
//!
//! Dispatch iterates over a snapshot of the listener list, so listeners may
//! subscribe or unsubscribe (themselves or others) while an event is being
//! delivered. A listener added mid-dispatch first hears the next event; one
//! removed mid-dispatch is not called again, even for the current event.

use std::cell::{Cell, RefCell};
use std::error::Error;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::entities::EnemyKind;
use super::state::GamePhase;

/// Error type listeners report failures with
pub type ListenerError = Box<dyn Error>;
/// Return type of a listener
pub type ListenerResult = Result<(), ListenerError>;

/// Emitted on every phase transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseChange {
    pub previous: GamePhase,
    pub current: GamePhase,
}

/// Gameplay events
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player fired a bullet
    Shot,
    /// A bullet destroyed an enemy
    EnemyDestroyed {
        row: usize,
        col: usize,
        kind: EnemyKind,
        points: u64,
    },
    /// The player lost a life
    PlayerHit { lives_left: u32 },
    /// The formation was cleared
    LevelComplete { level: u32 },
    /// The last life was lost
    GameOver { score: u64, level: u32 },
}

impl GameEvent {
    /// Channel name of the event
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Shot => "shot",
            GameEvent::EnemyDestroyed { .. } => "enemyDestroyed",
            GameEvent::PlayerHit { .. } => "playerHit",
            GameEvent::LevelComplete { .. } => "levelComplete",
            GameEvent::GameOver { .. } => "gameOver",
        }
    }
}

/// Token returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct Listener<E> {
    id: Subscription,
    live: Cell<bool>,
    callback: Box<dyn Fn(&E) -> ListenerResult>,
}

/// A single event channel
pub struct Emitter<E> {
    name: &'static str,
    listeners: RefCell<Vec<Rc<Listener<E>>>>,
    next_id: Cell<u64>,
}

impl<E> Emitter<E> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// Register a listener
    pub fn subscribe(&self, callback: impl Fn(&E) -> ListenerResult + 'static) -> Subscription {
        let id = Subscription(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push(Rc::new(Listener {
            id,
            live: Cell::new(true),
            callback: Box::new(callback),
        }));
        id
    }

    /// Remove a listener; returns `false` if it was not registered
    pub fn unsubscribe(&self, id: Subscription) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let Some(pos) = listeners.iter().position(|l| l.id == id) else {
            return false;
        };
        let listener = listeners.remove(pos);
        listener.live.set(false);
        true
    }

    /// Deliver an event to every listener
    ///
    /// Returns the number of listeners that failed.
    pub fn emit(&self, event: &E) -> usize {
        let snapshot: Vec<Rc<Listener<E>>> = self.listeners.borrow().clone();
        let mut failures = 0;
        for listener in snapshot {
            if !listener.live.get() {
                continue;
            }
            if let Err(e) = (listener.callback)(event) {
                failures += 1;
                log::error!("{} listener {:?} failed: {}", self.name, listener.id, e);
            }
        }
        failures
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

/// The game's event channels
pub struct Events {
    /// Generic phase-change notifications
    pub phase: Emitter<PhaseChange>,
    /// Gameplay events
    pub domain: Emitter<GameEvent>,
}

impl Default for Events {
    fn default() -> Self {
        Self::new()
    }
}

impl Events {
    pub fn new() -> Self {
        Self {
            phase: Emitter::new("phase"),
            domain: Emitter::new("domain"),
        }
    }

    /// Listen for one named domain event (e.g. `"gameOver"`)
    pub fn on(
        &self,
        name: &'static str,
        callback: impl Fn(&GameEvent) -> ListenerResult + 'static,
    ) -> Subscription {
        self.domain.subscribe(move |event| {
            if event.name() == name {
                callback(event)
            } else {
                Ok(())
            }
        })
    }
}
