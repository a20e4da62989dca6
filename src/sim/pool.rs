//! Fixed-capacity object pool for high-churn entities
//!
//! Bullets and particles come and go every few ticks. The pool recycles
//! their storage instead of allocating per spawn: instances live in a slot
//! vector that grows lazily up to `capacity` and is never shrunk.
//!
//! Instances are addressed by [`Handle`]. The active list keeps acquisition
//! order; the free list is a stack of reset instances.

/// An entity that can live in a [`Pool`]
pub trait Poolable: Default {
    /// Entity-specific liveness (e.g. bullet still on screen, particle life left)
    fn is_active(&self) -> bool;
    /// Return to the canonical zero/off state
    fn reset(&mut self);
}

/// Identifies one slot of a [`Pool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u32);

impl Handle {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Reusable-object arena with a hard capacity
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<T>,
    active: Vec<Handle>,
    free: Vec<Handle>,
    capacity: usize,
}

impl<T: Poolable> Pool<T> {
    /// Empty pool; instances are constructed on demand up to `capacity`
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            active: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Pool with `initial` instances constructed up front on the free list
    pub fn with_prewarm(capacity: usize, initial: usize) -> Self {
        let mut pool = Self::new(capacity);
        for _ in 0..initial.min(capacity) {
            let handle = pool.push_slot();
            pool.free.push(handle);
        }
        pool
    }

    fn push_slot(&mut self) -> Handle {
        let handle = Handle(self.slots.len() as u32);
        self.slots.push(T::default());
        handle
    }

    /// Take an instance from the pool
    ///
    /// Returns `None` once `capacity` instances are active. That is a normal
    /// outcome: the caller skips the spawn.
    pub fn acquire(&mut self) -> Option<Handle> {
        let handle = match self.free.pop() {
            Some(handle) => handle,
            None if self.slots.len() < self.capacity => self.push_slot(),
            None => return None,
        };
        self.active.push(handle);
        Some(handle)
    }

    /// Acquire and initialise an instance in one step
    pub fn acquire_with(&mut self, init: impl FnOnce(&mut T)) -> Option<Handle> {
        let handle = self.acquire()?;
        init(&mut self.slots[handle.index()]);
        Some(handle)
    }

    /// Return an active instance to the free list
    ///
    /// Returns `false` (and changes nothing) if the handle is not active.
    pub fn release(&mut self, handle: Handle) -> bool {
        let Some(pos) = self.active.iter().rposition(|&h| h == handle) else {
            return false;
        };
        self.active.remove(pos);
        self.slots[handle.index()].reset();
        self.free.push(handle);
        true
    }

    /// Reclaim every active instance
    pub fn release_all(&mut self) {
        while let Some(handle) = self.active.pop() {
            self.slots[handle.index()].reset();
            self.free.push(handle);
        }
    }

    /// Release every active instance that no longer reports itself active
    ///
    /// Returns the number of instances reclaimed.
    pub fn reap_inactive(&mut self) -> usize {
        let mut reaped = 0;
        let mut i = self.active.len();
        while i > 0 {
            i -= 1;
            let handle = self.active[i];
            if !self.slots[handle.index()].is_active() {
                self.active.remove(i);
                self.slots[handle.index()].reset();
                self.free.push(handle);
                reaped += 1;
            }
        }
        reaped
    }

    /// Active instances that still report themselves active, in acquisition order
    pub fn active_view(&self) -> impl Iterator<Item = &T> + '_ {
        self.active
            .iter()
            .map(|h| &self.slots[h.index()])
            .filter(|item| item.is_active())
    }

    /// Handles of every tracked active instance (including ones awaiting reap)
    pub fn active_handles(&self) -> &[Handle] {
        &self.active
    }

    /// Run `f` on every tracked active instance
    pub fn update_active(&mut self, mut f: impl FnMut(&mut T)) {
        for handle in &self.active {
            f(&mut self.slots[handle.index()]);
        }
    }

    /// Borrow the instance behind an active handle
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.active
            .contains(&handle)
            .then(|| &self.slots[handle.index()])
    }

    /// Mutably borrow the instance behind an active handle
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if self.active.contains(&handle) {
            Some(&mut self.slots[handle.index()])
        } else {
            None
        }
    }

    /// Number of tracked active instances
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of constructed instances waiting on the free list
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Number of instances constructed so far
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    /// Instances still obtainable right now (free plus not yet constructed)
    pub fn available(&self) -> usize {
        self.capacity - self.active.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
