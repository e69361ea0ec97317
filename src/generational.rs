//! Values that remember their own past.
//!
//! A [`Generational`] holds `DEPTH + 1` instances of a value: generation 0 is
//! the current one, generation `DEPTH` the oldest. [`Generational::cycle`]
//! rotates the slots so the oldest instance becomes the new current one, ready
//! to be overwritten, and [`Generational::evolve`] runs an update rule right
//! after that rotation. All instances are created at construction, so cycling
//! never allocates; it only swaps slots.
//!
//! How a slot holds its value is a compile-time [`Storage`] strategy:
//! [`Inline`] keeps the value in the slot itself and [`Boxed`] keeps it behind
//! its own heap allocation, so a rotation swaps box handles and the payload
//! never moves.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// How a generational slot owns its value.
pub trait Storage<T> {
    type Slot;

    fn wrap(value: T) -> Self::Slot;
    fn unwrap(slot: Self::Slot) -> T;
    fn get(slot: &Self::Slot) -> &T;
    fn get_mut(slot: &mut Self::Slot) -> &mut T;
}

/// Slots hold their values directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl<T> Storage<T> for Inline {
    type Slot = T;

    #[inline(always)]
    fn wrap(value: T) -> T {
        value
    }

    #[inline(always)]
    fn unwrap(slot: T) -> T {
        slot
    }

    #[inline(always)]
    fn get(slot: &T) -> &T {
        slot
    }

    #[inline(always)]
    fn get_mut(slot: &mut T) -> &mut T {
        slot
    }
}

/// Slots own their values through a `Box`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boxed;

impl<T> Storage<T> for Boxed {
    type Slot = Box<T>;

    #[inline(always)]
    fn wrap(value: T) -> Box<T> {
        Box::new(value)
    }

    #[inline(always)]
    fn unwrap(slot: Box<T>) -> T {
        *slot
    }

    #[inline(always)]
    fn get(slot: &Box<T>) -> &T {
        slot
    }

    #[inline(always)]
    fn get_mut(slot: &mut Box<T>) -> &mut T {
        slot
    }
}

/// Stored update rule, invoked by [`Generational::evolve_default`].
pub type Rule<T, S, const DEPTH: usize> = Box<dyn FnMut(&mut Generational<T, S, DEPTH>)>;

/// A value together with its last `DEPTH` generations.
pub struct Generational<T, S: Storage<T>, const DEPTH: usize> {
    current: S::Slot,
    history: [S::Slot; DEPTH],
    rule: Option<Rule<T, S, DEPTH>>,
    _marker: PhantomData<fn() -> T>,
}

/// Generational buffer of flat arrays, stored inline.
pub type GenerationalArray<T, const DEPTH: usize> = Generational<Vec<T>, Inline, DEPTH>;

/// Generational buffer of arbitrary objects, each in its own allocation.
pub type GenerationalObject<T, const DEPTH: usize> = Generational<T, Boxed, DEPTH>;

impl<T, S: Storage<T>, const DEPTH: usize> Generational<T, S, DEPTH> {
    const NONZERO_DEPTH: () = assert!(DEPTH > 0, "a generational buffer needs DEPTH > 0");

    /// Build every generation up front; `f` receives the generation index.
    pub fn from_fn(mut f: impl FnMut(usize) -> T) -> Self {
        let () = Self::NONZERO_DEPTH;
        let current = S::wrap(f(0));
        let history = std::array::from_fn(|n| S::wrap(f(n + 1)));
        Self { current, history, rule: None, _marker: PhantomData }
    }

    /// Build from explicit contents: `current` at generation 0, then
    /// `history[k]` at generation `k + 1`.
    pub fn from_parts(current: T, history: [T; DEPTH]) -> Self {
        let () = Self::NONZERO_DEPTH;
        Self {
            current: S::wrap(current),
            history: history.map(S::wrap),
            rule: None,
            _marker: PhantomData,
        }
    }

    /// Every generation starts as a clone of `value`.
    pub fn filled(value: T) -> Self
    where
        T: Clone,
    {
        Self::from_fn(|_| value.clone())
    }

    /// Take the generations back out, newest first.
    pub fn into_parts(self) -> (T, [T; DEPTH]) {
        (S::unwrap(self.current), self.history.map(S::unwrap))
    }

    /// Number of past generations retained.
    pub const fn depth(&self) -> usize {
        DEPTH
    }

    #[inline(always)]
    pub fn current(&self) -> &T {
        S::get(&self.current)
    }

    #[inline(always)]
    pub fn current_mut(&mut self) -> &mut T {
        S::get_mut(&mut self.current)
    }

    /// Generation 1, the state before the last cycle.
    #[inline(always)]
    pub fn previous(&self) -> &T {
        S::get(&self.history[0])
    }

    /// Writable current generation alongside the read-only previous one.
    #[inline(always)]
    pub fn split_current(&mut self) -> (&mut T, &T) {
        (S::get_mut(&mut self.current), S::get(&self.history[0]))
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        match index {
            0 => Some(S::get(&self.current)),
            n => self.history.get(n - 1).map(S::get),
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        match index {
            0 => Some(S::get_mut(&mut self.current)),
            n => self.history.get_mut(n - 1).map(S::get_mut),
        }
    }

    /// Generation `index`. Panics when `index > DEPTH`.
    pub fn at(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => out_of_range(index, DEPTH),
        }
    }

    /// Writable generation `index`. Panics when `index > DEPTH`.
    pub fn at_mut(&mut self, index: usize) -> &mut T {
        match self.get_mut(index) {
            Some(value) => value,
            None => out_of_range(index, DEPTH),
        }
    }

    /// Generations from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        std::iter::once(S::get(&self.current)).chain(self.history.iter().map(S::get))
    }

    /// Shift every generation one step into the past.
    ///
    /// The content of generation `k` ends up at `k + 1` and the oldest
    /// content becomes generation 0. Implemented as `DEPTH` swaps of the
    /// current slot with each history slot in turn.
    pub fn cycle(&mut self) {
        for slot in self.history.iter_mut() {
            std::mem::swap(&mut self.current, slot);
        }
    }

    /// Cycle, then let `rule` compute the new current generation.
    ///
    /// The rule is expected to read generation 1 and up and to write
    /// generation 0; nothing enforces that.
    pub fn evolve<F>(&mut self, rule: F)
    where
        F: FnOnce(&mut Self),
    {
        self.cycle();
        rule(self);
    }

    /// Store a rule for [`evolve_default`](Self::evolve_default).
    pub fn set_rule<F>(&mut self, rule: F)
    where
        F: FnMut(&mut Self) + 'static,
    {
        self.rule = Some(Box::new(rule));
    }

    pub fn clear_rule(&mut self) {
        self.rule = None;
    }

    pub fn has_rule(&self) -> bool {
        self.rule.is_some()
    }

    /// Cycle, then run the stored rule (a no-op when none is set).
    pub fn evolve_default(&mut self) {
        let mut rule = self.rule.take();
        self.cycle();
        if let Some(rule) = rule.as_mut() {
            rule(self);
        }
        // A rule may install its own replacement.
        if self.rule.is_none() {
            self.rule = rule;
        }
    }
}

#[cold]
#[track_caller]
fn out_of_range(index: usize, depth: usize) -> ! {
    panic!("generation {index} out of range for a buffer of depth {depth}")
}

impl<T, S: Storage<T>, const DEPTH: usize> Index<usize> for Generational<T, S, DEPTH> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        self.at(index)
    }
}

impl<T, S: Storage<T>, const DEPTH: usize> IndexMut<usize> for Generational<T, S, DEPTH> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        self.at_mut(index)
    }
}

/// Deep copy of every generation. The clone starts without a stored rule.
impl<T, S, const DEPTH: usize> Clone for Generational<T, S, DEPTH>
where
    S: Storage<T>,
    S::Slot: Clone,
{
    fn clone(&self) -> Self {
        Self {
            current: self.current.clone(),
            history: self.history.clone(),
            rule: None,
            _marker: PhantomData,
        }
    }
}

impl<T: Default, S: Storage<T>, const DEPTH: usize> Default for Generational<T, S, DEPTH> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T: fmt::Debug, S: Storage<T>, const DEPTH: usize> fmt::Debug for Generational<T, S, DEPTH> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generational")
            .field("generations", &self.iter().collect::<Vec<_>>())
            .field("has_rule", &self.rule.is_some())
            .finish()
    }
}
