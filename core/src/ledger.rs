//! Capabilities the combat session borrows from the surrounding game.
//!
//! Resource and currency stores live outside the session and are shared with
//! other game modes. The session only ever reads, decrements, and credits them
//! through these traits, so hosts can plug in persistent stores while tests use
//! the in-memory [`Stockpile`] and [`CoinPurse`].

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use serde::{Deserialize, Serialize};

/// Countable resources tracked by a [`ResourceLedger`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Stone gathered in the territory; doubles as ammo.
    Stone,
    /// Wood gathered in the territory.
    Wood,
}

/// Store of countable resource units.
pub trait ResourceLedger {
    /// Reports whether at least `amount` units of `kind` are available.
    fn has(&self, kind: ResourceKind, amount: u32) -> bool;

    /// Removes up to `amount` units of `kind`.
    fn remove(&mut self, kind: ResourceKind, amount: u32);

    /// Units of `kind` currently held.
    fn get(&self, kind: ResourceKind) -> u32;
}

/// Store of the session-scoped currency.
pub trait CurrencyLedger {
    /// Credits `amount` units.
    fn add(&mut self, amount: u32);

    /// Drops the balance back to zero.
    fn reset(&mut self);
}

impl<T: ResourceLedger + ?Sized> ResourceLedger for Rc<RefCell<T>> {
    fn has(&self, kind: ResourceKind, amount: u32) -> bool {
        self.borrow().has(kind, amount)
    }

    fn remove(&mut self, kind: ResourceKind, amount: u32) {
        self.borrow_mut().remove(kind, amount);
    }

    fn get(&self, kind: ResourceKind) -> u32 {
        self.borrow().get(kind)
    }
}

impl<T: CurrencyLedger + ?Sized> CurrencyLedger for Rc<RefCell<T>> {
    fn add(&mut self, amount: u32) {
        self.borrow_mut().add(amount);
    }

    fn reset(&mut self) {
        self.borrow_mut().reset();
    }
}

/// In-memory [`ResourceLedger`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stockpile {
    counts: BTreeMap<ResourceKind, u32>,
}

impl Stockpile {
    /// Creates an empty stockpile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stockpile with `amount` units of `kind` added.
    #[must_use]
    pub fn with(mut self, kind: ResourceKind, amount: u32) -> Self {
        self.deposit(kind, amount);
        self
    }

    /// Adds `amount` units of `kind`.
    pub fn deposit(&mut self, kind: ResourceKind, amount: u32) {
        let count = self.counts.entry(kind).or_insert(0);
        *count = count.saturating_add(amount);
    }
}

impl ResourceLedger for Stockpile {
    fn has(&self, kind: ResourceKind, amount: u32) -> bool {
        self.get(kind) >= amount
    }

    fn remove(&mut self, kind: ResourceKind, amount: u32) {
        if let Some(count) = self.counts.get_mut(&kind) {
            *count = count.saturating_sub(amount);
        }
    }

    fn get(&self, kind: ResourceKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

/// In-memory [`CurrencyLedger`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoinPurse {
    balance: u64,
}

impl CoinPurse {
    /// Creates an empty purse.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Coins currently held.
    #[must_use]
    pub const fn balance(&self) -> u64 {
        self.balance
    }
}

impl CurrencyLedger for CoinPurse {
    fn add(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(u64::from(amount));
    }

    fn reset(&mut self) {
        self.balance = 0;
    }
}
