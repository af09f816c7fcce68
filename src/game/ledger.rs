//! Stack-ordered resource ledger with reverse-order teardown.
//!
//! The [`Ledger`] owns every long-lived resource of a session as an ordered
//! sequence of entries, each pairing an opaque owned value with its release
//! operation. Entries are released in strict reverse registration order, so
//! dependents never outlive their dependencies. A single entry can be
//! replaced in place while the rest of the ledger stays untouched, which is
//! what makes live level reloads safe: the old value is only released after
//! its replacement has been constructed.

use std::any::Any;
use std::marker::PhantomData;

use crate::error::GameError;

/// Release operation stored alongside each entry. Receives the boxed value
/// and may perform arbitrary teardown, but must not fail.
type Release = Box<dyn FnMut(Box<dyn Any>)>;

/// Typed handle to one ledger entry.
///
/// Slots are cheap indices; they stay valid for the lifetime of the ledger
/// that issued them, including across [`Ledger::replace`].
#[derive(Debug)]
pub struct Slot<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

// Manual impls: `#[derive]` would wrongly require `T: Copy`.
impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<T> {}

struct Entry {
    /// `None` once the value has been released.
    value: Option<Box<dyn Any>>,
    release: Release,
}

impl Entry {
    fn expect_ref<T: Any>(&self) -> &T {
        self.value
            .as_ref()
            .expect("ledger slot already released")
            .downcast_ref::<T>()
            .expect("ledger slot holds a different type")
    }

    fn expect_mut<T: Any>(&mut self) -> &mut T {
        self.value
            .as_mut()
            .expect("ledger slot already released")
            .downcast_mut::<T>()
            .expect("ledger slot holds a different type")
    }
}

/// Ordered registry of owned resources and their release operations.
#[derive(Default)]
pub struct Ledger {
    entries: Vec<Entry>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of registered entries, released or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends `value` with its `release` operation and returns its slot.
    ///
    /// Fails only if the ledger's backing storage cannot grow; prior
    /// entries are left untouched in that case.
    pub fn register<T, F>(&mut self, value: T, release: F) -> Result<Slot<T>, GameError>
    where
        T: Any,
        F: FnMut(Box<dyn Any>) + 'static,
    {
        self.entries.try_reserve(1)?;
        let index = self.entries.len();
        self.entries.push(Entry {
            value: Some(Box::new(value)),
            release: Box::new(release),
        });
        Ok(Slot {
            index,
            _marker: PhantomData,
        })
    }

    /// Replaces the value at `slot` with one built by `producer`.
    ///
    /// The producer runs first. If it fails, the old value stays registered
    /// and valid and the error propagates. If it succeeds, the old value is
    /// released immediately through the entry's stored release operation
    /// and the new value takes over the same slot, keeping both the release
    /// operation and the entry's position in teardown order.
    pub fn replace<T, F>(&mut self, slot: Slot<T>, producer: F) -> Result<(), GameError>
    where
        T: Any,
        F: FnOnce() -> Result<T, GameError>,
    {
        let fresh = producer()?;
        let entry = &mut self.entries[slot.index];
        let old = entry.value.take().expect("ledger slot already released");
        (entry.release)(old);
        entry.value = Some(Box::new(fresh));
        Ok(())
    }

    /// Shared access to the value at `slot`.
    pub fn get<T: Any>(&self, slot: Slot<T>) -> &T {
        self.entries[slot.index].expect_ref()
    }

    /// Exclusive access to the value at `slot`.
    pub fn get_mut<T: Any>(&mut self, slot: Slot<T>) -> &mut T {
        self.entries[slot.index].expect_mut()
    }

    /// Exclusive access to two distinct slots at once.
    pub fn get2_mut<A: Any, B: Any>(&mut self, a: Slot<A>, b: Slot<B>) -> (&mut A, &mut B) {
        let [ea, eb] = self
            .entries
            .get_disjoint_mut([a.index, b.index])
            .expect("ledger slots must be distinct and in bounds");
        (ea.expect_mut(), eb.expect_mut())
    }

    /// Exclusive access to three distinct slots at once.
    pub fn get3_mut<A: Any, B: Any, C: Any>(
        &mut self,
        a: Slot<A>,
        b: Slot<B>,
        c: Slot<C>,
    ) -> (&mut A, &mut B, &mut C) {
        let [ea, eb, ec] = self
            .entries
            .get_disjoint_mut([a.index, b.index, c.index])
            .expect("ledger slots must be distinct and in bounds");
        (ea.expect_mut(), eb.expect_mut(), ec.expect_mut())
    }

    /// Releases every still-live value, newest to oldest.
    ///
    /// Idempotent: each value's release operation runs exactly once, and a
    /// partially populated ledger (aborted construction) is handled the
    /// same way as a full one.
    pub fn release_all(&mut self) {
        for entry in self.entries.iter_mut().rev() {
            if let Some(value) = entry.value.take() {
                (entry.release)(value);
            }
        }
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl Drop for Ledger {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Shared log of release operations, so tests can observe order.
    fn release_log() -> Rc<RefCell<Vec<String>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn logging_release(
        log: &Rc<RefCell<Vec<String>>>,
        label: &'static str,
    ) -> impl FnMut(Box<dyn Any>) + 'static {
        let log = Rc::clone(log);
        move |_value| log.borrow_mut().push(label.to_string())
    }

    #[test]
    fn release_all_runs_in_reverse_registration_order() {
        let log = release_log();
        let mut ledger = Ledger::new();
        ledger
            .register(1u32, logging_release(&log, "first"))
            .unwrap();
        ledger
            .register("second".to_string(), logging_release(&log, "second"))
            .unwrap();
        ledger
            .register(3.0f32, logging_release(&log, "third"))
            .unwrap();

        ledger.release_all();
        assert_eq!(*log.borrow(), vec!["third", "second", "first"]);
    }

    #[test]
    fn release_all_is_idempotent() {
        let log = release_log();
        let mut ledger = Ledger::new();
        ledger
            .register(1u32, logging_release(&log, "only"))
            .unwrap();

        ledger.release_all();
        ledger.release_all();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn drop_releases_everything_once() {
        let log = release_log();
        {
            let mut ledger = Ledger::new();
            ledger.register(1u32, logging_release(&log, "a")).unwrap();
            ledger.register(2u32, logging_release(&log, "b")).unwrap();
        }
        assert_eq!(*log.borrow(), vec!["b", "a"]);
    }

    #[test]
    fn failed_replace_leaves_old_value_registered() {
        let log = release_log();
        let mut ledger = Ledger::new();
        let slot = ledger
            .register(41u32, logging_release(&log, "old"))
            .unwrap();

        let result = ledger.replace(slot, || {
            Err::<u32, _>(GameError::load("x.txt", "bad file"))
        });

        assert!(result.is_err());
        assert_eq!(*ledger.get(slot), 41);
        assert!(log.borrow().is_empty(), "old value must not be released");
    }

    #[test]
    fn successful_replace_releases_old_value_exactly_once() {
        let log = release_log();
        let mut ledger = Ledger::new();
        let slot = ledger
            .register(41u32, logging_release(&log, "old"))
            .unwrap();

        ledger.replace(slot, || Ok(42u32)).unwrap();

        assert_eq!(*log.borrow(), vec!["old"]);
        assert_eq!(*ledger.get(slot), 42);

        // The new value keeps the old entry's release operation.
        ledger.release_all();
        assert_eq!(*log.borrow(), vec!["old", "old"]);
    }

    #[test]
    fn replaced_entry_keeps_its_teardown_position() {
        let log = release_log();
        let mut ledger = Ledger::new();
        ledger.register(1u32, logging_release(&log, "a")).unwrap();
        let slot = ledger.register(2u32, logging_release(&log, "b")).unwrap();
        ledger.register(3u32, logging_release(&log, "c")).unwrap();

        ledger.replace(slot, || Ok(20u32)).unwrap();
        log.borrow_mut().clear();

        ledger.release_all();
        assert_eq!(*log.borrow(), vec!["c", "b", "a"]);
    }

    #[test]
    fn disjoint_borrows_see_the_same_values() {
        let mut ledger = Ledger::new();
        let a = ledger.register(1u32, |_| {}).unwrap();
        let b = ledger.register("two".to_string(), |_| {}).unwrap();
        let c = ledger.register(3.0f32, |_| {}).unwrap();

        let (va, vb, vc) = ledger.get3_mut(a, b, c);
        *va += 1;
        vb.push('!');
        *vc *= 2.0;

        assert_eq!(*ledger.get(a), 2);
        assert_eq!(ledger.get(b), "two!");
        assert_eq!(*ledger.get(c), 6.0);
    }
}
