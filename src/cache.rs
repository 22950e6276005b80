//! Single-slot release cache with one-shot listeners.
//!
//! The cache is shared (`Rc`) between exactly one writer, the feed tracker,
//! and any number of readers. Everything runs on one thread: updates and
//! listener dispatch happen synchronously inside `update`.

use std::cell::RefCell;
use std::collections::VecDeque;

/// A pending one-shot listener.
type Listener<T> = Box<dyn FnOnce(&T)>;

/// Holds the latest value pushed by the feed, or nothing yet.
///
/// Listeners registered with [`ReleaseCache::subscribe_once`] fire exactly
/// once, with the first value available to them. Dropping the cache drops
/// pending listeners without calling them.
pub struct ReleaseCache<T> {
    /// Listeners waiting for the first value, in registration order.
    listeners: RefCell<VecDeque<Listener<T>>>,
    /// Latest value, `None` until the first update.
    slot: RefCell<Option<T>>,
}

impl<T: Clone> ReleaseCache<T> {
    /// Empty cache with no listeners.
    pub fn new() -> Self {
        return Self {
            listeners: RefCell::new(VecDeque::new()),
            slot: RefCell::new(None),
        };
    }

    /// Clone of the current value, if any.
    pub fn current(&self) -> Option<T> {
        return self.slot.borrow().clone();
    }

    /// Number of listeners still waiting for a value.
    pub fn pending(&self) -> usize {
        return self.listeners.borrow().len();
    }

    /// Call `callback` once with the first available value: now if the cache
    /// is set, otherwise on the next `update`.
    pub fn subscribe_once(&self, callback: impl FnOnce(&T) + 'static) {
        let current = self.current();
        match current {
            Some(value) => {
                tracing::trace!("cache set, firing listener immediately");
                callback(&value);
            },
            None => {
                self.listeners.borrow_mut().push_back(Box::new(callback));
                tracing::trace!(pending = self.pending(), "listener queued");
            },
        }
    }

    /// Replace the value and drain waiting listeners in FIFO order.
    ///
    /// Each listener leaves the queue before it runs and reads the slot at
    /// that moment, so listeners may subscribe or update re-entrantly.
    pub fn update(&self, value: T) {
        *self.slot.borrow_mut() = Some(value);

        loop {
            let next = self.listeners.borrow_mut().pop_front();
            let Some(listener) = next else {
                break;
            };
            let current = self.current();
            let Some(value) = current else {
                break;
            };
            tracing::trace!(remaining = self.pending(), "firing listener");
            listener(&value);
        }
    }
}

impl<T: Clone> Default for ReleaseCache<T> {
    fn default() -> Self {
        return Self::new();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    /// Shared log the listeners append to.
    fn recorder() -> Rc<RefCell<Vec<String>>> {
        return Rc::new(RefCell::new(Vec::new()));
    }

    #[test]
    fn fires_immediately_when_set() {
        let cache = ReleaseCache::new();
        cache.update("reef".to_string());

        let seen = recorder();
        let log = Rc::clone(&seen);
        cache.subscribe_once(move |v: &String| log.borrow_mut().push(v.clone()));

        assert_eq!(*seen.borrow(), vec!["reef"], "listener fires synchronously");
        assert_eq!(cache.pending(), 0, "nothing left queued");
    }

    #[test]
    fn sequential_subscriptions_fire_once_each() {
        let cache = ReleaseCache::new();
        let seen = recorder();

        let log = Rc::clone(&seen);
        cache.subscribe_once(move |v: &String| log.borrow_mut().push(format!("a:{v}")));
        cache.update("quincy".to_string());

        let log = Rc::clone(&seen);
        cache.subscribe_once(move |v: &String| log.borrow_mut().push(format!("b:{v}")));
        cache.update("reef".to_string());
        cache.update("squid".to_string());

        assert_eq!(*seen.borrow(), vec!["a:quincy", "b:quincy"], "each fired once with the value current then");
        assert_eq!(cache.current().as_deref(), Some("squid"), "slot holds the latest update");
    }

    #[test]
    fn queued_listeners_fire_in_registration_order() {
        let cache = ReleaseCache::new();
        let seen = recorder();
        for tag in ["first", "second", "third"] {
            let log = Rc::clone(&seen);
            cache.subscribe_once(move |v: &String| log.borrow_mut().push(format!("{tag}:{v}")));
        }
        assert_eq!(cache.pending(), 3, "all queued before any value");

        cache.update("squid".to_string());

        assert_eq!(
            *seen.borrow(),
            vec!["first:squid", "second:squid", "third:squid"],
            "FIFO dispatch"
        );
        assert_eq!(cache.pending(), 0, "queue drained");
    }

    #[test]
    fn subscribe_inside_listener_gets_its_own_first_value() {
        let cache = Rc::new(ReleaseCache::new());
        let seen = recorder();

        let inner_cache = Rc::clone(&cache);
        let log = Rc::clone(&seen);
        cache.subscribe_once(move |v: &String| {
            log.borrow_mut().push(format!("outer:{v}"));
            let inner_log = Rc::clone(&log);
            inner_cache.subscribe_once(move |v: &String| inner_log.borrow_mut().push(format!("inner:{v}")));
        });
        cache.update("reef".to_string());
        cache.update("squid".to_string());

        assert_eq!(*seen.borrow(), vec!["outer:reef", "inner:reef"], "nested listener fires once");
    }

    #[test]
    fn update_inside_listener_is_seen_by_later_listeners() {
        let cache = Rc::new(ReleaseCache::new());
        let seen = recorder();

        let writer = Rc::clone(&cache);
        let log = Rc::clone(&seen);
        cache.subscribe_once(move |v: &String| {
            log.borrow_mut().push(format!("a:{v}"));
            writer.update("squid".to_string());
        });
        let log = Rc::clone(&seen);
        cache.subscribe_once(move |v: &String| log.borrow_mut().push(format!("b:{v}")));

        cache.update("reef".to_string());

        assert_eq!(*seen.borrow(), vec!["a:reef", "b:squid"], "later listener reads the newer value");
        assert_eq!(cache.pending(), 0, "queue drained");
    }

    #[test]
    fn dropping_unset_cache_never_fires() {
        let seen = recorder();
        {
            let cache: ReleaseCache<String> = ReleaseCache::new();
            let log = Rc::clone(&seen);
            cache.subscribe_once(move |v: &String| log.borrow_mut().push(v.clone()));
        }
        assert!(seen.borrow().is_empty(), "teardown discards pending listeners");
        assert_eq!(Rc::strong_count(&seen), 1, "listener closure was dropped");
    }
}
