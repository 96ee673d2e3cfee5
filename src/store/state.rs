//! Observable state container shared by the stores.

use tokio::sync::watch;

/// Holds one state value and notifies subscribers after each applied update.
///
/// Updates run as a single synchronous closure, so no reader ever sees a
/// half-applied transition.
#[derive(Debug)]
pub struct StateCell<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> StateCell<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Snapshot of the current state.
    pub fn get_state(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Borrowed read without cloning the whole state.
    pub fn with_state<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Receiver that wakes on every applied update.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Apply `f` and notify subscribers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    /// Apply `f`; subscribers are notified only if it returns `true`.
    pub fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }
}

impl<T: Clone + Default> Default for StateCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_see_only_reported_changes() {
        let cell = StateCell::new(0u32);
        let mut rx = cell.subscribe();
        assert!(!cell.update_if(|_| false));
        assert!(!rx.has_changed().unwrap());
        cell.update(|v| *v += 2);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 2);
        assert_eq!(cell.get_state(), 2);
    }
}
