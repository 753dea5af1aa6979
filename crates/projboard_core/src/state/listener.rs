//! Ordered listener registry with isolated failures.

use log::warn;
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type ListenerResult = Result<(), ListenerError>;

type Listener<T> = Rc<dyn Fn(&T) -> ListenerResult>;

/// Failure reported by one listener during a notification cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerError {
    message: String,
}

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ListenerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener failed: {}", self.message)
    }
}

impl Error for ListenerError {}

/// Outcome of one notification cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyReport {
    /// Listeners invoked, failed ones included.
    pub invoked: usize,
    /// Registration index and error of every listener that returned `Err`.
    pub failures: Vec<(usize, ListenerError)>,
}

impl NotifyReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Registration-ordered callbacks. There is no removal.
pub struct ListenerRegistry<T> {
    listeners: RefCell<Vec<Listener<T>>>,
}

impl<T> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl<T> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, listener: F)
    where
        F: Fn(&T) -> ListenerResult + 'static,
    {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    /// Invokes every listener in registration order.
    ///
    /// `current` is called once per listener, so a listener that re-enters
    /// the owner and changes it is followed by listeners seeing the new
    /// value. The registration list is copied before dispatch; late
    /// registrations are first invoked on the next cycle. An `Err` from one
    /// listener is logged and does not stop the rest. Panics propagate.
    pub fn notify<F>(&self, current: F) -> NotifyReport
    where
        F: Fn() -> T,
    {
        let listeners = self.listeners.borrow().clone();
        let mut report = NotifyReport::default();
        for (index, listener) in listeners.iter().enumerate() {
            report.invoked += 1;
            if let Err(err) = listener(&current()) {
                warn!(
                    "event=listener_failed module=state status=error index={} error={}",
                    index, err
                );
                report.failures.push((index, err));
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::{ListenerError, ListenerRegistry};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn notifies_in_registration_order() {
        let registry = ListenerRegistry::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let seen = Rc::clone(&seen);
            registry.register(move |value: &u32| {
                seen.borrow_mut().push(format!("{tag}:{value}"));
                Ok(())
            });
        }

        let report = registry.notify(|| 7);
        assert_eq!(report.invoked, 3);
        assert!(report.is_clean());
        assert_eq!(*seen.borrow(), vec!["first:7", "second:7", "third:7"]);
    }

    #[test]
    fn failing_listener_does_not_suppress_later_ones() {
        let registry = ListenerRegistry::<()>::new();
        let reached = Rc::new(RefCell::new(false));
        registry.register(|_: &()| Err(ListenerError::new("render failed")));
        let flag = Rc::clone(&reached);
        registry.register(move |_: &()| {
            *flag.borrow_mut() = true;
            Ok(())
        });

        let report = registry.notify(|| ());
        assert!(*reached.borrow());
        assert_eq!(report.invoked, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, 0);
        assert_eq!(report.failures[0].1.message(), "render failed");
    }

    #[test]
    fn registration_during_notify_waits_for_next_cycle() {
        let registry = Rc::new(ListenerRegistry::<()>::new());
        let late_calls = Rc::new(RefCell::new(0));
        let inner_registry = Rc::clone(&registry);
        let counter = Rc::clone(&late_calls);
        registry.register(move |_: &()| {
            let counter = Rc::clone(&counter);
            inner_registry.register(move |_: &()| {
                *counter.borrow_mut() += 1;
                Ok(())
            });
            Ok(())
        });

        let first = registry.notify(|| ());
        assert_eq!(first.invoked, 1);
        assert_eq!(*late_calls.borrow(), 0);

        registry.notify(|| ());
        assert_eq!(*late_calls.borrow(), 1);
    }

    #[test]
    fn each_listener_reads_the_value_current_at_its_turn() {
        let registry = ListenerRegistry::<u32>::new();
        let value = Rc::new(Cell::new(1));
        let bump = Rc::clone(&value);
        registry.register(move |_: &u32| {
            bump.set(bump.get() + 1);
            Ok(())
        });
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        registry.register(move |current: &u32| {
            sink.borrow_mut().push(*current);
            Ok(())
        });

        let source = Rc::clone(&value);
        registry.notify(|| source.get());
        assert_eq!(*seen.borrow(), vec![2]);
    }
}
