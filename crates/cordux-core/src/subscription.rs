use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Receives pushed state, either the whole store state or a projection of it.
pub trait Subscriber<T> {
    fn new_state(&self, state: &T);
}

/// Subscriber that turns a view model into presentation.
pub trait Renderer {
    type ViewModel;

    fn render(&self, view_model: &Self::ViewModel);
}

impl<R: Renderer> Subscriber<R::ViewModel> for R {
    fn new_state(&self, state: &R::ViewModel) {
        self.render(state)
    }
}

/// A delivery prepared under a state borrow and run after the borrow is released.
type Delivery = Box<dyn FnOnce()>;

struct Subscription<S> {
    target: Weak<dyn Any>,
    active: Rc<Cell<bool>>,
    prepare: Rc<dyn Fn(&S) -> Option<Delivery>>,
}

impl<S> Clone for Subscription<S> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            active: self.active.clone(),
            prepare: self.prepare.clone(),
        }
    }
}

impl<S> Subscription<S> {
    fn is_live(&self) -> bool {
        self.active.get() && self.target.strong_count() > 0
    }

    fn is_for<Sub>(&self, subscriber: &Rc<Sub>) -> bool {
        std::ptr::addr_eq(self.target.as_ptr(), Rc::as_ptr(subscriber))
    }
}

/// Ordered subscriber bookkeeping for a store.
///
/// Subscribers are held weakly: dropping the last `Rc` to a subscriber is
/// enough to stop deliveries. Dead entries are purged before every
/// notification pass.
pub struct SubscriptionRegistry<S> {
    entries: RefCell<Vec<Subscription<S>>>,
}

impl<S: 'static> Default for SubscriptionRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static> SubscriptionRegistry<S> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Registers `subscriber` behind `projection` and delivers the current
    /// projected state once. Returns `false` (and delivers nothing) when the
    /// subscriber is already registered.
    pub fn subscribe<Sub, T>(
        &self,
        subscriber: &Rc<Sub>,
        projection: impl Fn(&S) -> T + 'static,
        state: &RefCell<S>,
    ) -> bool
    where
        Sub: Subscriber<T> + 'static,
        T: 'static,
    {
        if self.contains(subscriber) {
            log::trace!("subscribe: subscriber already registered");
            return false;
        }

        let weak = Rc::downgrade(subscriber);
        let prepare = move |s: &S| -> Option<Delivery> {
            let sub = weak.upgrade()?;
            let projected = projection(s);
            Some(Box::new(move || sub.new_state(&projected)))
        };
        let entry = Subscription {
            target: Rc::downgrade(subscriber) as Weak<dyn Any>,
            active: Rc::new(Cell::new(true)),
            prepare: Rc::new(prepare),
        };
        self.entries.borrow_mut().push(entry.clone());
        log::debug!("subscribe: {} subscriber(s)", self.len());

        Self::deliver(&entry, state);
        true
    }

    /// Removes `subscriber`; no-op when it is not registered.
    pub fn unsubscribe<Sub: 'static>(&self, subscriber: &Rc<Sub>) -> bool {
        let mut entries = self.entries.borrow_mut();
        let Some(index) = entries.iter().position(|e| e.is_for(subscriber)) else {
            return false;
        };
        let removed = entries.remove(index);
        removed.active.set(false);
        true
    }

    pub fn contains<Sub: 'static>(&self, subscriber: &Rc<Sub>) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|e| e.is_live() && e.is_for(subscriber))
    }

    /// Live subscriptions.
    pub fn len(&self) -> usize {
        self.entries.borrow().iter().filter(|e| e.is_live()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops entries whose subscriber is gone; returns how many were removed.
    pub fn purge(&self) -> usize {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.is_live());
        before - entries.len()
    }

    /// Delivers the (projected) state to every live subscriber in
    /// registration order.
    ///
    /// The entry list is snapshotted first and no borrow is held while a
    /// subscriber runs, so subscribers may dispatch, subscribe or unsubscribe
    /// re-entrantly. An entry unsubscribed mid-pass is skipped.
    pub fn notify_all(&self, state: &RefCell<S>) {
        let purged = self.purge();
        if purged > 0 {
            log::trace!("notify: purged {purged} dead subscriber(s)");
        }
        let snapshot: Vec<Subscription<S>> = self.entries.borrow().clone();
        log::trace!("notify: {} subscriber(s)", snapshot.len());
        for entry in &snapshot {
            Self::deliver(entry, state);
        }
    }

    fn deliver(entry: &Subscription<S>, state: &RefCell<S>) {
        if !entry.active.get() {
            return;
        }
        let delivery = {
            let state = state.borrow();
            (entry.prepare)(&state)
        };
        if let Some(delivery) = delivery {
            delivery();
        }
    }
}
