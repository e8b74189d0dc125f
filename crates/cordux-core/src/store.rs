use std::any::{Any, type_name};
use std::cell::{Ref, RefCell};
use std::fmt::Debug;
use std::rc::Rc;

use crate::action::Action;
use crate::reducer::{AnyReducer, Reducer};
use crate::route::{Route, RouteAction, RouteConvertible, reduce_route};
use crate::state::StateType;
use crate::subscription::{Subscriber, SubscriptionRegistry};

/// Single-threaded state container.
///
/// All methods take `&self`, so a store is usually shared as `Rc<Store<S>>`
/// between the host and its coordinators. Reduction always completes before
/// any subscriber is notified, and subscribers are notified in the order they
/// subscribed.
pub struct Store<S: StateType + Clone> {
    state: RefCell<S>,
    reducer: Box<dyn AnyReducer>,
    subscriptions: SubscriptionRegistry<S>,
}

impl<S: StateType + Clone> Store<S> {
    pub fn new(initial_state: S, reducer: impl Reducer<State = S>) -> Self {
        Self::with_erased_reducer(initial_state, Box::new(reducer))
    }

    /// Builds a store around an already-erased reducer. A reducer for some
    /// other state type is accepted and simply never changes anything.
    pub fn with_erased_reducer(initial_state: S, reducer: Box<dyn AnyReducer>) -> Self {
        Self {
            state: RefCell::new(initial_state),
            reducer,
            subscriptions: SubscriptionRegistry::new(),
        }
    }

    /// Borrow of the current state. Do not hold it across a dispatch.
    pub fn state(&self) -> Ref<'_, S> {
        self.state.borrow()
    }

    pub fn snapshot(&self) -> S {
        self.state.borrow().clone()
    }

    pub fn current_route(&self) -> Route {
        self.state.borrow().route().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Subscribes to the whole state. The current state is delivered before
    /// this returns.
    pub fn subscribe<Sub>(&self, subscriber: &Rc<Sub>)
    where
        Sub: Subscriber<S> + 'static,
    {
        self.subscriptions.subscribe(subscriber, S::clone, &self.state);
    }

    /// Subscribes to a projection of the state.
    pub fn subscribe_with<Sub, T>(
        &self,
        subscriber: &Rc<Sub>,
        projection: impl Fn(&S) -> T + 'static,
    ) where
        Sub: Subscriber<T> + 'static,
        T: 'static,
    {
        self.subscriptions.subscribe(subscriber, projection, &self.state);
    }

    pub fn unsubscribe<Sub: 'static>(&self, subscriber: &Rc<Sub>) {
        if self.subscriptions.unsubscribe(subscriber) {
            log::debug!(
                "unsubscribe: {} subscriber(s) left",
                self.subscriptions.len()
            );
        }
    }

    pub fn dispatch(&self, action: impl Action) {
        self.dispatch_dyn(&action, true);
    }

    /// Reduces without notifying anyone.
    pub fn dispatch_silently(&self, action: impl Action) {
        self.dispatch_dyn(&action, false);
    }

    /// Rewrites the route, then reduces the same action and notifies.
    pub fn route<T>(&self, action: RouteAction<T>)
    where
        T: RouteConvertible + Debug + 'static,
    {
        self.dispatch_route(action, true);
    }

    /// Like [`route`](Self::route), but subscribers are not told.
    pub fn set_route<T>(&self, action: RouteAction<T>)
    where
        T: RouteConvertible + Debug + 'static,
    {
        self.dispatch_route(action, false);
    }

    fn dispatch_route<T>(&self, action: RouteAction<T>, notify: bool)
    where
        T: RouteConvertible + Debug + 'static,
    {
        {
            let mut state = self.state.borrow_mut();
            let next = reduce_route(&action, state.route());
            log::debug!("route {action:?}: {} -> {next}", state.route());
            *state.route_mut() = next;
        }
        self.dispatch_dyn(&action, notify);
    }

    /// Reduces `action` against the current state and, when `notify` is set,
    /// pushes the result to subscribers.
    pub fn dispatch_dyn(&self, action: &dyn Action, notify: bool) {
        log::trace!("dispatch {action:?} (notify: {notify})");
        let next = {
            let state = self.state.borrow();
            self.reducer.apply_erased(action, &*state)
        };
        if let Some(next) = next {
            match (next as Box<dyn Any>).downcast::<S>() {
                Ok(next) => *self.state.borrow_mut() = *next,
                Err(_) => log::warn!(
                    "reducer returned a state that is not {}; keeping the current state",
                    type_name::<S>()
                ),
            }
        }
        if notify {
            self.subscriptions.notify_all(&self.state);
        }
    }
}
