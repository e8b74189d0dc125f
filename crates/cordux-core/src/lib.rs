//! # Store, Routes, and Subscriptions
//!
//! Cordux keeps application state in a single [`Store`]. State only changes
//! by dispatching actions through a pure reducer, and interested parties are
//! told about every change. There are four pieces:
//!
//! - [`Route`]: the navigation stack, plus the `replace`/`push`/`pop` rules.
//! - [`Reducer`]: a typed `(action, state) -> state` function, stored
//!   type-erased as [`AnyReducer`].
//! - [`Subscriber`]: receives the state (or a projection of it) after each
//!   notifying dispatch.
//! - [`Store`]: owns the state and drives all of the above.
//!
//! ## Dispatching
//!
//! ```rust
//! use cordux_core::*;
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     route: Route,
//!     taps: u32,
//! }
//!
//! impl StateType for AppState {
//!     fn route(&self) -> &Route {
//!         &self.route
//!     }
//!     fn route_mut(&mut self) -> &mut Route {
//!         &mut self.route
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct Tap;
//! impl Action for Tap {}
//!
//! let store = Store::new(
//!     AppState::default(),
//!     reducer(|action: &dyn Action, state: &AppState| {
//!         let mut next = state.clone();
//!         if action.is::<Tap>() {
//!             next.taps += 1;
//!         }
//!         next
//!     }),
//! );
//!
//! store.dispatch(Tap);
//! store.route(RouteAction::Push("settings"));
//! assert_eq!(store.state().taps, 1);
//! assert_eq!(store.current_route().to_string(), "settings");
//! ```
//!
//! ## Routes
//!
//! Route actions are dispatched with [`Store::route`] (notifies) or
//! [`Store::set_route`] (silent). The store first rewrites `state.route`,
//! then hands the same action to the reducer, which therefore sees the new
//! route. A `Pop` whose segment is not the current suffix of the route is
//! ignored.
//!
//! ## Subscriptions
//!
//! Subscribers are registered through an `Rc` and held weakly; dropping the
//! subscriber is enough to stop deliveries. A new subscriber receives the
//! current state immediately:
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use cordux_core::*;
//!
//! # #[derive(Clone, Default)]
//! # struct AppState { route: Route }
//! # impl StateType for AppState {
//! #     fn route(&self) -> &Route { &self.route }
//! #     fn route_mut(&mut self) -> &mut Route { &mut self.route }
//! # }
//! #[derive(Default)]
//! struct Breadcrumbs(RefCell<Vec<String>>);
//!
//! impl Subscriber<Route> for Breadcrumbs {
//!     fn new_state(&self, route: &Route) {
//!         self.0.borrow_mut().push(route.to_string());
//!     }
//! }
//!
//! let store = Store::new(
//!     AppState::default(),
//!     reducer(|_: &dyn Action, s: &AppState| s.clone()),
//! );
//! let crumbs = Rc::new(Breadcrumbs::default());
//! store.subscribe_with(&crumbs, |s: &AppState| s.route.clone());
//! store.route(RouteAction::Push(["catalog", "item"]));
//!
//! assert_eq!(*crumbs.0.borrow(), vec!["".to_string(), "catalog/item".to_string()]);
//! ```
//!
//! Everything here is single-threaded: a store is `!Send` and is meant to
//! live on the thread that owns the presentation layer.

pub mod action;
pub mod error;
pub mod prelude;
pub mod reducer;
pub mod route;
pub mod state;
pub mod store;
pub mod subscription;

pub use action::*;
pub use error::*;
pub use reducer::*;
pub use route::{Route, RouteAction, RouteConvertible, reduce_route};
pub use state::*;
pub use store::*;
pub use subscription::*;
