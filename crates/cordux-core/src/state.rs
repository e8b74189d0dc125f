use std::any::Any;

use crate::route::Route;

/// Application state held by a [`Store`](crate::Store).
///
/// The only shape the store relies on is the navigation route, which it
/// rewrites itself before a route action reaches the reducer.
pub trait StateType: Any + 'static {
    fn route(&self) -> &Route;
    fn route_mut(&mut self) -> &mut Route;
}
