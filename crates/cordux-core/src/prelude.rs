pub use crate::action::Action;
pub use crate::error::*;
pub use crate::reducer::{AnyReducer, Reducer, reducer};
pub use crate::route::{Route, RouteAction, RouteConvertible};
pub use crate::state::StateType;
pub use crate::store::Store;
pub use crate::subscription::{Renderer, Subscriber};
