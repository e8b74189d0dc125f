use std::any::Any;
use std::fmt::Debug;

/// Marker for anything that can be dispatched to a store.
///
/// Actions travel through the store as `&dyn Action`; reducers recover the
/// concrete type with [`downcast_ref`](trait.Action.html#method.downcast_ref).
pub trait Action: Any + Debug + 'static {}

impl dyn Action {
    pub fn is<A: Action>(&self) -> bool {
        (self as &dyn Any).is::<A>()
    }

    pub fn downcast_ref<A: Action>(&self) -> Option<&A> {
        (self as &dyn Any).downcast_ref::<A>()
    }
}

