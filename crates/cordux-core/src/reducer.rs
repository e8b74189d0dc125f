use std::any::{Any, type_name};
use std::marker::PhantomData;

use crate::action::Action;
use crate::state::StateType;

/// Pure state transition for one concrete state type.
///
/// Actions the reducer does not recognize must produce an unchanged copy of
/// `state`.
pub trait Reducer: 'static {
    type State: StateType;

    fn handle_action(&self, action: &dyn Action, state: &Self::State) -> Self::State;
}

/// Type-erased face of a [`Reducer`], as stored by the store.
pub trait AnyReducer {
    /// Reduces `state` if it is the reducer's concrete state type.
    ///
    /// `None` means the state is passed through unchanged.
    fn apply_erased(&self, action: &dyn Action, state: &dyn StateType)
    -> Option<Box<dyn StateType>>;
}

impl<R: Reducer> AnyReducer for R {
    fn apply_erased(
        &self,
        action: &dyn Action,
        state: &dyn StateType,
    ) -> Option<Box<dyn StateType>> {
        with_specific_types(state, |specific: &R::State| {
            self.handle_action(action, specific)
        })
    }
}

/// Runs `f` on `state` viewed as `S`; `None` if `state` is some other type.
pub fn with_specific_types<S: StateType>(
    state: &dyn StateType,
    f: impl FnOnce(&S) -> S,
) -> Option<Box<dyn StateType>> {
    let Some(specific) = (state as &dyn Any).downcast_ref::<S>() else {
        log::debug!(
            "reducer for {} skipped a foreign state value",
            type_name::<S>()
        );
        return None;
    };
    Some(Box::new(f(specific)))
}

/// Closure-backed reducer, see [`reducer`].
pub struct FnReducer<S, F> {
    f: F,
    _state: PhantomData<fn(&S) -> S>,
}

impl<S, F> Reducer for FnReducer<S, F>
where
    S: StateType,
    F: Fn(&dyn Action, &S) -> S + 'static,
{
    type State = S;

    fn handle_action(&self, action: &dyn Action, state: &S) -> S {
        (self.f)(action, state)
    }
}

pub fn reducer<S, F>(f: F) -> FnReducer<S, F>
where
    S: StateType,
    F: Fn(&dyn Action, &S) -> S + 'static,
{
    FnReducer {
        f,
        _state: PhantomData,
    }
}
