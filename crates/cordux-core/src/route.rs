use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::action::Action;
use crate::error::RouteParseError;

/// Ordered navigation stack. The first element is the outermost level, the
/// last element is the innermost (top of the stack).
#[derive(Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Route(SmallVec<[String; 4]>);

impl Route {
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &Route) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn ends_with(&self, suffix: &Route) -> bool {
        self.0.ends_with(&suffix.0)
    }

    /// The remainder after `prefix`, or `None` when `prefix` does not lead this route.
    pub fn strip_prefix(&self, prefix: &Route) -> Option<Route> {
        self.0
            .strip_prefix(prefix.0.as_slice())
            .map(|rest| rest.iter().cloned().collect())
    }

    /// Appends `other` at the tail.
    pub fn join(mut self, other: Route) -> Route {
        self.0.extend(other.0);
        self
    }

    fn truncate(mut self, len: usize) -> Route {
        self.0.truncate(len);
        self
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, element) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(element)?;
        }
        Ok(())
    }
}

/// Parses `a/b/c`. One leading and one trailing `/` are tolerated; `""` and `"/"`
/// parse to the empty route.
impl FromStr for Route {
    type Err = RouteParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix('/').unwrap_or(s);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Ok(Route::new());
        }
        trimmed
            .split('/')
            .enumerate()
            .map(|(index, element)| {
                if element.is_empty() {
                    Err(RouteParseError::EmptyElement {
                        index,
                        input: s.to_string(),
                    })
                } else {
                    Ok(element.to_string())
                }
            })
            .collect()
    }
}

impl<E: Into<String>> FromIterator<E> for Route {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a Route {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A value that expands into zero or more route elements.
pub trait RouteConvertible {
    fn to_route(&self) -> Route;
}

impl RouteConvertible for Route {
    fn to_route(&self) -> Route {
        self.clone()
    }
}

impl RouteConvertible for () {
    fn to_route(&self) -> Route {
        Route::new()
    }
}

impl RouteConvertible for str {
    fn to_route(&self) -> Route {
        std::iter::once(self).collect()
    }
}

impl RouteConvertible for &str {
    fn to_route(&self) -> Route {
        (**self).to_route()
    }
}

impl RouteConvertible for String {
    fn to_route(&self) -> Route {
        self.as_str().to_route()
    }
}

impl RouteConvertible for Vec<String> {
    fn to_route(&self) -> Route {
        self.iter().cloned().collect()
    }
}

impl RouteConvertible for [&str] {
    fn to_route(&self) -> Route {
        self.iter().copied().collect()
    }
}

impl<const N: usize> RouteConvertible for [&str; N] {
    fn to_route(&self) -> Route {
        self.iter().copied().collect()
    }
}

/// Route-mutating action. Dispatched through `Store::route`/`Store::set_route`
/// it first rewrites `state.route`, then reaches the general reducer like any
/// other action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteAction<T> {
    /// Replace the whole route.
    Goto(T),
    /// Append the segment's expansion.
    Push(T),
    /// Remove the segment's expansion from the tail, if it is the current suffix.
    Pop(T),
}

impl<T> RouteAction<T> {
    pub fn segment(&self) -> &T {
        match self {
            RouteAction::Goto(s) | RouteAction::Push(s) | RouteAction::Pop(s) => s,
        }
    }
}

impl<T: RouteConvertible + fmt::Debug + 'static> Action for RouteAction<T> {}

pub fn replace(_route: &Route, segment: &(impl RouteConvertible + ?Sized)) -> Route {
    segment.to_route()
}

pub fn push(route: &Route, segment: &(impl RouteConvertible + ?Sized)) -> Route {
    route.clone().join(segment.to_route())
}

/// Removes the segment's expansion from the tail of `route`. A pop that does not
/// match the current suffix (or is longer than the route) leaves it unchanged.
pub fn pop(route: &Route, segment: &(impl RouteConvertible + ?Sized)) -> Route {
    let expansion = segment.to_route();
    let (n, m) = (route.len(), expansion.len());
    if n < m || !route.ends_with(&expansion) {
        log::debug!("pop {expansion} ignored; current route is {route}");
        return route.clone();
    }
    route.clone().truncate(n - m)
}

pub fn reduce_route<T: RouteConvertible>(action: &RouteAction<T>, route: &Route) -> Route {
    match action {
        RouteAction::Goto(segment) => replace(route, segment),
        RouteAction::Push(segment) => push(route, segment),
        RouteAction::Pop(segment) => pop(route, segment),
    }
}
