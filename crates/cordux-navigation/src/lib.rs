use std::{cell::Cell, fmt, rc::Rc};

use cordux_core::*;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("a tab coordinator needs at least one scene")]
    NoScenes,
    #[error("no scene with prefix '{0}'")]
    UnknownScene(String),
    #[error("scene index {index} out of range ({len} scenes)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Owns one part of the presentation and keeps it in line with the route.
///
/// Coordinators are handed the route *relative* to themselves: a parent strips
/// its own prefix before forwarding.
pub trait Coordinator {
    /// Wires up the coordinator's screens. Called once by the parent.
    fn start(&self);
    fn update_route(&self, route: &Route);
}

/// A route prefix paired with the coordinator that owns everything below it.
///
/// As a route segment a scene expands to its prefix, so
/// `RouteAction::Push(scene)` appends `[prefix]`.
#[derive(Clone)]
pub struct Scene {
    prefix: String,
    coordinator: Rc<dyn Coordinator>,
}

impl Scene {
    pub fn new(prefix: impl Into<String>, coordinator: Rc<dyn Coordinator>) -> Self {
        Self {
            prefix: prefix.into(),
            coordinator,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn coordinator(&self) -> &Rc<dyn Coordinator> {
        &self.coordinator
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Scene").field(&self.prefix).finish()
    }
}

impl RouteConvertible for Scene {
    fn to_route(&self) -> Route {
        self.prefix.to_route()
    }
}

/// Switches between sibling scenes, one per tab. The first route element picks
/// the scene; the rest of the route is forwarded to it.
pub struct TabCoordinator<S: StateType + Clone> {
    store: Rc<Store<S>>,
    scenes: Vec<Scene>,
    selected: Cell<usize>,
}

impl<S: StateType + Clone> TabCoordinator<S> {
    pub fn new(store: Rc<Store<S>>, scenes: Vec<Scene>) -> Result<Self, NavigationError> {
        if scenes.is_empty() {
            return Err(NavigationError::NoScenes);
        }
        Ok(Self {
            store,
            scenes,
            selected: Cell::new(0),
        })
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn selected_index(&self) -> usize {
        self.selected.get()
    }

    pub fn selected_scene(&self) -> &Scene {
        &self.scenes[self.selected.get()]
    }

    /// Follows the store's route from now on.
    pub fn attach(self: &Rc<Self>) {
        self.store.subscribe_with(self, |s: &S| s.route().clone());
    }

    pub fn detach(self: &Rc<Self>) {
        self.store.unsubscribe(self);
    }

    /// Makes scene `index` current, replacing the whole route with its prefix.
    pub fn select(&self, index: usize) -> Result<(), NavigationError> {
        let scene = self
            .scenes
            .get(index)
            .ok_or(NavigationError::IndexOutOfRange {
                index,
                len: self.scenes.len(),
            })?;
        self.selected.set(index);
        self.store.route(RouteAction::Goto(scene.clone()));
        Ok(())
    }

    pub fn select_prefix(&self, prefix: &str) -> Result<(), NavigationError> {
        let index = self
            .scene_index(prefix)
            .ok_or_else(|| NavigationError::UnknownScene(prefix.to_string()))?;
        self.select(index)
    }

    fn scene_index(&self, prefix: &str) -> Option<usize> {
        self.scenes.iter().position(|s| s.prefix == prefix)
    }
}

impl<S: StateType + Clone> Coordinator for TabCoordinator<S> {
    /// Starts every scene and records the selected scene in the route without
    /// notifying anyone.
    fn start(&self) {
        for scene in &self.scenes {
            scene.coordinator.start();
        }
        self.store.set_route(RouteAction::Push(self.selected_scene().clone()));
    }

    fn update_route(&self, route: &Route) {
        let Some(first) = route.first() else {
            return;
        };
        let Some(index) = self.scene_index(first) else {
            log::debug!("tabs: no scene for route {route}");
            return;
        };
        self.selected.set(index);
        let scene = &self.scenes[index];
        let rest = route.strip_prefix(&scene.to_route()).unwrap_or_default();
        scene.coordinator.update_route(&rest);
    }
}

impl<S: StateType + Clone> Subscriber<Route> for TabCoordinator<S> {
    fn new_state(&self, route: &Route) {
        self.update_route(route);
    }
}

/// Back-dispatcher
///
/// platform calls handle(); the app installs a handler once the store exists.
pub mod back {
    use std::{cell::RefCell, rc::Rc};

    pub type Handler = Rc<dyn Fn() -> bool>;

    thread_local! {
        static H: RefCell<Option<(u64, Handler)>> = const { RefCell::new(None) };
        static NEXT: std::cell::Cell<u64> = const { std::cell::Cell::new(1) };
    }

    /// Replaces the current handler and returns a token identifying it.
    pub fn set(handler: Option<Handler>) -> u64 {
        let token = NEXT.with(|n| {
            let t = n.get();
            n.set(t.wrapping_add(1));
            t
        });
        H.with(|h| *h.borrow_mut() = handler.map(|f| (token, f)));
        token
    }

    /// Clears the handler only if it is still the one identified by `token`.
    pub fn clear(token: u64) {
        H.with(|h| {
            let mut h = h.borrow_mut();
            if h.as_ref().is_some_and(|(t, _)| *t == token) {
                *h = None;
            }
        });
    }

    /// Runs the installed handler; `false` when there is none or it declined.
    pub fn handle() -> bool {
        let handler = H.with(|h| h.borrow().as_ref().map(|(_, f)| f.clone()));
        match handler {
            Some(f) => f(),
            None => false,
        }
    }
}

/// Keeps a back handler installed; uninstalls it on drop.
#[must_use = "the back handler is removed when the guard is dropped"]
pub struct BackHandlerGuard {
    token: u64,
}

impl Drop for BackHandlerGuard {
    fn drop(&mut self) {
        back::clear(self.token);
    }
}

/// Install a back handler that pops the innermost route element of `store`.
pub fn install_back_handler<S: StateType + Clone>(store: &Rc<Store<S>>) -> BackHandlerGuard {
    let store = Rc::downgrade(store);
    let token = back::set(Some(Rc::new(move || {
        store.upgrade().is_some_and(|store| pop_top(&store))
    })));
    BackHandlerGuard { token }
}

/// Pops the innermost route element. The last remaining element is never popped.
pub fn pop_top<S: StateType + Clone>(store: &Store<S>) -> bool {
    let route = store.current_route();
    if route.len() <= 1 {
        return false;
    }
    let Some(top) = route.last() else {
        return false;
    };
    store.route(RouteAction::Pop(top.to_string()));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Clone, Default, Debug)]
    struct AppState {
        route: Route,
    }

    impl StateType for AppState {
        fn route(&self) -> &Route {
            &self.route
        }
        fn route_mut(&mut self) -> &mut Route {
            &mut self.route
        }
    }

    #[derive(Default)]
    struct MockCoordinator {
        started: Cell<bool>,
        routes: RefCell<Vec<String>>,
    }

    impl Coordinator for MockCoordinator {
        fn start(&self) {
            self.started.set(true);
        }
        fn update_route(&self, route: &Route) {
            self.routes.borrow_mut().push(route.to_string());
        }
    }

    fn store() -> Rc<Store<AppState>> {
        Rc::new(Store::new(
            AppState::default(),
            reducer(|_: &dyn Action, s: &AppState| s.clone()),
        ))
    }

    fn tabs(
        store: &Rc<Store<AppState>>,
    ) -> (
        Rc<TabCoordinator<AppState>>,
        Rc<MockCoordinator>,
        Rc<MockCoordinator>,
    ) {
        let first = Rc::new(MockCoordinator::default());
        let second = Rc::new(MockCoordinator::default());
        let tabs = TabCoordinator::new(
            store.clone(),
            vec![
                Scene::new("first", first.clone()),
                Scene::new("second", second.clone()),
            ],
        )
        .unwrap();
        (Rc::new(tabs), first, second)
    }

    #[test]
    fn test_start_records_selected_scene_silently() {
        let store = store();
        let (tabs, first, second) = tabs(&store);
        tabs.start();

        assert!(first.started.get());
        assert!(second.started.get());
        assert_eq!(store.current_route().to_string(), "first");
        assert!(first.routes.borrow().is_empty());
    }

    #[test]
    fn test_attached_tabs_forward_relative_route() {
        let store = store();
        let (tabs, first, second) = tabs(&store);
        tabs.start();
        tabs.attach();
        assert_eq!(*first.routes.borrow(), vec![""]);

        tabs.select_prefix("second").unwrap();
        assert_eq!(tabs.selected_index(), 1);
        store.route(RouteAction::Push("detail"));
        assert_eq!(*second.routes.borrow(), vec!["", "detail"]);

        store.route(RouteAction::Goto(["first", "list", "item"]));
        assert_eq!(tabs.selected_index(), 0);
        assert_eq!(first.routes.borrow().last().unwrap(), "list/item");

        tabs.detach();
        store.route(RouteAction::Goto("second"));
        assert_eq!(second.routes.borrow().len(), 2);
    }

    #[test]
    fn test_select_errors() {
        let store = store();
        let (tabs, _, _) = tabs(&store);
        assert_eq!(
            tabs.select_prefix("third"),
            Err(NavigationError::UnknownScene("third".into()))
        );
        assert_eq!(
            tabs.select(5),
            Err(NavigationError::IndexOutOfRange { index: 5, len: 2 })
        );
        assert!(matches!(
            TabCoordinator::new(store, Vec::new()),
            Err(NavigationError::NoScenes)
        ));
    }

    #[test]
    fn test_unknown_first_element_is_ignored() {
        let store = store();
        let (tabs, first, second) = tabs(&store);
        tabs.attach();
        store.route(RouteAction::Goto("elsewhere"));
        assert_eq!(tabs.selected_index(), 0);
        assert!(first.routes.borrow().is_empty());
        assert!(second.routes.borrow().is_empty());
    }

    #[test]
    fn test_back_handler_pops_innermost_element() {
        let store = store();
        store.route(RouteAction::Goto(["first", "detail"]));

        let guard = install_back_handler(&store);
        assert!(back::handle());
        assert_eq!(store.current_route().to_string(), "first");
        assert!(!back::handle());
        assert_eq!(store.current_route().to_string(), "first");

        drop(guard);
        store.route(RouteAction::Push("detail"));
        assert!(!back::handle());
        assert_eq!(store.current_route().to_string(), "first/detail");
    }

    #[test]
    fn test_stale_guard_keeps_newer_handler() {
        let store = store();
        store.route(RouteAction::Goto(["a", "b", "c"]));
        let old = install_back_handler(&store);
        let _new = install_back_handler(&store);
        drop(old);
        assert!(back::handle());
        assert_eq!(store.current_route().to_string(), "a/b");
    }
}
