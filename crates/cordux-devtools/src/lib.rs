use std::cell::{Cell, RefCell};
use std::fmt::Debug;

use cordux_core::{Route, Subscriber};

#[derive(Clone, Copy, Debug)]
pub struct HudOptions {
    pub show_depth: bool,
    /// Longer routes are cut and end in `…`.
    pub max_route_chars: usize,
}

impl Default for HudOptions {
    fn default() -> Self {
        Self {
            show_depth: true,
            max_route_chars: 60,
        }
    }
}

/// Route overlay. Subscribe it to a route projection of the store.
pub struct RouteHud {
    pub options: HudOptions,
    enabled: Cell<bool>,
    updates: Cell<u64>,
    deepest: Cell<usize>,
    route: RefCell<Route>,
}

impl Default for RouteHud {
    fn default() -> Self {
        Self::new(HudOptions::default())
    }
}

impl RouteHud {
    pub fn new(options: HudOptions) -> Self {
        Self {
            options,
            enabled: Cell::new(true),
            updates: Cell::new(0),
            deepest: Cell::new(0),
            route: RefCell::new(Route::new()),
        }
    }

    pub fn toggle(&self) {
        self.enabled.set(!self.enabled.get());
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn updates(&self) -> u64 {
        self.updates.get()
    }

    pub fn route(&self) -> Route {
        self.route.borrow().clone()
    }

    /// One-line summary, `None` while the HUD is hidden.
    pub fn overlay(&self) -> Option<String> {
        if !self.enabled.get() {
            return None;
        }
        let route = self.route.borrow();
        let mut shown = if route.is_empty() {
            "/".to_string()
        } else {
            route.to_string()
        };
        if shown.chars().count() > self.options.max_route_chars {
            shown = shown
                .chars()
                .take(self.options.max_route_chars.saturating_sub(1))
                .collect();
            shown.push('…');
        }
        let mut parts = vec![
            format!("updates: {}", self.updates.get()),
            format!("route: {shown}"),
        ];
        if self.options.show_depth {
            parts.push(format!(
                "depth: {} (max {})",
                route.len(),
                self.deepest.get()
            ));
        }
        Some(parts.join("  |  "))
    }
}

impl Subscriber<Route> for RouteHud {
    fn new_state(&self, route: &Route) {
        self.updates.set(self.updates.get() + 1);
        self.deepest.set(self.deepest.get().max(route.len()));
        *self.route.borrow_mut() = route.clone();
    }
}

/// Logs every value it receives.
pub struct StateLog {
    label: &'static str,
    level: log::Level,
    count: Cell<u64>,
}

impl StateLog {
    pub fn new(label: &'static str) -> Self {
        Self::with_level(label, log::Level::Debug)
    }

    pub fn with_level(label: &'static str, level: log::Level) -> Self {
        Self {
            label,
            level,
            count: Cell::new(0),
        }
    }

    pub fn count(&self) -> u64 {
        self.count.get()
    }
}

impl<T: Debug> Subscriber<T> for StateLog {
    fn new_state(&self, state: &T) {
        let n = self.count.get() + 1;
        self.count.set(n);
        log::log!(self.level, "{} #{n}: {state:?}", self.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cordux_core::*;
    use std::rc::Rc;

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

    fn store() -> Store<AppState> {
        Store::new(
            AppState::default(),
            reducer(|_: &dyn Action, s: &AppState| s.clone()),
        )
    }

    #[test]
    fn test_hud_tracks_route() {
        let store = store();
        let hud = Rc::new(RouteHud::default());
        store.subscribe_with(&hud, |s: &AppState| s.route.clone());
        assert_eq!(
            hud.overlay().as_deref(),
            Some("updates: 1  |  route: /  |  depth: 0 (max 0)")
        );

        store.route(RouteAction::Push(["first", "detail"]));
        store.route(RouteAction::Pop("detail"));
        assert_eq!(hud.updates(), 3);
        assert_eq!(
            hud.overlay().as_deref(),
            Some("updates: 3  |  route: first  |  depth: 1 (max 2)")
        );

        hud.toggle();
        assert_eq!(hud.overlay(), None);
    }

    #[test]
    fn test_hud_truncates_long_routes() {
        let hud = RouteHud::new(HudOptions {
            show_depth: false,
            max_route_chars: 5,
        });
        hud.new_state(&"abc/defgh".parse::<Route>().unwrap());
        assert_eq!(
            hud.overlay().as_deref(),
            Some("updates: 1  |  route: abc/…")
        );
    }

    #[test]
    fn test_state_log_counts_deliveries() {
        let store = store();
        let log = Rc::new(StateLog::new("state"));
        store.subscribe(&log);
        store.dispatch_silently(RouteAction::Push("a"));
        store.route(RouteAction::Push("b"));
        assert_eq!(log.count(), 2);
    }
}
