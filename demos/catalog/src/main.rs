use std::rc::Rc;

use cordux_core::prelude::*;
use cordux_devtools::{RouteHud, StateLog};
use cordux_navigation::{Coordinator, Scene, TabCoordinator, back, install_back_handler};

#[derive(Clone, Debug)]
struct AppState {
    route: Route,
    authenticated: bool,
    actions_performed: u32,
}

impl StateType for AppState {
    fn route(&self) -> &Route {
        &self.route
    }
    fn route_mut(&mut self) -> &mut Route {
        &mut self.route
    }
}

#[derive(Debug)]
struct Noop;
impl Action for Noop {}

#[derive(Debug)]
enum AuthenticationAction {
    SignOut,
}
impl Action for AuthenticationAction {}

struct AppReducer;

impl Reducer for AppReducer {
    type State = AppState;

    fn handle_action(&self, action: &dyn Action, state: &AppState) -> AppState {
        let mut next = state.clone();
        if action.is::<Noop>() {
            next.actions_performed += 1;
        } else if let Some(AuthenticationAction::SignOut) =
            action.downcast_ref::<AuthenticationAction>()
        {
            next.authenticated = false;
            next.route = "signin".to_route();
        }
        next
    }
}

/// One tab of the catalog: a root screen plus whatever was pushed on top.
struct CatalogTab {
    name: &'static str,
    store: Rc<Store<AppState>>,
}

impl CatalogTab {
    fn perform_action(&self) {
        self.store.dispatch(Noop);
    }

    fn sign_out(&self) {
        self.store.dispatch(AuthenticationAction::SignOut);
    }
}

impl Coordinator for CatalogTab {
    fn start(&self) {
        log::info!("{}: root screen ready", self.name);
    }

    fn update_route(&self, route: &Route) {
        if route.is_empty() {
            log::info!("{}: showing root", self.name);
        } else {
            log::info!("{}: showing {route}", self.name);
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let store = Rc::new(Store::new(
        AppState {
            route: Route::new(),
            authenticated: true,
            actions_performed: 0,
        },
        AppReducer,
    ));

    let first = Rc::new(CatalogTab {
        name: "first",
        store: store.clone(),
    });
    let second = Rc::new(CatalogTab {
        name: "second",
        store: store.clone(),
    });
    let tabs = Rc::new(TabCoordinator::new(
        store.clone(),
        vec![
            Scene::new("first", first.clone()),
            Scene::new("second", second.clone()),
        ],
    )?);

    tabs.start();
    tabs.attach();

    let hud = Rc::new(RouteHud::default());
    store.subscribe_with(&hud, |s: &AppState| s.route.clone());
    let state_log = Rc::new(StateLog::new("state"));
    store.subscribe(&state_log);
    let _back = install_back_handler(&store);

    first.perform_action();
    tabs.select_prefix("second")?;
    store.route(RouteAction::Push(["detail", "edit"]));
    back::handle();
    back::handle();
    second.perform_action();
    second.sign_out();

    let state = store.snapshot();
    log::info!(
        "finished: authenticated={} actions={}",
        state.authenticated,
        state.actions_performed
    );
    if let Some(line) = hud.overlay() {
        println!("{line}");
    }
    Ok(())
}
