use tokio::sync::watch;

use super::Session;
use crate::routes::Route;

/// What the gate makes of the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Stored credentials not read yet; show a neutral loading indicator
    Resolving,
    Authenticated,
    Unauthenticated,
}

impl GateState {
    pub fn evaluate(session: &Session) -> Self {
        if !session.is_resolved() {
            GateState::Resolving
        } else if session.user().is_some() {
            GateState::Authenticated
        } else {
            GateState::Unauthenticated
        }
    }
}

/// What to do with a requested route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render,
    /// Show the loading indicator and decide again on the next change
    Wait,
    /// Navigate to `to`, replacing the current history entry
    Redirect { to: Route },
}

impl RouteDecision {
    pub fn for_route(route: Route, state: GateState) -> Self {
        if !route.is_protected() {
            return RouteDecision::Render;
        }
        match state {
            GateState::Resolving => RouteDecision::Wait,
            GateState::Authenticated => RouteDecision::Render,
            GateState::Unauthenticated => RouteDecision::Redirect { to: Route::Login },
        }
    }
}

/// Watches the session and answers gate questions about it.
///
/// Pure with respect to navigation: it never redirects by itself. The
/// caller acts on [`RouteDecision::Redirect`].
#[derive(Debug, Clone)]
pub struct AccessGate {
    session: watch::Receiver<Session>,
}

impl AccessGate {
    pub fn new(session: watch::Receiver<Session>) -> Self {
        Self { session }
    }

    pub fn state(&self) -> GateState {
        GateState::evaluate(&self.session.borrow())
    }

    pub fn decide(&self, route: Route) -> RouteDecision {
        RouteDecision::for_route(route, self.state())
    }

    /// True once per session change since the last call.
    pub fn take_change(&mut self) -> bool {
        match self.session.has_changed() {
            Ok(true) => {
                self.session.borrow_and_update();
                true
            }
            _ => false,
        }
    }
}
