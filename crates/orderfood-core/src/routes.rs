//! Screen routes and navigation history.

/// A screen in the client, addressed by the same paths as the web client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Cart,
    Orders,
    NotFound,
}

impl Route {
    /// Parse a path. Anything unknown is `NotFound`.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        match normalized {
            "/" | "" => Route::Home,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/cart" => Route::Cart,
            "/orders" => Route::Orders,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Cart => "/cart",
            Route::Orders => "/orders",
            Route::NotFound => "/404",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Cart => "Cart",
            Route::Orders => "My Orders",
            Route::NotFound => "Not Found",
        }
    }

    /// Routes that need a logged-in user.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Cart | Route::Orders)
    }
}

/// History stack of visited routes. Never empty.
#[derive(Debug, Clone)]
pub struct Navigator {
    history: Vec<Route>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            history: vec![start],
        }
    }

    pub fn current(&self) -> Route {
        *self.history.last().unwrap_or(&Route::Home)
    }

    /// Go to `route`, adding a history entry. Pushing the current route
    /// again is a no-op.
    pub fn push(&mut self, route: Route) {
        if self.current() != route {
            self.history.push(route);
        }
    }

    /// Go to `route` in place of the current entry, so going back skips it.
    pub fn replace(&mut self, route: Route) {
        match self.history.last_mut() {
            Some(last) => *last = route,
            None => self.history.push(route),
        }
        // Collapse a duplicate left behind by the replacement
        let len = self.history.len();
        if len >= 2 && self.history[len - 2] == route {
            self.history.pop();
        }
    }

    /// Go back one entry. Returns false when already at the first entry.
    pub fn back(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            true
        } else {
            false
        }
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}
