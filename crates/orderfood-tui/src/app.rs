//! Application state management for OrderFood.
//!
//! This module contains the core `App` struct that manages all application
//! state: the session and access gate, navigation, the login/register forms,
//! the menu, cart and order data, notifications, and background task
//! coordination.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use orderfood_core::api::{ApiSettings, Menu};
use orderfood_core::auth::{CredentialStore, RouteDecision};
use orderfood_core::models::{Cart, CategoryFilter, Identity, Item, Order};
use orderfood_core::{AccessGate, Config, Navigator, Notifier, Route, Session, SessionManager, ToastQueue};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for email input (RFC 5321 path limit).
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Which credential form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Register,
}

impl FormKind {
    pub fn route(&self) -> Route {
        match self {
            FormKind::Login => Route::Login,
            FormKind::Register => Route::Register,
        }
    }

    /// Inline error shown when the backend gives no message.
    pub fn failure_text(&self) -> &'static str {
        match self {
            FormKind::Login => "Login failed. Please try again.",
            FormKind::Register => "Registration failed.",
        }
    }

    /// The form on the other side of the "switch" link.
    pub fn other(&self) -> Self {
        match self {
            FormKind::Login => FormKind::Register,
            FormKind::Register => FormKind::Login,
        }
    }
}

/// Credential form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Email,
    Password,
    Button,
    /// "Don't have an account? Register" and its counterpart
    SwitchLink,
}

impl FormFocus {
    pub fn next(&self) -> Self {
        match self {
            FormFocus::Email => FormFocus::Password,
            FormFocus::Password => FormFocus::Button,
            FormFocus::Button => FormFocus::SwitchLink,
            FormFocus::SwitchLink => FormFocus::Email,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormFocus::Email => FormFocus::SwitchLink,
            FormFocus::Password => FormFocus::Email,
            FormFocus::Button => FormFocus::Password,
            FormFocus::SwitchLink => FormFocus::Button,
        }
    }
}

/// Login or register form contents.
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub email: String,
    pub password: String,
    pub focus: FormFocus,
    /// A request is in flight; the button is disabled until it settles
    pub submitting: bool,
    pub error: Option<String>,
}

impl AuthForm {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: FormFocus::Email,
            submitting: false,
            error: None,
        }
    }

    /// Type a character into the focused field, if it fits.
    pub fn push_char(&mut self, c: char) {
        match self.focus {
            FormFocus::Email if can_add_email_char(self.email.chars().count(), c) => {
                self.email.push(c);
            }
            FormFocus::Password if can_add_password_char(self.password.chars().count(), c) => {
                self.password.push(c);
            }
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormFocus::Email => {
                self.email.pop();
            }
            FormFocus::Password => {
                self.password.pop();
            }
            FormFocus::Button | FormFocus::SwitchLink => {}
        }
    }

    /// Fields are checked locally only for presence; the backend decides
    /// whether they are valid.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            Err("Email and password required")
        } else {
            Ok(())
        }
    }
}

impl Default for AuthForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Remote data as seen by a screen. Empty results are `Loaded` with an
/// empty value, never confused with loading or failure.
#[derive(Debug, Clone, Default)]
pub enum Loadable<T> {
    #[default]
    NotLoaded,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from spawned API tasks back to the main loop.
enum TaskResult {
    /// Login or registration settled; failures were already toasted
    Auth {
        kind: FormKind,
        email: String,
        result: Result<Identity, String>,
    },
    Menu(Result<Menu, String>),
    Cart(Result<Cart, String>),
    AddedToCart {
        name: String,
        result: Result<(), String>,
    },
    CheckedOut(Result<(), String>),
    Orders(Result<Vec<Order>, String>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    config_path: Option<PathBuf>,
    pub sessions: Arc<SessionManager>,
    gate: AccessGate,
    notifier: Notifier,

    /// Snapshot of the session, refreshed on every change
    pub session: Session,
    pub nav: Navigator,
    /// Route whose data was last loaded, to reload on re-entry
    entered: Option<Route>,

    // UI State
    pub state: AppState,
    pub toasts: ToastQueue,

    // Forms
    pub login_form: AuthForm,
    pub register_form: AuthForm,

    // Menu
    pub menu: Loadable<Menu>,
    pub category_index: usize,
    pub menu_selection: usize,

    // Cart
    pub cart: Loadable<Cart>,
    pub cart_selection: usize,
    pub checking_out: bool,

    // Orders
    pub orders: Loadable<Vec<Order>>,
    pub orders_selection: usize,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,
}

impl App {
    /// Create a new application instance. The session starts unresolved;
    /// call [`App::restore_session`] to read stored credentials.
    pub fn new(
        config: Config,
        store: CredentialStore,
        settings: &ApiSettings,
        start: Route,
    ) -> Result<Self> {
        let (notifier, toast_rx) = Notifier::channel();
        let sessions = Arc::new(SessionManager::new(settings, store, notifier.clone())?);
        let gate = AccessGate::new(sessions.subscribe());
        let session = sessions.current();
        debug!(base_url = sessions.api().base_url(), "App created");

        let (task_tx, task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let mut login_form = AuthForm::new();
        if let Some(ref email) = config.last_email {
            login_form.email = email.clone();
            login_form.focus = FormFocus::Password;
        }

        Ok(Self {
            config,
            config_path: None,
            sessions,
            gate,
            notifier,

            session,
            nav: Navigator::new(start),
            entered: None,

            state: AppState::Normal,
            toasts: ToastQueue::new(toast_rx),

            login_form,
            register_form: AuthForm::new(),

            menu: Loadable::NotLoaded,
            category_index: 0,
            menu_selection: 0,

            cart: Loadable::NotLoaded,
            cart_selection: 0,
            checking_out: false,

            orders: Loadable::NotLoaded,
            orders_selection: 0,

            task_rx,
            task_tx,
        })
    }

    /// Persist config changes (last email) to `path`.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Pre-fill the login form, e.g. from environment variables.
    pub fn prefill_login(&mut self, email: Option<String>, password: Option<String>) {
        if let Some(email) = email {
            self.login_form.email = email;
            self.login_form.focus = FormFocus::Password;
        }
        if let Some(password) = password {
            self.login_form.password = password;
            self.login_form.focus = FormFocus::Button;
        }
    }

    // =========================================================================
    // Session & Routing
    // =========================================================================

    /// Read stored credentials and settle the gate.
    pub fn restore_session(&mut self) {
        self.sessions.restore();
        self.sync_session();
        self.sync_route();
    }

    pub fn user(&self) -> Option<&Identity> {
        self.session.user()
    }

    /// What the access gate says about the current route.
    pub fn route_decision(&self) -> RouteDecision {
        self.gate.decide(self.nav.current())
    }

    pub fn navigate(&mut self, route: Route) {
        self.nav.push(route);
        self.sync_route();
    }

    pub fn go_back(&mut self) {
        if self.nav.back() {
            self.sync_route();
        }
    }

    pub fn logout(&mut self) {
        self.sessions.logout();
        self.sync_session();
        self.navigate(Route::Login);
    }

    /// Pick up a session change, if there was one.
    fn sync_session(&mut self) {
        if !self.gate.take_change() {
            return;
        }
        self.session = self.sessions.current();
        debug!(
            resolved = self.session.is_resolved(),
            authenticated = self.session.is_authenticated(),
            "Session changed"
        );
        if !self.session.is_authenticated() {
            self.clear_user_data();
        }
        // Re-run the current route's loader under the new session
        self.entered = None;
    }

    /// Apply the gate to the current route: redirect, wait, or enter it.
    fn sync_route(&mut self) {
        let route = self.nav.current();
        match self.gate.decide(route) {
            RouteDecision::Redirect { to } => {
                info!(from = route.path(), to = to.path(), "Redirecting");
                self.nav.replace(to);
                self.entered = None;
                self.sync_route();
            }
            RouteDecision::Wait => {}
            RouteDecision::Render => {
                if self.entered != Some(route) {
                    self.entered = Some(route);
                    self.on_enter(route);
                }
            }
        }
    }

    /// Load whatever the route shows.
    fn on_enter(&mut self, route: Route) {
        match route {
            Route::Home => {
                if self.session.is_authenticated() && matches!(self.menu, Loadable::NotLoaded) {
                    self.load_menu();
                }
            }
            Route::Cart => self.load_cart(),
            Route::Orders => self.load_orders(),
            Route::Login => self.login_form.error = None,
            Route::Register => self.register_form.error = None,
            Route::NotFound => {}
        }
    }

    fn clear_user_data(&mut self) {
        self.menu = Loadable::NotLoaded;
        self.cart = Loadable::NotLoaded;
        self.orders = Loadable::NotLoaded;
        self.category_index = 0;
        self.menu_selection = 0;
        self.cart_selection = 0;
        self.orders_selection = 0;
        self.checking_out = false;
    }

    // =========================================================================
    // Forms
    // =========================================================================

    pub fn form(&self, kind: FormKind) -> &AuthForm {
        match kind {
            FormKind::Login => &self.login_form,
            FormKind::Register => &self.register_form,
        }
    }

    pub fn form_mut(&mut self, kind: FormKind) -> &mut AuthForm {
        match kind {
            FormKind::Login => &mut self.login_form,
            FormKind::Register => &mut self.register_form,
        }
    }

    /// Submit the login or register form on a background task.
    pub fn submit_form(&mut self, kind: FormKind) {
        let form = self.form_mut(kind);
        if form.submitting {
            return;
        }
        if let Err(message) = form.validate() {
            form.error = Some(message.to_string());
            return;
        }
        form.error = None;
        form.submitting = true;

        let email = form.email.trim().to_string();
        let password = form.password.clone();
        let sessions = Arc::clone(&self.sessions);
        let tx = self.task_tx.clone();

        tokio::spawn(async move {
            let result = match kind {
                FormKind::Login => sessions.login(&email, &password).await,
                FormKind::Register => sessions.register(&email, &password).await,
            };
            let result = result.map_err(|e| e.user_message(kind.failure_text()));
            Self::send_result(&tx, TaskResult::Auth { kind, email, result }).await;
        });
    }

    fn remember_email(&mut self, email: String) {
        self.config.last_email = Some(email);
        if let Some(ref path) = self.config_path {
            if let Err(e) = self.config.save_to(path) {
                warn!(error = %e, "Failed to save config");
            }
        }
    }

    // =========================================================================
    // Menu
    // =========================================================================

    pub fn load_menu(&mut self) {
        self.menu = Loadable::Loading;
        let api = self.sessions.api().clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_menu().await.map_err(|e| e.to_string());
            Self::send_result(&tx, TaskResult::Menu(result)).await;
        });
    }

    /// "All" followed by the loaded categories.
    pub fn category_filters(&self) -> Vec<CategoryFilter> {
        match self.menu.loaded() {
            Some(menu) => CategoryFilter::options(&menu.categories),
            None => vec![CategoryFilter::All],
        }
    }

    pub fn current_filter(&self) -> CategoryFilter {
        self.category_filters()
            .into_iter()
            .nth(self.category_index)
            .unwrap_or_default()
    }

    pub fn cycle_category(&mut self, forward: bool) {
        let count = self.category_filters().len();
        if count == 0 {
            return;
        }
        self.category_index = if forward {
            (self.category_index + 1) % count
        } else {
            (self.category_index + count - 1) % count
        };
        self.menu_selection = 0;
    }

    pub fn visible_items(&self) -> Vec<&Item> {
        match self.menu.loaded() {
            Some(menu) => self.current_filter().apply(&menu.items),
            None => Vec::new(),
        }
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.visible_items().get(self.menu_selection).copied()
    }

    pub fn add_selected_to_cart(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        if !item.in_stock() {
            self.notifier.error(format!("{} is out of stock.", item.name));
            return;
        }

        let item_id = item.id.clone();
        let name = item.name.clone();
        let api = self.sessions.api().clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = api
                .add_to_cart(&item_id, 1)
                .await
                .map_err(|e| e.user_message("Please log in to add items."));
            Self::send_result(&tx, TaskResult::AddedToCart { name, result }).await;
        });
    }

    // =========================================================================
    // Cart & Orders
    // =========================================================================

    pub fn load_cart(&mut self) {
        self.cart = Loadable::Loading;
        let api = self.sessions.api().clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_cart().await.map_err(|e| e.to_string());
            Self::send_result(&tx, TaskResult::Cart(result)).await;
        });
    }

    pub fn checkout(&mut self) {
        if self.checking_out {
            return;
        }
        match self.cart.loaded() {
            Some(cart) if !cart.is_empty() => {}
            _ => return,
        }
        self.checking_out = true;

        let api = self.sessions.api().clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = api
                .checkout()
                .await
                .map_err(|e| e.user_message("Checkout failed."));
            Self::send_result(&tx, TaskResult::CheckedOut(result)).await;
        });
    }

    pub fn load_orders(&mut self) {
        self.orders = Loadable::Loading;
        let api = self.sessions.api().clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_order_history().await.map_err(|e| e.to_string());
            Self::send_result(&tx, TaskResult::Orders(result)).await;
        });
    }

    /// Reload the data behind the current screen.
    pub fn refresh_current(&mut self) {
        if self.route_decision() != RouteDecision::Render {
            return;
        }
        match self.nav.current() {
            Route::Home if self.session.is_authenticated() => self.load_menu(),
            Route::Cart => self.load_cart(),
            Route::Orders => self.load_orders(),
            _ => return,
        }
        self.notifier.info("Refreshing...");
    }

    pub fn selected_order(&self) -> Option<&Order> {
        self.orders.loaded().and_then(|o| o.get(self.orders_selection))
    }

    // =========================================================================
    // Background Tasks
    // =========================================================================

    /// Helper to send task results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send task result - channel closed");
        }
    }

    /// Fold in session changes, finished tasks and expired toasts.
    pub fn check_background_tasks(&mut self) {
        self.sync_session();

        let mut results = Vec::new();
        while let Ok(result) = self.task_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.process_task_result(result);
        }

        self.sync_session();
        self.sync_route();
        self.toasts.poll(Utc::now());
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Auth { kind, email, result } => {
                let form = self.form_mut(kind);
                form.submitting = false;
                match result {
                    Ok(user) => {
                        info!(user_id = %user.id, "Signed in");
                        form.password.clear();
                        form.error = None;
                        self.remember_email(email);
                        self.sync_session();
                        self.navigate(Route::Home);
                    }
                    Err(message) => {
                        form.error = Some(message);
                    }
                }
            }
            TaskResult::Menu(result) => match result {
                Ok(menu) => {
                    self.menu = Loadable::Loaded(menu);
                    let filters = self.category_filters().len();
                    if self.category_index >= filters {
                        self.category_index = 0;
                    }
                    self.clamp_selections();
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load menu");
                    self.notifier.error("Could not load data.");
                    self.menu = Loadable::Failed(e);
                }
            },
            TaskResult::Cart(result) => match result {
                Ok(cart) => {
                    self.cart = Loadable::Loaded(cart);
                    self.clamp_selections();
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load cart");
                    self.notifier.error("Could not load your cart.");
                    self.cart = Loadable::Failed(e);
                }
            },
            TaskResult::AddedToCart { name, result } => match result {
                Ok(()) => {
                    self.notifier.success(format!("{} added to cart!", name));
                    // Cart screen reloads on entry; drop the stale copy
                    self.cart = Loadable::NotLoaded;
                }
                Err(message) => self.notifier.error(message),
            },
            TaskResult::CheckedOut(result) => {
                self.checking_out = false;
                match result {
                    Ok(()) => {
                        info!("Order placed");
                        self.notifier.success("Order placed successfully!");
                        // The cart is empty now; show the new order instead
                        self.cart = Loadable::NotLoaded;
                        self.cart_selection = 0;
                        self.orders = Loadable::NotLoaded;
                        self.navigate(Route::Orders);
                    }
                    Err(message) => self.notifier.error(message),
                }
            }
            TaskResult::Orders(result) => match result {
                Ok(orders) => {
                    self.orders = Loadable::Loaded(orders);
                    self.clamp_selections();
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load order history");
                    self.notifier.error("Could not load order history.");
                    self.orders = Loadable::Failed(e);
                }
            },
        }
    }

    fn clamp_selections(&mut self) {
        let items = self.visible_items().len();
        self.menu_selection = self.menu_selection.min(items.saturating_sub(1));
        let lines = self.cart.loaded().map(|c| c.items.len()).unwrap_or(0);
        self.cart_selection = self.cart_selection.min(lines.saturating_sub(1));
        let orders = self.orders.loaded().map(|o| o.len()).unwrap_or(0);
        self.orders_selection = self.orders_selection.min(orders.saturating_sub(1));
    }

    // =========================================================================
    // List Navigation
    // =========================================================================

    /// Number of rows in the current screen's list
    pub fn list_len(&self) -> usize {
        match self.nav.current() {
            Route::Home => self.visible_items().len(),
            Route::Cart => self.cart.loaded().map(|c| c.items.len()).unwrap_or(0),
            Route::Orders => self.orders.loaded().map(|o| o.len()).unwrap_or(0),
            _ => 0,
        }
    }

    fn selection_mut(&mut self) -> Option<&mut usize> {
        match self.nav.current() {
            Route::Home => Some(&mut self.menu_selection),
            Route::Cart => Some(&mut self.cart_selection),
            Route::Orders => Some(&mut self.orders_selection),
            _ => None,
        }
    }

    /// Move the current list selection by `delta`, clamped to the list.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.list_len();
        if let Some(selection) = self.selection_mut() {
            let max = len.saturating_sub(1) as isize;
            *selection = (*selection as isize + delta).clamp(0, max) as usize;
        }
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if an email character should be accepted
pub fn can_add_email_char(current_len: usize, c: char) -> bool {
    current_len < MAX_EMAIL_LENGTH && is_valid_input_char(c) && !c.is_whitespace()
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use orderfood_core::models::{CartLine, Category, Money, ProductSummary};
    use orderfood_core::ToastLevel;

    fn user() -> Identity {
        Identity {
            id: "u1".to_string(),
            email: "a@b.com".to_string(),
        }
    }

    fn test_app(store: CredentialStore, start: Route) -> App {
        // Port 9 (discard) - nothing answers, which is fine for these tests
        let settings = ApiSettings::new("http://127.0.0.1:9/api");
        App::new(Config::default(), store, &settings, start).expect("app builds")
    }

    fn logged_in_store() -> CredentialStore {
        let store = CredentialStore::in_memory();
        store.set("t1", &user()).expect("writable");
        store
    }

    fn item(id: &str, category: &str, stock: u32) -> Item {
        Item {
            id: id.to_string(),
            name: format!("Item {}", id),
            description: None,
            price: Money::from_cents(500),
            image_url: None,
            stock,
            category_id: category.to_string(),
            category: Category {
                id: category.to_string(),
                name: category.to_string(),
            },
        }
    }

    fn menu() -> Menu {
        Menu {
            categories: vec![
                Category { id: "Mains".into(), name: "Mains".into() },
                Category { id: "Desserts".into(), name: "Desserts".into() },
            ],
            items: vec![item("1", "Mains", 3), item("2", "Desserts", 0), item("3", "Mains", 1)],
        }
    }

    // -------------------------------------------------------------------------
    // Form Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_form_focus_cycle() {
        assert_eq!(FormFocus::Email.next(), FormFocus::Password);
        assert_eq!(FormFocus::Password.next(), FormFocus::Button);
        assert_eq!(FormFocus::Button.next(), FormFocus::SwitchLink);
        assert_eq!(FormFocus::SwitchLink.next(), FormFocus::Email); // Wraps around
        assert_eq!(FormFocus::Email.prev(), FormFocus::SwitchLink);
        assert_eq!(FormFocus::Button.prev(), FormFocus::Password);
    }

    #[test]
    fn test_form_typing() {
        let mut form = AuthForm::new();
        for c in "a@b.com".chars() {
            form.push_char(c);
        }
        form.push_char(' ');
        assert_eq!(form.email, "a@b.com");

        form.focus = FormFocus::Password;
        form.push_char('p');
        form.push_char('w');
        form.backspace();
        assert_eq!(form.password, "p");

        form.focus = FormFocus::Button;
        form.push_char('x');
        assert_eq!(form.email, "a@b.com");
        assert_eq!(form.password, "p");
    }

    #[test]
    fn test_form_validate() {
        let mut form = AuthForm::new();
        assert!(form.validate().is_err());
        form.email = "a@b.com".to_string();
        assert!(form.validate().is_err());
        form.password = "pw".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_can_add_email_char() {
        assert!(can_add_email_char(0, 'a'));
        assert!(can_add_email_char(253, '@'));
        assert!(!can_add_email_char(254, 'a'));
        assert!(!can_add_email_char(0, ' '));
        assert!(!can_add_email_char(0, '\n'));
        assert!(!can_add_email_char(0, '\x00'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(can_add_password_char(0, ' '));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\r'));
    }

    #[test]
    fn test_form_kind() {
        assert_eq!(FormKind::Login.route(), Route::Login);
        assert_eq!(FormKind::Register.route(), Route::Register);
        assert_eq!(FormKind::Login.other(), FormKind::Register);
    }

    // -------------------------------------------------------------------------
    // Gate & Routing Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_unresolved_session_waits() {
        let app = test_app(CredentialStore::in_memory(), Route::Cart);
        assert!(!app.session.is_resolved());
        assert_eq!(app.route_decision(), RouteDecision::Wait);
        assert_eq!(app.nav.current(), Route::Cart);
    }

    #[test]
    fn test_visitor_is_redirected_to_login() {
        let mut app = test_app(CredentialStore::in_memory(), Route::Home);
        app.restore_session();
        assert!(app.user().is_none());

        app.navigate(Route::Orders);
        assert_eq!(app.nav.current(), Route::Login);

        // The blocked screen is not in history
        app.go_back();
        assert_eq!(app.nav.current(), Route::Home);
    }

    #[test]
    fn test_start_on_protected_route_without_session() {
        let mut app = test_app(CredentialStore::in_memory(), Route::Cart);
        app.restore_session();
        assert_eq!(app.nav.current(), Route::Login);
        assert_eq!(app.nav.depth(), 1);
    }

    #[tokio::test]
    async fn test_restored_user_reaches_cart() {
        let mut app = test_app(logged_in_store(), Route::Home);
        app.restore_session();
        assert_eq!(app.user().map(|u| u.email.as_str()), Some("a@b.com"));
        assert!(app.menu.is_loading());

        app.navigate(Route::Cart);
        assert_eq!(app.nav.current(), Route::Cart);
        assert_eq!(app.route_decision(), RouteDecision::Render);
        assert!(app.cart.is_loading());
    }

    #[tokio::test]
    async fn test_logout_redirects_and_clears_data() {
        let mut app = test_app(logged_in_store(), Route::Home);
        app.restore_session();
        app.navigate(Route::Orders);
        app.orders = Loadable::Loaded(vec![]);

        app.logout();
        assert!(app.user().is_none());
        assert_eq!(app.nav.current(), Route::Login);
        assert!(matches!(app.orders, Loadable::NotLoaded));

        // Going back would land on a protected screen; the gate bounces it
        app.go_back();
        assert_eq!(app.nav.current(), Route::Login);
    }

    #[test]
    fn test_unknown_start_route() {
        let mut app = test_app(CredentialStore::in_memory(), Route::from_path("/nope"));
        app.restore_session();
        assert_eq!(app.nav.current(), Route::NotFound);
        assert_eq!(app.route_decision(), RouteDecision::Render);
    }

    // -------------------------------------------------------------------------
    // Task Result Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_submit_requires_fields() {
        let mut app = test_app(CredentialStore::in_memory(), Route::Login);
        app.restore_session();
        app.login_form.email.clear();
        app.submit_form(FormKind::Login);
        assert!(!app.login_form.submitting);
        assert_eq!(app.login_form.error.as_deref(), Some("Email and password required"));
    }

    #[tokio::test]
    async fn test_double_submit_is_ignored() {
        let mut app = test_app(CredentialStore::in_memory(), Route::Login);
        app.restore_session();
        app.login_form.email = "a@b.com".to_string();
        app.login_form.password = "pw".to_string();

        app.submit_form(FormKind::Login);
        assert!(app.login_form.submitting);
        app.login_form.error = Some("marker".to_string());
        app.submit_form(FormKind::Login);
        // Second submit returned early without touching the form
        assert_eq!(app.login_form.error.as_deref(), Some("marker"));
    }

    #[test]
    fn test_failed_login_result() {
        let mut app = test_app(CredentialStore::in_memory(), Route::Login);
        app.restore_session();
        app.login_form.submitting = true;

        app.process_task_result(TaskResult::Auth {
            kind: FormKind::Login,
            email: "a@b.com".to_string(),
            result: Err("Invalid credentials".to_string()),
        });
        assert!(!app.login_form.submitting);
        assert_eq!(app.login_form.error.as_deref(), Some("Invalid credentials"));
        assert_eq!(app.nav.current(), Route::Login);
    }

    #[tokio::test]
    async fn test_successful_login_result_goes_home() {
        let mut app = test_app(logged_in_store(), Route::Login);
        app.restore_session();
        app.login_form.submitting = true;
        app.login_form.password = "pw".to_string();

        app.process_task_result(TaskResult::Auth {
            kind: FormKind::Login,
            email: "a@b.com".to_string(),
            result: Ok(user()),
        });
        assert!(!app.login_form.submitting);
        assert!(app.login_form.password.is_empty());
        assert_eq!(app.config.last_email.as_deref(), Some("a@b.com"));
        assert_eq!(app.nav.current(), Route::Home);
    }

    #[test]
    fn test_load_failures_are_distinct_from_empty() {
        let mut app = test_app(CredentialStore::in_memory(), Route::Home);
        app.process_task_result(TaskResult::Cart(Err("Unauthorized".to_string())));
        assert!(matches!(app.cart, Loadable::Failed(_)));

        app.process_task_result(TaskResult::Cart(Ok(Cart::default())));
        let cart = app.cart.loaded().expect("loaded");
        assert!(cart.is_empty());

        app.process_task_result(TaskResult::Orders(Ok(vec![])));
        assert_eq!(app.orders.loaded().map(|o| o.len()), Some(0));

        app.toasts.poll(Utc::now());
        let toast = app.toasts.current().expect("toast raised");
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.message, "Could not load your cart.");
    }

    #[test]
    fn test_add_to_cart_results() {
        let mut app = test_app(CredentialStore::in_memory(), Route::Home);
        app.process_task_result(TaskResult::AddedToCart {
            name: "Burger".to_string(),
            result: Ok(()),
        });
        app.toasts.poll(Utc::now());
        assert_eq!(
            app.toasts.current().map(|t| t.message.as_str()),
            Some("Burger added to cart!")
        );

        app.process_task_result(TaskResult::AddedToCart {
            name: "Burger".to_string(),
            result: Err("Please log in to add items.".to_string()),
        });
        app.toasts.poll(Utc::now());
        assert_eq!(
            app.toasts.current().map(|t| t.message.as_str()),
            Some("Please log in to add items.")
        );
    }

    #[test]
    fn test_checkout_needs_items() {
        let mut app = test_app(CredentialStore::in_memory(), Route::Cart);
        app.cart = Loadable::Loaded(Cart::default());
        app.checkout();
        assert!(!app.checking_out);
    }

    #[tokio::test]
    async fn test_checkout_result_shows_order_history() {
        let mut app = test_app(logged_in_store(), Route::Cart);
        app.restore_session();
        app.cart = Loadable::Loaded(Cart {
            id: "c1".to_string(),
            items: vec![CartLine {
                id: "l1".to_string(),
                quantity: 1,
                item: ProductSummary {
                    id: "i1".to_string(),
                    name: "Burger".to_string(),
                    price: Money::from_cents(1000),
                    image_url: None,
                },
            }],
        });

        app.checkout();
        assert!(app.checking_out);
        app.checkout(); // ignored while in flight

        app.process_task_result(TaskResult::CheckedOut(Ok(())));
        assert!(!app.checking_out);
        assert_eq!(app.nav.current(), Route::Orders);
        assert!(app.orders.is_loading());
        assert!(matches!(app.cart, Loadable::NotLoaded));

        // Back returns to the cart, which reloads on entry
        app.go_back();
        assert_eq!(app.nav.current(), Route::Cart);
        assert!(app.cart.is_loading());
        app.toasts.poll(Utc::now());
        assert_eq!(
            app.toasts.current().map(|t| t.message.as_str()),
            Some("Order placed successfully!")
        );
    }

    #[tokio::test]
    async fn test_refresh_reloads_current_screen() {
        let mut app = test_app(logged_in_store(), Route::Orders);
        app.restore_session();
        app.process_task_result(TaskResult::Orders(Ok(Vec::new())));
        assert!(!app.orders.is_loading());

        app.refresh_current();
        assert!(app.orders.is_loading());
        app.toasts.poll(Utc::now());
        assert_eq!(
            app.toasts.current().map(|t| t.message.as_str()),
            Some("Refreshing...")
        );
    }

    #[test]
    fn test_refresh_without_data_screen_is_silent() {
        let mut app = test_app(CredentialStore::in_memory(), Route::Home);
        app.restore_session();

        // Visitors have no menu to reload
        app.refresh_current();
        app.toasts.poll(Utc::now());
        assert!(app.toasts.current().is_none());
    }

    // -------------------------------------------------------------------------
    // Menu Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_category_cycling_filters_items() {
        let mut app = test_app(CredentialStore::in_memory(), Route::Home);
        app.process_task_result(TaskResult::Menu(Ok(menu())));
        assert_eq!(app.current_filter(), CategoryFilter::All);
        assert_eq!(app.visible_items().len(), 3);

        app.cycle_category(true);
        assert_eq!(app.current_filter().label(), "Mains");
        assert_eq!(app.visible_items().len(), 2);

        app.cycle_category(true);
        assert_eq!(app.current_filter().label(), "Desserts");
        assert_eq!(app.visible_items().len(), 1);

        app.cycle_category(true);
        assert_eq!(app.current_filter(), CategoryFilter::All);

        app.cycle_category(false);
        assert_eq!(app.current_filter().label(), "Desserts");
    }

    #[test]
    fn test_out_of_stock_item_is_not_added() {
        let mut app = test_app(CredentialStore::in_memory(), Route::Home);
        app.process_task_result(TaskResult::Menu(Ok(menu())));
        app.menu_selection = 1;
        assert_eq!(app.selected_item().map(|i| i.id.as_str()), Some("2"));

        // Would panic without a runtime if it tried to spawn a request
        app.add_selected_to_cart();
        app.toasts.poll(Utc::now());
        assert_eq!(
            app.toasts.current().map(|t| t.message.as_str()),
            Some("Item 2 is out of stock.")
        );
    }

    #[test]
    fn test_move_selection_clamps() {
        let mut app = test_app(CredentialStore::in_memory(), Route::Home);
        app.process_task_result(TaskResult::Menu(Ok(menu())));
        app.move_selection(10);
        assert_eq!(app.menu_selection, 2);
        app.move_selection(-1);
        assert_eq!(app.menu_selection, 1);
        app.move_selection(-10);
        assert_eq!(app.menu_selection, 0);
    }
}
