//! Application state management for the dumpdesk console.
//!
//! This module contains the core `App` struct that manages all application state,
//! including UI state, the loaded entity pages, the session and background task
//! coordination.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use dumpdesk_core::api::{ApiClient, ApiError, DeleteOutcome, EntityKind};
use dumpdesk_core::auth::{
    FileSessionStore, JwtDecoder, MemorySessionStore, Navigator, Notifier, NotifyLevel,
    SessionManager, SessionStatus, SessionStore, SystemClock,
};
use dumpdesk_core::config::Config;
use dumpdesk_core::guard::{public_path, Page, Route};
use dumpdesk_core::models::{
    Admin, Customer, Driver, ListRequest, ListResponse, Product, UpdateAdminPayload,
};

use crate::form::EntityForm;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for the search query.
const MAX_SEARCH_LENGTH: usize = 64;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Env vars that prefill the sign-in form.
const USERNAME_ENV: &str = "DUMPDESK_USERNAME";
const PASSWORD_ENV: &str = "DUMPDESK_PASSWORD";

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs, one per console page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Admins,
    Customers,
    Drivers,
    Products,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Home,
        Tab::Admins,
        Tab::Customers,
        Tab::Drivers,
        Tab::Products,
    ];

    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Admins => "Admins",
            Tab::Customers => "Customers",
            Tab::Drivers => "Drivers",
            Tab::Products => "Products",
        }
    }

    pub fn page(&self) -> Page {
        match self {
            Tab::Home => Page::Home,
            Tab::Admins => Page::Admins,
            Tab::Customers => Page::Customers,
            Tab::Drivers => Page::Drivers,
            Tab::Products => Page::Products,
        }
    }

    /// The tab showing `page`, if any.
    pub fn from_page(page: Page) -> Option<Self> {
        match page {
            Page::Home => Some(Tab::Home),
            Page::Admins => Some(Tab::Admins),
            Page::Customers => Some(Tab::Customers),
            Page::Drivers => Some(Tab::Drivers),
            Page::Products => Some(Tab::Products),
            Page::NotFound => None,
        }
    }

    /// Entity collection listed on this tab.
    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            Tab::Home => None,
            Tab::Admins => Some(EntityKind::Admins),
            Tab::Customers => Some(EntityKind::Customers),
            Tab::Drivers => Some(EntityKind::Drivers),
            Tab::Products => Some(EntityKind::Products),
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Home => Tab::Admins,
            Tab::Admins => Tab::Customers,
            Tab::Customers => Tab::Drivers,
            Tab::Drivers => Tab::Products,
            Tab::Products => Tab::Home,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Home => Tab::Products,
            Tab::Admins => Tab::Home,
            Tab::Customers => Tab::Admins,
            Tab::Drivers => Tab::Customers,
            Tab::Products => Tab::Drivers,
        }
    }
}

/// Current UI focus area (list panel or detail panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ConfirmingDelete,
    /// A create/edit form is open
    EditingForm,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

// ============================================================================
// Navigation and notifications
// ============================================================================

/// Navigator handed to the session manager.
///
/// The manager may call it from the expiry timer task, so the requested path
/// is parked here and applied by the UI loop on its next tick.
#[derive(Debug, Default)]
pub struct PendingNavigation {
    path: Mutex<Option<String>>,
}

impl PendingNavigation {
    pub fn take(&self) -> Option<String> {
        self.path
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

impl Navigator for PendingNavigation {
    fn navigate_to(&self, path: &str) {
        debug!(path, "Navigation requested");
        *self
            .path
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(path.to_string());
    }
}

/// Notifier backing the status bar. The latest message wins.
#[derive(Debug, Default)]
pub struct StatusLine {
    message: Mutex<Option<(String, NotifyLevel)>>,
}

impl StatusLine {
    pub fn current(&self) -> Option<(String, NotifyLevel)> {
        self.message
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        *self
            .message
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

impl Notifier for StatusLine {
    fn notify(&self, message: &str, level: NotifyLevel) {
        match level {
            NotifyLevel::Success => info!(notice = message, "Notify"),
            NotifyLevel::Error => warn!(notice = message, "Notify"),
        }
        *self
            .message
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some((message.to_string(), level));
    }
}

// ============================================================================
// Entity lists
// ============================================================================

/// What the list panels need from a row.
pub trait Record {
    fn id(&self) -> &str;
    /// Case-insensitive match used where the backend does not search.
    fn matches(&self, query: &str) -> bool;
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl Record for Admin {
    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, query: &str) -> bool {
        query.is_empty()
            || contains_ignore_case(&self.full_name, query)
            || contains_ignore_case(&self.email, query)
            || self.cpf.contains(query)
    }
}

impl Record for Customer {
    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, query: &str) -> bool {
        query.is_empty()
            || contains_ignore_case(&self.full_name, query)
            || contains_ignore_case(&self.email, query)
    }
}

impl Record for Driver {
    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, query: &str) -> bool {
        query.is_empty()
            || contains_ignore_case(&self.full_name, query)
            || contains_ignore_case(&self.email, query)
    }
}

impl Record for Product {
    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, query: &str) -> bool {
        query.is_empty() || contains_ignore_case(&self.name, query)
    }
}

/// One page of an entity collection plus its selection state.
#[derive(Debug)]
pub struct EntityList<T> {
    pub page: ListResponse<T>,
    pub request: ListRequest,
    pub selection: usize,
    /// Ids marked for bulk delete
    pub marked: BTreeSet<String>,
    pub loading: bool,
    pub loaded: bool,
}

impl<T: Record> EntityList<T> {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: ListResponse::default(),
            request: ListRequest::new(page_size),
            selection: 0,
            marked: BTreeSet::new(),
            loading: false,
            loaded: false,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.page.data
    }

    /// Install a freshly fetched page. Marks on rows no longer shown are dropped.
    pub fn apply(&mut self, page: ListResponse<T>) {
        self.page = page;
        self.loading = false;
        self.loaded = true;
        self.selection = self.selection.min(self.page.data.len().saturating_sub(1));
        let ids: BTreeSet<&str> = self.page.data.iter().map(|r| r.id()).collect();
        self.marked.retain(|id| ids.contains(id.as_str()));
    }

    pub fn selected(&self) -> Option<&T> {
        self.page.data.get(self.selection)
    }

    pub fn select_next(&mut self, step: usize) {
        let last = self.page.data.len().saturating_sub(1);
        self.selection = (self.selection + step).min(last);
    }

    pub fn select_prev(&mut self, step: usize) {
        self.selection = self.selection.saturating_sub(step);
    }

    pub fn select_last(&mut self) {
        self.selection = self.page.data.len().saturating_sub(1);
    }

    pub fn toggle_mark(&mut self) {
        let Some(id) = self.selected().map(|r| r.id().to_string()) else {
            return;
        };
        if !self.marked.remove(&id) {
            self.marked.insert(id);
        }
    }

    pub fn is_marked(&self, id: &str) -> bool {
        self.marked.contains(id)
    }

    /// Ids a delete would act on: the marked rows, or the selected one.
    pub fn delete_targets(&self) -> Vec<String> {
        if !self.marked.is_empty() {
            return self.marked.iter().cloned().collect();
        }
        self.selected()
            .map(|r| vec![r.id().to_string()])
            .unwrap_or_default()
    }

    /// Move the query to the next page. Returns false on the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.page.has_next() {
            return false;
        }
        self.request = self.request.page(self.page.page_number + 1);
        self.selection = 0;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.page.has_prev() {
            return false;
        }
        self.request = self.request.page(self.page.page_number - 1);
        self.selection = 0;
        true
    }

    pub fn set_search(&mut self, query: &str) {
        self.request = self.request.with_search(query.trim());
        self.selection = 0;
    }

    pub fn clear(&mut self) {
        let page_size = self.request.page_size;
        *self = Self::new(page_size);
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from spawned API calls through the MPSC channel.
enum FetchResult {
    Admins(ListResponse<Admin>),
    Customers(ListResponse<Customer>),
    Drivers(ListResponse<Driver>),
    Products(ListResponse<Product>),
    /// Per-id outcomes of a bulk delete
    Deleted(EntityKind, Vec<DeleteOutcome>),
    /// A record was fetched for editing
    EditLoaded(Box<EntityForm>),
    /// A record was created or updated; carries its display name
    Saved {
        kind: EntityKind,
        name: String,
        created: bool,
    },
    /// A form submission was rejected by the backend
    SaveFailed(EntityKind, anyhow::Error),
    Error(EntityKind, anyhow::Error),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: SessionManager,
    pub api: ApiClient,
    navigation: Arc<PendingNavigation>,
    pub status: Arc<StatusLine>,
    session_rx: watch::Receiver<SessionStatus>,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub focus: Focus,
    pub search_query: String,
    /// Ids awaiting delete confirmation
    pub pending_delete: Vec<String>,
    /// Open create/edit form
    pub form: Option<EntityForm>,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,
    pub login_in_progress: bool,

    // Loaded pages
    pub admins: EntityList<Admin>,
    pub customers: EntityList<Customer>,
    pub drivers: EntityList<Driver>,
    pub products: EntityList<Product>,

    // Background task channel
    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,
}

impl App {
    /// Create a new application instance. An `ephemeral` app keeps its
    /// session in memory only.
    pub fn new(ephemeral: bool) -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        debug!(api = %config.api_url(), "Config loaded");

        let data_dir = config.data_dir().unwrap_or_else(|_| PathBuf::from("./data"));
        debug!(?data_dir, "Data directory configured");

        let navigation = Arc::new(PendingNavigation::default());
        let status = Arc::new(StatusLine::default());
        let session = SessionManager::new(
            session_store(ephemeral, &data_dir),
            Arc::new(JwtDecoder),
            navigation.clone(),
            Arc::new(SystemClock),
        );
        let session_rx = session.subscribe();

        let api = ApiClient::new(config.api_url())?;

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_username = std::env::var(USERNAME_ENV)
            .ok()
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();
        let login_password = std::env::var(PASSWORD_ENV).unwrap_or_default();
        let page_size = config.page_size;

        Ok(Self {
            config,
            session,
            api,
            navigation,
            status,
            session_rx,

            state: AppState::Normal,
            current_tab: Tab::Home,
            focus: Focus::List,
            search_query: String::new(),
            pending_delete: Vec::new(),
            form: None,

            login_focus: if login_username.is_empty() {
                LoginFocus::Username
            } else {
                LoginFocus::Password
            },
            login_username,
            login_password,
            login_error: None,
            login_in_progress: false,

            admins: EntityList::new(page_size),
            customers: EntityList::new(page_size),
            drivers: EntityList::new(page_size),
            products: EntityList::new(page_size),

            fetch_rx: rx,
            fetch_tx: tx,
        })
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Check the persisted session. Called once, after the first frame.
    pub fn restore_session(&mut self) {
        self.session.restore();
    }

    pub fn route(&self) -> Route {
        Route::from_auth(self.session.is_authenticated())
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) {
        let username = self.login_username.trim().to_string();
        let password = self.login_password.clone();

        if username.is_empty() || password.is_empty() {
            self.login_error = Some("Username and password required".to_string());
            return;
        }

        self.login_error = None;
        self.login_in_progress = true;
        let result = self.api.login(&username, &password).await;
        self.login_in_progress = false;

        match result {
            Ok(response) => {
                self.session.set_token(Some(&response.token));
                if self.session.is_authenticated() != Some(true) {
                    // Signed in, but not as an Admin
                    let message = "Access restricted to administrators";
                    self.login_error = Some(message.to_string());
                    self.status.notify(message, NotifyLevel::Error);
                    return;
                }

                self.config.last_username = Some(username.clone());
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.login_password.clear();
                self.status
                    .notify(&format!("Welcome, {}", username), NotifyLevel::Success);
                info!("Login successful");
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                let message = ApiError::login_message(&e);
                self.status.notify(&message, NotifyLevel::Error);
                self.login_error = Some(message);
            }
        }
    }

    pub fn logout(&mut self) {
        self.session.logout();
    }

    /// Apply session changes and pending navigation, then collect API results.
    pub fn check_background_tasks(&mut self) {
        if self.session_rx.has_changed().unwrap_or(false) {
            let status = *self.session_rx.borrow_and_update();
            self.on_session_status(status);
        }

        if let Some(path) = self.navigation.take() {
            self.navigate(&path);
        }

        let mut results = Vec::new();
        while let Ok(result) = self.fetch_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.process_fetch_result(result);
        }
    }

    fn on_session_status(&mut self, status: SessionStatus) {
        debug!(?status, "Session status changed");
        match status {
            SessionStatus::Authenticated => {
                self.focus = Focus::List;
                self.refresh_current_tab();
            }
            SessionStatus::Unauthenticated => {
                self.clear_data();
                self.form = None;
                self.state = AppState::Normal;
                self.current_tab = Tab::Home;
                self.login_focus = if self.login_username.is_empty() {
                    LoginFocus::Username
                } else {
                    LoginFocus::Password
                };
            }
            SessionStatus::Unknown => {}
        }
    }

    /// Resolve a path against the router for the current session.
    pub fn navigate(&mut self, path: &str) {
        match self.route() {
            Route::Private => match Tab::from_page(Page::from_path(path)) {
                Some(tab) => self.switch_tab(tab),
                None => {
                    warn!(path, "Unknown page");
                    self.status
                        .notify(&format!("Page not found: {}", path), NotifyLevel::Error);
                }
            },
            Route::Public | Route::Loading => {
                let path = public_path(path);
                self.current_tab = Tab::from_page(Page::from_path(path)).unwrap_or(Tab::Home);
            }
        }
    }

    fn clear_data(&mut self) {
        self.admins.clear();
        self.customers.clear();
        self.drivers.clear();
        self.products.clear();
        self.pending_delete.clear();
        self.search_query.clear();
    }

    // =========================================================================
    // Tabs and lists
    // =========================================================================

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.current_tab == tab {
            return;
        }
        debug!(path = tab.page().path(), "Switching tab");
        self.current_tab = tab;
        self.focus = Focus::List;
        self.search_query = self.current_search().to_string();
        if !self.current_loaded() {
            self.refresh_current_tab();
        }
    }

    fn current_loaded(&self) -> bool {
        match self.current_tab {
            Tab::Home => true,
            Tab::Admins => self.admins.loaded,
            Tab::Customers => self.customers.loaded,
            Tab::Drivers => self.drivers.loaded,
            Tab::Products => self.products.loaded,
        }
    }

    fn current_search(&self) -> &str {
        match self.current_tab {
            Tab::Home => "",
            Tab::Admins => &self.admins.request.search,
            Tab::Customers => &self.customers.request.search,
            Tab::Drivers => &self.drivers.request.search,
            Tab::Products => &self.products.request.search,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.admins.loading || self.customers.loading || self.drivers.loading || self.products.loading
    }

    pub fn select_next(&mut self, step: usize) {
        match self.current_tab {
            Tab::Home => {}
            Tab::Admins => self.admins.select_next(step),
            Tab::Customers => self.customers.select_next(step),
            Tab::Drivers => self.drivers.select_next(step),
            Tab::Products => self.products.select_next(step),
        }
    }

    pub fn select_prev(&mut self, step: usize) {
        match self.current_tab {
            Tab::Home => {}
            Tab::Admins => self.admins.select_prev(step),
            Tab::Customers => self.customers.select_prev(step),
            Tab::Drivers => self.drivers.select_prev(step),
            Tab::Products => self.products.select_prev(step),
        }
    }

    pub fn select_first(&mut self) {
        self.select_prev(usize::MAX);
    }

    pub fn select_last(&mut self) {
        match self.current_tab {
            Tab::Home => {}
            Tab::Admins => self.admins.select_last(),
            Tab::Customers => self.customers.select_last(),
            Tab::Drivers => self.drivers.select_last(),
            Tab::Products => self.products.select_last(),
        }
    }

    pub fn toggle_mark(&mut self) {
        match self.current_tab {
            Tab::Home => {}
            Tab::Admins => self.admins.toggle_mark(),
            Tab::Customers => self.customers.toggle_mark(),
            Tab::Drivers => self.drivers.toggle_mark(),
            Tab::Products => self.products.toggle_mark(),
        }
    }

    /// Change page. `forward` picks the direction.
    pub fn change_page(&mut self, forward: bool) {
        let moved = match (self.current_tab, forward) {
            (Tab::Home, _) | (Tab::Admins, _) => false,
            (Tab::Customers, true) => self.customers.next_page(),
            (Tab::Customers, false) => self.customers.prev_page(),
            (Tab::Drivers, true) => self.drivers.next_page(),
            (Tab::Drivers, false) => self.drivers.prev_page(),
            (Tab::Products, true) => self.products.next_page(),
            (Tab::Products, false) => self.products.prev_page(),
        };
        if moved {
            self.refresh_current_tab();
        }
    }

    /// Run the search typed into the search bar.
    pub fn apply_search(&mut self) {
        let query = self.search_query.clone();
        match self.current_tab {
            Tab::Home => return,
            Tab::Admins => self.admins.set_search(&query),
            Tab::Customers => self.customers.set_search(&query),
            Tab::Drivers => self.drivers.set_search(&query),
            Tab::Products => self.products.set_search(&query),
        }
        self.refresh_current_tab();
    }

    // =========================================================================
    // Background work
    // =========================================================================

    /// Client carrying the current session token.
    fn authed_api(&self) -> ApiClient {
        match self.session.token() {
            Some(token) => self.api.with_token(token),
            None => self.api.clone(),
        }
    }

    /// Helper to send results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<FetchResult>, result: FetchResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send fetch result - channel closed");
        }
    }

    /// Helper to send a successful fetch result or an error
    async fn send_fetch_result<T, F>(
        tx: &mpsc::Sender<FetchResult>,
        kind: EntityKind,
        result: Result<T>,
        wrapper: F,
    ) where
        F: FnOnce(T) -> FetchResult,
    {
        match result {
            Ok(data) => {
                debug!(kind = kind.label(), "Request succeeded");
                Self::send_result(tx, wrapper(data)).await;
            }
            Err(e) => {
                error!(kind = kind.label(), error = %e, "Request failed");
                Self::send_result(tx, FetchResult::Error(kind, e)).await;
            }
        }
    }

    /// Reload the page shown on the current tab.
    pub fn refresh_current_tab(&mut self) {
        let Some(kind) = self.current_tab.kind() else {
            return;
        };
        if self.route() != Route::Private {
            return;
        }

        let api = self.authed_api();
        let tx = self.fetch_tx.clone();
        debug!(kind = kind.label(), "Refreshing");

        match kind {
            EntityKind::Admins => {
                self.admins.loading = true;
                let search = self.admins.request.search.clone();
                tokio::spawn(async move {
                    // Not paginated; search is applied here
                    let result = api.list_admins().await.map(|admins| {
                        ListResponse::single_page(
                            admins.into_iter().filter(|a| a.matches(&search)).collect(),
                        )
                    });
                    Self::send_fetch_result(&tx, kind, result, FetchResult::Admins).await;
                });
            }
            EntityKind::Customers => {
                self.customers.loading = true;
                let request = self.customers.request.clone();
                tokio::spawn(async move {
                    let result = api.list_customers(&request).await;
                    Self::send_fetch_result(&tx, kind, result, FetchResult::Customers).await;
                });
            }
            EntityKind::Drivers => {
                self.drivers.loading = true;
                let request = self.drivers.request.clone();
                tokio::spawn(async move {
                    let result = api.list_drivers(&request).await;
                    Self::send_fetch_result(&tx, kind, result, FetchResult::Drivers).await;
                });
            }
            EntityKind::Products => {
                self.products.loading = true;
                let request = self.products.request.clone();
                tokio::spawn(async move {
                    let result = api.list_products(&request).await;
                    Self::send_fetch_result(&tx, kind, result, FetchResult::Products).await;
                });
            }
        }
    }

    /// Ask for confirmation before deleting the marked (or selected) rows.
    pub fn request_delete(&mut self) {
        let targets = match self.current_tab {
            Tab::Home => Vec::new(),
            Tab::Admins => self.admins.delete_targets(),
            Tab::Customers => self.customers.delete_targets(),
            Tab::Drivers => self.drivers.delete_targets(),
            Tab::Products => self.products.delete_targets(),
        };
        if targets.is_empty() {
            return;
        }
        self.pending_delete = targets;
        self.state = AppState::ConfirmingDelete;
    }

    pub fn confirm_delete(&mut self) {
        self.state = AppState::Normal;
        let ids = std::mem::take(&mut self.pending_delete);
        let Some(kind) = self.current_tab.kind() else {
            return;
        };
        if ids.is_empty() {
            return;
        }

        info!(kind = kind.label(), count = ids.len(), "Deleting");
        let api = self.authed_api();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let outcomes = api.delete_many(kind, &ids).await;
            Self::send_result(&tx, FetchResult::Deleted(kind, outcomes)).await;
        });
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete.clear();
        self.state = AppState::Normal;
    }

    fn selected_id(&self) -> Option<String> {
        match self.current_tab {
            Tab::Home => None,
            Tab::Admins => self.admins.selected().map(|r| r.id.clone()),
            Tab::Customers => self.customers.selected().map(|r| r.id.clone()),
            Tab::Drivers => self.drivers.selected().map(|r| r.id.clone()),
            Tab::Products => self.products.selected().map(|r| r.id.clone()),
        }
    }

    /// Open an empty form for a new record on the current tab.
    pub fn open_create_form(&mut self) {
        let form = match self.current_tab {
            Tab::Home => return,
            Tab::Admins => {
                self.status
                    .notify("New admins cannot be created from the console", NotifyLevel::Error);
                return;
            }
            Tab::Customers => EntityForm::new_customer(),
            Tab::Drivers => EntityForm::new_driver(),
            Tab::Products => EntityForm::new_product(),
        };
        self.show_form(form);
    }

    /// Fetch the selected record and open it for editing.
    pub fn open_edit_form(&mut self) {
        let (Some(kind), Some(id)) = (self.current_tab.kind(), self.selected_id()) else {
            return;
        };

        let api = self.authed_api();
        let tx = self.fetch_tx.clone();
        debug!(kind = kind.label(), id = %id, "Loading record for edit");
        tokio::spawn(async move {
            let result = match kind {
                EntityKind::Admins => api.get_admin(&id).await.map(|a| EntityForm::edit_admin(&a)),
                EntityKind::Customers => api
                    .get_customer(&id)
                    .await
                    .map(|c| EntityForm::edit_customer(&c)),
                EntityKind::Drivers => api
                    .get_driver(&id)
                    .await
                    .map(|d| EntityForm::edit_driver(&d)),
                EntityKind::Products => api
                    .get_product(&id)
                    .await
                    .map(|p| EntityForm::edit_product(&p)),
            };
            Self::send_fetch_result(&tx, kind, result, |form| {
                FetchResult::EditLoaded(Box::new(form))
            })
            .await;
        });
    }

    fn show_form(&mut self, form: EntityForm) {
        if self.route() != Route::Private || self.state != AppState::Normal {
            return;
        }
        self.form = Some(form);
        self.state = AppState::EditingForm;
    }

    /// Validate the open form and send it.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        if form.submitting {
            return;
        }
        let submission = match form.submission() {
            Ok(submission) => submission,
            Err(e) => {
                form.error = Some(e.to_string());
                return;
            }
        };
        form.error = None;
        form.submitting = true;

        let kind = form.kind;
        let api = self.authed_api();
        let tx = self.fetch_tx.clone();
        info!(kind = kind.label(), create = submission.is_create(), "Saving");
        tokio::spawn(async move {
            let created = submission.is_create();
            let result = match submission.send(&api).await {
                Ok(name) => FetchResult::Saved {
                    kind,
                    name,
                    created,
                },
                Err(e) => {
                    error!(kind = kind.label(), error = %e, "Save failed");
                    FetchResult::SaveFailed(kind, e)
                }
            };
            Self::send_result(&tx, result).await;
        });
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        if self.state == AppState::EditingForm {
            self.state = AppState::Normal;
        }
    }

    /// Flip the active/available flag of the selected row.
    pub fn toggle_selected(&mut self) {
        let api = self.authed_api();
        let tx = self.fetch_tx.clone();

        match self.current_tab {
            Tab::Home | Tab::Customers => {}
            Tab::Admins => {
                let Some(admin) = self.admins.selected() else {
                    return;
                };
                let kind = EntityKind::Admins;
                let id = admin.id.clone();
                let name = admin.full_name.clone();
                let payload = UpdateAdminPayload {
                    is_active: Some(!admin.is_active),
                    ..Default::default()
                };
                tokio::spawn(async move {
                    let result = api.update_admin(&id, &payload).await.map(|_| name);
                    Self::send_fetch_result(&tx, kind, result, |name| FetchResult::Saved {
                        kind,
                        name,
                        created: false,
                    })
                    .await;
                });
            }
            Tab::Drivers => {
                let Some(driver) = self.drivers.selected() else {
                    return;
                };
                let kind = EntityKind::Drivers;
                let mut payload = driver.to_update();
                payload.is_available = !payload.is_available;
                let name = driver.full_name.clone();
                tokio::spawn(async move {
                    let result = api
                        .update_driver(&payload.id, &payload)
                        .await
                        .map(|_| name);
                    Self::send_fetch_result(&tx, kind, result, |name| FetchResult::Saved {
                        kind,
                        name,
                        created: false,
                    })
                    .await;
                });
            }
            Tab::Products => {
                let Some(product) = self.products.selected() else {
                    return;
                };
                let kind = EntityKind::Products;
                let mut payload = product.to_update();
                payload.is_active = !payload.is_active;
                let name = product.name.clone();
                tokio::spawn(async move {
                    let result = api
                        .update_product(&payload.id, &payload)
                        .await
                        .map(|_| name);
                    Self::send_fetch_result(&tx, kind, result, |name| FetchResult::Saved {
                        kind,
                        name,
                        created: false,
                    })
                    .await;
                });
            }
        }
    }

    /// Apply one result from a background request.
    fn process_fetch_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::Admins(page) => self.admins.apply(page),
            FetchResult::Customers(page) => self.customers.apply(page),
            FetchResult::Drivers(page) => self.drivers.apply(page),
            FetchResult::Products(page) => self.products.apply(page),
            FetchResult::Deleted(kind, outcomes) => {
                let failed: Vec<&DeleteOutcome> =
                    outcomes.iter().filter(|o| o.result.is_err()).collect();
                let unauthorized = failed.iter().any(|o| match &o.result {
                    Err(e) => ApiError::is_unauthorized(e),
                    Ok(()) => false,
                });
                if unauthorized {
                    self.session_rejected();
                    return;
                }

                let deleted = outcomes.len() - failed.len();
                if failed.is_empty() {
                    self.status.notify(
                        &format!("Deleted {} {}(s)", deleted, kind.label()),
                        NotifyLevel::Success,
                    );
                } else {
                    self.status.notify(
                        &format!(
                            "Deleted {} {}(s), {} failed",
                            deleted,
                            kind.label(),
                            failed.len()
                        ),
                        NotifyLevel::Error,
                    );
                }
                self.refresh_kind(kind);
            }
            FetchResult::EditLoaded(form) => self.show_form(*form),
            FetchResult::Saved {
                kind,
                name,
                created,
            } => {
                // Only the form that sent this request closes
                if self.form.as_ref().is_some_and(|f| f.submitting && f.kind == kind) {
                    self.cancel_form();
                }
                let verb = if created { "Created" } else { "Updated" };
                self.status
                    .notify(&format!("{} {}", verb, name), NotifyLevel::Success);
                self.refresh_kind(kind);
            }
            FetchResult::SaveFailed(kind, e) => {
                if ApiError::is_unauthorized(&e) {
                    self.session_rejected();
                    return;
                }
                let message = format!("Failed to save {}: {}", kind.label(), e);
                match self.form.as_mut().filter(|f| f.submitting && f.kind == kind) {
                    Some(form) => {
                        form.submitting = false;
                        form.error = Some(e.to_string());
                    }
                    None => self.status.notify(&message, NotifyLevel::Error),
                }
                warn!(kind = kind.label(), "{}", message);
            }
            FetchResult::Error(kind, e) => {
                self.set_loading(kind, false);
                if ApiError::is_unauthorized(&e) {
                    self.session_rejected();
                } else {
                    self.status.notify(
                        &format!("Failed to load {}s: {}", kind.label(), e),
                        NotifyLevel::Error,
                    );
                }
            }
        }
    }

    /// The backend no longer accepts our token.
    fn session_rejected(&mut self) {
        warn!("Backend rejected the session token");
        self.session.logout();
        self.status
            .notify("Session expired. Please sign in again.", NotifyLevel::Error);
    }

    fn set_loading(&mut self, kind: EntityKind, loading: bool) {
        match kind {
            EntityKind::Admins => self.admins.loading = loading,
            EntityKind::Customers => self.customers.loading = loading,
            EntityKind::Drivers => self.drivers.loading = loading,
            EntityKind::Products => self.products.loading = loading,
        }
    }

    fn refresh_kind(&mut self, kind: EntityKind) {
        if self.current_tab.kind() == Some(kind) {
            self.refresh_current_tab();
        } else {
            // Reload when next shown
            match kind {
                EntityKind::Admins => self.admins.loaded = false,
                EntityKind::Customers => self.customers.loaded = false,
                EntityKind::Drivers => self.drivers.loaded = false,
                EntityKind::Products => self.products.loaded = false,
            }
        }
    }
}

/// Where the session is persisted: a file under `data_dir`, or memory only.
fn session_store(ephemeral: bool, data_dir: &std::path::Path) -> Arc<dyn SessionStore> {
    if ephemeral {
        debug!("Ephemeral session, nothing is written to disk");
        Arc::new(MemorySessionStore::new())
    } else {
        Arc::new(FileSessionStore::new(data_dir))
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

pub fn can_add_search_char(current_len: usize, c: char) -> bool {
    current_len < MAX_SEARCH_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            is_active: true,
            product_picture_url: None,
        }
    }

    fn page(ids: &[&str], page_number: u32, total_records: u64) -> ListResponse<Product> {
        ListResponse {
            data: ids.iter().map(|id| product(id, id)).collect(),
            page_number,
            page_size: 10,
            total_records,
        }
    }

    // -------------------------------------------------------------------------
    // Tab Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tab_next() {
        assert_eq!(Tab::Home.next(), Tab::Admins);
        assert_eq!(Tab::Admins.next(), Tab::Customers);
        assert_eq!(Tab::Customers.next(), Tab::Drivers);
        assert_eq!(Tab::Drivers.next(), Tab::Products);
        assert_eq!(Tab::Products.next(), Tab::Home); // Wraps around
    }

    #[test]
    fn test_tab_prev() {
        assert_eq!(Tab::Home.prev(), Tab::Products); // Wraps around
        assert_eq!(Tab::Products.prev(), Tab::Drivers);
        assert_eq!(Tab::Drivers.prev(), Tab::Customers);
        assert_eq!(Tab::Customers.prev(), Tab::Admins);
        assert_eq!(Tab::Admins.prev(), Tab::Home);
    }

    #[test]
    fn test_tab_paths_resolve_back() {
        for tab in Tab::ALL {
            assert_eq!(Tab::from_page(Page::from_path(tab.page().path())), Some(tab));
        }
        assert_eq!(Tab::from_page(Page::from_path("/relatorios")), None);
        assert_eq!(Tab::Home.kind(), None);
        assert_eq!(Tab::Drivers.kind(), Some(EntityKind::Drivers));
    }

    // -------------------------------------------------------------------------
    // Navigation / notification seams
    // -------------------------------------------------------------------------

    #[test]
    fn test_pending_navigation_keeps_latest() {
        let nav = PendingNavigation::default();
        assert_eq!(nav.take(), None);
        nav.navigate_to("/admin");
        nav.navigate_to("/");
        assert_eq!(nav.take().as_deref(), Some("/"));
        assert_eq!(nav.take(), None);
    }

    #[test]
    fn test_status_line_latest_message() {
        let status = StatusLine::default();
        status.notify("Saved", NotifyLevel::Success);
        status.notify("Boom", NotifyLevel::Error);
        assert_eq!(
            status.current(),
            Some(("Boom".to_string(), NotifyLevel::Error))
        );
        status.clear();
        assert_eq!(status.current(), None);
    }

    // -------------------------------------------------------------------------
    // EntityList Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_selection_clamped_on_apply() {
        let mut list = EntityList::new(10);
        list.apply(page(&["a", "b", "c"], 1, 3));
        list.select_next(PAGE_SCROLL_SIZE);
        assert_eq!(list.selection, 2);

        list.apply(page(&["a"], 1, 1));
        assert_eq!(list.selection, 0);
        assert_eq!(list.selected().map(|p| p.id.as_str()), Some("a"));
    }

    #[test]
    fn test_marks_drive_delete_targets() {
        let mut list = EntityList::new(10);
        list.apply(page(&["a", "b", "c"], 1, 3));

        // Nothing marked: the selected row
        assert_eq!(list.delete_targets(), vec!["a".to_string()]);

        list.toggle_mark();
        list.select_next(2);
        list.toggle_mark();
        assert_eq!(list.delete_targets(), vec!["a".to_string(), "c".to_string()]);

        // Unmark
        list.toggle_mark();
        assert_eq!(list.delete_targets(), vec!["a".to_string()]);
        assert!(list.is_marked("a"));
    }

    #[test]
    fn test_marks_dropped_for_missing_rows() {
        let mut list = EntityList::new(10);
        list.apply(page(&["a", "b"], 1, 2));
        list.toggle_mark();
        list.apply(page(&["b"], 1, 1));
        assert!(list.marked.is_empty());
    }

    #[test]
    fn test_paging_moves_request() {
        let mut list: EntityList<Product> = EntityList::new(10);
        list.apply(page(&["a"], 1, 25));

        assert!(!list.prev_page());
        assert!(list.next_page());
        assert_eq!(list.request.page_number, 2);

        list.apply(page(&["z"], 3, 25));
        assert!(!list.next_page());
        assert!(list.prev_page());
        assert_eq!(list.request.page_number, 2);
    }

    #[test]
    fn test_search_resets_page() {
        let mut list: EntityList<Product> = EntityList::new(10);
        list.apply(page(&["a"], 1, 25));
        list.next_page();
        list.set_search("  caçamba ");
        assert_eq!(list.request.page_number, 1);
        assert_eq!(list.request.search, "caçamba");
    }

    #[test]
    fn test_ephemeral_session_store_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = dumpdesk_core::auth::PersistedSession {
            token: Some("a.b.c".to_string()),
            username: Some("alice".to_string()),
            role: Some("Admin".to_string()),
        };

        let memory = session_store(true, dir.path());
        memory.save(&session).expect("save");
        assert_eq!(memory.load().expect("load"), session);
        assert_eq!(std::fs::read_dir(dir.path()).expect("read dir").count(), 0);

        let file = session_store(false, dir.path());
        file.save(&session).expect("save");
        assert_eq!(std::fs::read_dir(dir.path()).expect("read dir").count(), 1);
        assert_eq!(file.load().expect("load"), session);
    }

    #[test]
    fn test_record_matches_ignores_case() {
        let p = product("1", "Caçamba 5m³");
        assert!(p.matches(""));
        assert!(p.matches("CAÇAMBA"));
        assert!(!p.matches("entulho"));
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_username_char() {
        // Valid chars within length
        assert!(can_add_username_char(0, 'a'));
        assert!(can_add_username_char(49, 'z'));
        // Exceeds max length
        assert!(!can_add_username_char(50, 'a'));
        assert!(!can_add_username_char(100, 'a'));
        // Control characters rejected
        assert!(!can_add_username_char(0, '\x00'));
        assert!(!can_add_username_char(0, '\n'));
        assert!(!can_add_username_char(0, '\t'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\x00'));
        assert!(!can_add_password_char(0, '\r'));
    }

    #[test]
    fn test_can_add_search_char() {
        assert!(can_add_search_char(0, 'ç'));
        assert!(!can_add_search_char(64, 'a'));
        assert!(!can_add_search_char(0, '\x1b'));
    }
}
