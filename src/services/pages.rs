//! Routes and auth-gated page loading
//!
//! Every gated page runs the same sequence: verify the session, fetch the
//! current user, check the role, and only then fetch page data. Failures in
//! the first three steps redirect; data failures are shown inline.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::{
    api::{auth::AuthApi, Api},
    error::{AppError, AppResult, UiAction},
    models::{Item, ItemStatus, Role, User},
};

use super::{
    overlay::{ConfirmDialog, PageScroll, ScrollLock},
    toast::Toaster,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    LostItems,
    Login,
    Signup,
    ForgotPassword,
    Profile,
    StaffDashboard,
    StaffDeleteItem(i64),
    StaffClaims,
    StaffArchived,
    StaffAnalytics,
    StaffActivityLog,
    StudentDashboard,
    MyClaims,
}

/// Who may open a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    SignedIn,
    Only(Role),
}

impl Route {
    pub fn path(&self) -> String {
        let path = match self {
            Route::Home => "/",
            Route::LostItems => "/lost-items",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::ForgotPassword => "/forgot-password",
            Route::Profile => "/profile",
            Route::StaffDashboard => "/staff/dashboard",
            Route::StaffDeleteItem(item_id) => return format!("/staff/items/{}/delete", item_id),
            Route::StaffClaims => "/staff/claims",
            Route::StaffArchived => "/staff/archived",
            Route::StaffAnalytics => "/staff/analytics",
            Route::StaffActivityLog => "/staff/activity-log",
            Route::StudentDashboard => "/student/dashboard",
            Route::MyClaims => "/my-claims",
        };
        path.to_string()
    }

    /// Match a request path (query string and trailing slash ignored)
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split('?').next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let route = match trimmed {
            "" => Route::Home,
            "/lost-items" => Route::LostItems,
            "/login" => Route::Login,
            "/signup" => Route::Signup,
            "/forgot-password" => Route::ForgotPassword,
            "/profile" => Route::Profile,
            "/staff/dashboard" => Route::StaffDashboard,
            "/staff/claims" => Route::StaffClaims,
            "/staff/archived" => Route::StaffArchived,
            "/staff/analytics" => Route::StaffAnalytics,
            "/staff/activity-log" => Route::StaffActivityLog,
            "/student/dashboard" => Route::StudentDashboard,
            "/my-claims" => Route::MyClaims,
            other => {
                let item_id = other
                    .strip_prefix("/staff/items/")?
                    .strip_suffix("/delete")?
                    .parse()
                    .ok()?;
                Route::StaffDeleteItem(item_id)
            }
        };
        Some(route)
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Home
            | Route::LostItems
            | Route::Login
            | Route::Signup
            | Route::ForgotPassword => Access::Public,
            Route::Profile => Access::SignedIn,
            Route::StaffDashboard
            | Route::StaffDeleteItem(_)
            | Route::StaffClaims
            | Route::StaffArchived
            | Route::StaffAnalytics
            | Route::StaffActivityLog => Access::Only(Role::Staff),
            Route::StudentDashboard | Route::MyClaims => Access::Only(Role::Student),
        }
    }

    /// Landing page after login
    pub fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Staff => Route::StaffDashboard,
            Role::Student => Route::StudentDashboard,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Result of the session and role checks
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    Granted(Option<User>),
    Redirect(Route),
}

/// Session check, then user lookup, then role check, strictly in that order
pub async fn authorize(auth: &AuthApi, access: Access) -> Gate {
    if access == Access::Public {
        return Gate::Granted(None);
    }

    match auth.verify_session().await {
        Ok(status) if status.valid => {}
        Ok(_) => return Gate::Redirect(Route::Login),
        Err(e) => {
            tracing::warn!("Session check failed: {}", e);
            return Gate::Redirect(Route::Login);
        }
    }

    let user = match auth.me().await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Fetching current user failed: {}", e);
            return Gate::Redirect(Route::Login);
        }
    };

    if let Access::Only(required) = access {
        if user.role != required {
            tracing::info!(
                "{} user sent to own dashboard (page needs {})",
                user.role,
                required
            );
            return Gate::Redirect(Route::dashboard_for(user.role));
        }
    }

    Gate::Granted(Some(user))
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageLoad<T> {
    Ready { user: Option<User>, data: T },
    Redirect(Route),
    /// Authorized, but the page data failed to load
    Failed { user: Option<User>, message: String },
}

impl<T> PageLoad<T> {
    pub fn redirect(&self) -> Option<Route> {
        match self {
            PageLoad::Redirect(route) => Some(*route),
            _ => None,
        }
    }
}

/// Gate `route`, then run `fetch` for its data
pub async fn load_page<T, F, Fut>(auth: &AuthApi, route: Route, fallback: &str, fetch: F) -> PageLoad<T>
where
    F: FnOnce(Option<User>) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let user = match authorize(auth, route.access()).await {
        Gate::Granted(user) => user,
        Gate::Redirect(to) => {
            tracing::debug!("{} redirected to {}", route, to);
            return PageLoad::Redirect(to);
        }
    };

    match fetch(user.clone()).await {
        Ok(data) => PageLoad::Ready { user, data },
        Err(e) => {
            tracing::error!("Loading {} failed: {}", route, e);
            match e.ui_action(fallback) {
                UiAction::RedirectToLogin => PageLoad::Redirect(Route::Login),
                UiAction::AccessDenied(message) | UiAction::Inline(message) => {
                    PageLoad::Failed { user, message }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Item deletion page
// ---------------------------------------------------------------------------

pub const ITEM_LOAD_FAILED: &str = "Unable to load item details.";
pub const DELETE_FAILED: &str = "Failed to delete item.";
pub const DELETE_SUCCEEDED: &str = "Item deleted successfully";

/// Staff soft-delete of one item behind a confirmation dialog
pub struct DeleteItemFlow {
    item_id: i64,
    item: Option<Item>,
    error: Option<String>,
    deleting: bool,
    dialog: Option<ConfirmDialog>,
    scroll: Option<ScrollLock>,
}

impl DeleteItemFlow {
    /// `prefetched` is the item the dashboard already had, if any
    pub fn new(item_id: i64, prefetched: Option<Item>) -> Self {
        Self {
            item_id,
            item: prefetched,
            error: None,
            deleting: false,
            dialog: None,
            scroll: None,
        }
    }

    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn dialog(&self) -> Option<&ConfirmDialog> {
        self.dialog.as_ref()
    }

    pub fn already_deleted(&self) -> bool {
        self.item
            .as_ref()
            .is_some_and(|item| item.status == ItemStatus::Deleted)
    }

    /// Gate the page and load the item; returns a redirect when one is due
    pub async fn load(&mut self, api: &Api) -> Option<Route> {
        self.error = None;
        let items = &api.items;
        let item_id = self.item_id;
        let page = load_page(
            &api.auth,
            Route::StaffDeleteItem(item_id),
            ITEM_LOAD_FAILED,
            |_| async move { items.get(item_id).await },
        )
        .await;

        match page {
            PageLoad::Ready { data, .. } => {
                self.item = Some(data);
                None
            }
            PageLoad::Failed { message, .. } => {
                self.error = Some(message);
                None
            }
            PageLoad::Redirect(route) => Some(route),
        }
    }

    /// Open the confirmation; refused while deleting or when nothing is left to delete
    pub fn request_delete(&mut self, scroll: &PageScroll, debounce: Duration) -> bool {
        let Some(item) = self.item.as_ref() else {
            return false;
        };
        if self.deleting || self.already_deleted() || self.dialog.is_some() {
            return false;
        }
        self.dialog = Some(ConfirmDialog::delete(&item.title(), debounce));
        self.scroll = Some(scroll.lock());
        true
    }

    fn close_dialog(&mut self) {
        self.dialog = None;
        self.scroll = None;
    }

    pub fn cancel(&mut self) -> bool {
        let closed = self
            .dialog
            .as_mut()
            .is_some_and(|dialog| dialog.cancel(self.deleting));
        if closed {
            self.close_dialog();
        }
        closed
    }

    pub fn click_overlay(&mut self) -> bool {
        let closed = self
            .dialog
            .as_mut()
            .is_some_and(|dialog| dialog.click_overlay(self.deleting));
        if closed {
            self.close_dialog();
        }
        closed
    }

    /// Delete the item; on success the caller navigates to the returned route
    pub async fn confirm(&mut self, api: &Api, toaster: &Toaster) -> AppResult<Route> {
        let accepted = self
            .dialog
            .as_mut()
            .is_some_and(|dialog| dialog.confirm(self.deleting));
        if !accepted {
            return Err(AppError::BusinessRule(
                "No deletion is awaiting confirmation".to_string(),
            ));
        }
        self.close_dialog();

        self.deleting = true;
        self.error = None;
        let result = api.items.delete(self.item_id).await;
        self.deleting = false;

        match result {
            Ok(item_id) => {
                tracing::info!("Item {} deleted", item_id);
                if let Some(item) = self.item.as_mut() {
                    item.status = ItemStatus::Deleted;
                }
                toaster.success(DELETE_SUCCEEDED);
                Ok(Route::StaffDashboard)
            }
            Err(e) => {
                let message = e.user_message(DELETE_FAILED);
                toaster.error(message.clone());
                self.error = Some(message);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::{ApiClient, ApiRequest, ApiResponse, MockTransport};
    use crate::config::SessionConfig;
    use crate::services::session::SessionCache;
    use reqwest::Method;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn api(transport: MockTransport) -> Api {
        Api::new(
            ApiClient::new(Arc::new(transport)),
            Arc::new(SessionCache::new(&SessionConfig::default())),
        )
    }

    /// Transport answering the session and user lookups, recording every path
    fn signed_in(role: &'static str, log: Arc<Mutex<Vec<String>>>) -> MockTransport {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.path == "/auth/verify-session")
            .returning({
                let log = Arc::clone(&log);
                move |req: ApiRequest| {
                    log.lock().unwrap().push(req.path);
                    Ok(ApiResponse::json(200, json!({"valid": true})))
                }
            });
        transport
            .expect_send()
            .withf(|req| req.path == "/auth/me")
            .returning({
                let log = Arc::clone(&log);
                move |req: ApiRequest| {
                    log.lock().unwrap().push(req.path);
                    Ok(ApiResponse::json(
                        200,
                        json!({"user_id": 1, "name": "Sam Lee", "email": "slee@uwaterloo.ca", "role": role}),
                    ))
                }
            });
        transport
    }

    #[test]
    fn routes_round_trip_through_paths() {
        let routes = [
            Route::Home,
            Route::LostItems,
            Route::Login,
            Route::Signup,
            Route::ForgotPassword,
            Route::Profile,
            Route::StaffDashboard,
            Route::StaffDeleteItem(42),
            Route::StaffClaims,
            Route::StaffArchived,
            Route::StaffAnalytics,
            Route::StaffActivityLog,
            Route::StudentDashboard,
            Route::MyClaims,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
        assert_eq!(Route::parse("/staff/items/abc/delete"), None);
        assert_eq!(Route::parse("/my-claims/?tab=all"), Some(Route::MyClaims));
        assert_eq!(Route::dashboard_for(Role::Staff).path(), "/staff/dashboard");
    }

    #[tokio::test]
    async fn invalid_session_redirects_before_any_other_call() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.path == "/auth/verify-session")
            .times(1)
            .returning(|_| Ok(ApiResponse::json(200, json!({"valid": false}))));
        let api = api(transport);
        let mut fetched = false;

        let page: PageLoad<()> = load_page(&api.auth, Route::StaffClaims, "x", |_| {
            fetched = true;
            async { Ok(()) }
        })
        .await;
        assert_eq!(page.redirect(), Some(Route::Login));
        assert!(!fetched);
    }

    #[tokio::test]
    async fn wrong_role_goes_to_own_dashboard() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let api = api(signed_in("student", Arc::clone(&log)));

        let page: PageLoad<()> =
            load_page(&api.auth, Route::StaffAnalytics, "x", |_| async { Ok(()) }).await;
        assert_eq!(page.redirect(), Some(Route::StudentDashboard));
        assert_eq!(*log.lock().unwrap(), vec!["/auth/verify-session", "/auth/me"]);
    }

    #[tokio::test]
    async fn data_failure_after_authorization_is_inline() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let api = api(signed_in("staff", log));

        let page: PageLoad<()> = load_page(&api.auth, Route::StaffArchived, "Failed", |user| async move {
            assert_eq!(user.map(|u| u.role), Some(Role::Staff));
            Err(AppError::Server {
                status: 500,
                message: String::new(),
            })
        })
        .await;
        assert!(matches!(page, PageLoad::Failed { ref message, .. } if message == "Failed"));
    }

    #[tokio::test]
    async fn public_routes_skip_the_session_check() {
        let api = api(MockTransport::new());
        assert_eq!(authorize(&api.auth, Access::Public).await, Gate::Granted(None));
    }

    #[tokio::test(start_paused = true)]
    async fn delete_flow_confirms_then_deletes() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut transport = signed_in("staff", log);
        transport
            .expect_send()
            .withf(|req| req.path == "/api/items/7" && req.method == Method::GET)
            .returning(|_| {
                Ok(ApiResponse::json(
                    200,
                    json!({"item": {"item_id": 7, "name": "Blue scarf", "category": "clothing", "status": "unclaimed"}}),
                ))
            });
        transport
            .expect_send()
            .withf(|req| req.path == "/api/items/7" && req.method == Method::DELETE)
            .times(1)
            .returning(|_| Ok(ApiResponse::json(200, json!({"message": "Item deleted", "item_id": 7}))));
        let api = api(transport);
        let toaster = Toaster::new();
        let scroll = PageScroll::new();

        let mut flow = DeleteItemFlow::new(7, None);
        assert_eq!(flow.load(&api).await, None);
        assert_eq!(flow.item().map(Item::title).as_deref(), Some("Blue scarf"));

        assert!(flow.request_delete(&scroll, Duration::from_millis(200)));
        assert!(!flow.request_delete(&scroll, Duration::from_millis(200)));
        assert!(scroll.is_locked());
        assert!(!flow.click_overlay());

        let route = flow.confirm(&api, &toaster).await.unwrap();
        assert_eq!(route, Route::StaffDashboard);
        assert!(flow.already_deleted());
        assert!(!scroll.is_locked());
        assert_eq!(toaster.active()[0].message, DELETE_SUCCEEDED);
        assert!(!flow.request_delete(&scroll, Duration::from_millis(200)));
    }

    #[tokio::test(start_paused = true)]
    async fn overlay_click_dismisses_after_debounce() {
        let item: Item = serde_json::from_value(json!({"item_id": 3, "category": "keys"})).unwrap();
        let scroll = PageScroll::new();
        let mut flow = DeleteItemFlow::new(3, Some(item));

        flow.request_delete(&scroll, Duration::from_millis(200));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(flow.click_overlay());
        assert!(flow.dialog().is_none());
        assert!(!scroll.is_locked());
    }
}
