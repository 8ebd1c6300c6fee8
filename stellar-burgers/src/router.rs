//! Route table and overlay resolution
//!
//! Two route tables are evaluated against every location. The primary table
//! matches the background path when one was captured (so the underlying page
//! keeps rendering), the overlay table matches the addressed path and, on a
//! match, the content renders inside a modal above the page. A location
//! without a background renders its route as a full page.

use stellar_core::{History, Location};

/// Addressable routes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Feed,
    FeedOrder(u64),
    Ingredient(String),
    Login,
    Register,
    ForgotPassword,
    ResetPassword,
    Profile,
    ProfileOrders,
    ProfileOrder(u64),
    NotFound,
}

/// Access class for the auth guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    RequiresAuth,
    RequiresNoAuth,
    Neutral,
}

impl Route {
    /// Parse a path into a route. Unknown paths resolve to `NotFound`.
    pub fn parse(path: &str) -> Route {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["feed"] => Route::Feed,
            ["feed", number] => match number.parse() {
                Ok(number) => Route::FeedOrder(number),
                Err(_) => Route::NotFound,
            },
            ["ingredients", id] => Route::Ingredient((*id).to_string()),
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["forgot-password"] => Route::ForgotPassword,
            ["reset-password"] => Route::ResetPassword,
            ["profile"] => Route::Profile,
            ["profile", "orders"] => Route::ProfileOrders,
            ["profile", "orders", number] => match number.parse() {
                Ok(number) => Route::ProfileOrder(number),
                Err(_) => Route::NotFound,
            },
            _ => Route::NotFound,
        }
    }

    /// Routes that render as a modal when reached from an in-app link.
    pub fn is_overlay(&self) -> bool {
        matches!(
            self,
            Route::FeedOrder(_) | Route::Ingredient(_) | Route::ProfileOrder(_)
        )
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Login | Route::Register | Route::ForgotPassword | Route::ResetPassword => {
                Access::RequiresNoAuth
            }
            Route::Profile | Route::ProfileOrders | Route::ProfileOrder(_) => Access::RequiresAuth,
            _ => Access::Neutral,
        }
    }

    /// Modal title: an explicit title wins, order-detail routes synthesize
    /// `#<number>` from the trailing path segment, everything else is empty.
    pub fn modal_title(&self) -> String {
        match self {
            Route::Ingredient(_) => "Ingredient details".to_string(),
            Route::FeedOrder(number) | Route::ProfileOrder(number) => format!("#{}", number),
            _ => String::new(),
        }
    }
}

/// What the current location renders: a page, possibly with an overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedView {
    pub page: Route,
    pub overlay: Option<Route>,
}

/// Evaluate both route tables against a location.
pub fn resolve(location: &Location) -> ResolvedView {
    if location.has_background() {
        let overlay = Route::parse(&location.path);
        if overlay.is_overlay() {
            return ResolvedView {
                page: Route::parse(location.page_path()),
                overlay: Some(overlay),
            };
        }
    }
    ResolvedView {
        page: Route::parse(&location.path),
        overlay: None,
    }
}

/// Navigation events.
#[derive(Clone, Debug, PartialEq)]
pub enum NavAction {
    /// In-app navigation. Overlay routes capture the current page as
    /// background; everything else navigates plainly.
    Push(String),
    /// Swap the current entry (guard redirects).
    Replace(String),
    /// One step back; dismissing an overlay always goes through here.
    Back,
}

impl NavAction {
    pub fn name(&self) -> &'static str {
        match self {
            NavAction::Push(_) => "NavPush",
            NavAction::Replace(_) => "NavReplace",
            NavAction::Back => "NavBack",
        }
    }
}

/// Apply a navigation event to the history. Returns whether it moved.
pub fn navigate(history: &mut History, action: NavAction) -> bool {
    match action {
        NavAction::Push(path) => {
            if history.current().path == path {
                return false;
            }
            let location = if Route::parse(&path).is_overlay() {
                // Capture the page currently on screen as the background
                Location::over(path, history.current().page_path().to_string())
            } else {
                Location::new(path)
            };
            history.push(location);
            true
        }
        NavAction::Replace(path) => {
            history.replace(Location::new(path));
            true
        }
        NavAction::Back => history.back(),
    }
}
