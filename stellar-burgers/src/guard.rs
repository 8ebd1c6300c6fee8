//! Auth guard: gates access to tagged routes
//!
//! Evaluated by the root reducer on every navigation and re-evaluated when
//! the user slice settles. The decision must consider both user-slice flags:
//! while a request is in flight no authorization decision is made (otherwise
//! a not-yet-resolved session probe would bounce every protected route to
//! login on startup), and `authenticated` itself requires a completed check
//! plus a non-empty profile.

use stellar_core::Location;

use crate::router::{Access, Route};
use crate::slices::user::UserState;

/// Outcome of evaluating a route against the auth state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the route's content.
    Allow,
    /// Auth state not settled yet: render a placeholder, decide nothing.
    Placeholder,
    /// Protected route, unauthenticated: go to login, remembering where the
    /// user was headed.
    RedirectToLogin { from: String },
    /// Login-only route, already authenticated: go back to the captured
    /// target, defaulting to home.
    RedirectToTarget { to: String },
}

/// Evaluate the guard for the route addressed by `location`.
pub fn check(route: &Route, user: &UserState, location: &Location) -> GuardDecision {
    let access = route.access();
    if access == Access::Neutral {
        return GuardDecision::Allow;
    }

    if user.loading {
        return GuardDecision::Placeholder;
    }

    let authenticated = user.is_authenticated();
    match access {
        Access::RequiresNoAuth if authenticated => GuardDecision::RedirectToTarget {
            to: location.from.clone().unwrap_or_else(|| "/".to_string()),
        },
        Access::RequiresAuth if !authenticated => GuardDecision::RedirectToLogin {
            from: location.path.clone(),
        },
        _ => GuardDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Profile;

    fn authenticated_user() -> UserState {
        UserState {
            user: Profile {
                email: "test@example.com".into(),
                name: "Test User".into(),
            },
            auth_checked: true,
            loading: false,
            error: None,
        }
    }

    fn anonymous_user() -> UserState {
        UserState {
            auth_checked: true,
            ..Default::default()
        }
    }

    fn loading_user() -> UserState {
        UserState {
            loading: true,
            ..Default::default()
        }
    }

    #[test]
    fn loading_always_renders_the_placeholder_on_tagged_routes() {
        let location = Location::new("/profile");
        assert_eq!(
            check(&Route::Profile, &loading_user(), &location),
            GuardDecision::Placeholder
        );
        assert_eq!(
            check(&Route::Login, &loading_user(), &Location::new("/login")),
            GuardDecision::Placeholder
        );
    }

    #[test]
    fn neutral_routes_never_consult_auth() {
        assert_eq!(
            check(&Route::Feed, &loading_user(), &Location::new("/feed")),
            GuardDecision::Allow
        );
        assert_eq!(
            check(&Route::Home, &anonymous_user(), &Location::new("/")),
            GuardDecision::Allow
        );
    }

    #[test]
    fn protected_route_redirects_anonymous_to_login_with_capture() {
        let location = Location::new("/profile/orders");
        assert_eq!(
            check(&Route::ProfileOrders, &anonymous_user(), &location),
            GuardDecision::RedirectToLogin {
                from: "/profile/orders".into()
            }
        );
    }

    #[test]
    fn unresolved_probe_does_not_redirect_to_login() {
        // auth_checked=false but loading=true: no decision yet
        let location = Location::new("/profile");
        assert_eq!(
            check(&Route::Profile, &loading_user(), &location),
            GuardDecision::Placeholder
        );
    }

    #[test]
    fn login_page_redirects_authenticated_to_captured_target() {
        let location = Location::new("/login").with_from("/profile/orders");
        assert_eq!(
            check(&Route::Login, &authenticated_user(), &location),
            GuardDecision::RedirectToTarget {
                to: "/profile/orders".into()
            }
        );
    }

    #[test]
    fn login_page_defaults_to_home_without_a_capture() {
        let location = Location::new("/login");
        assert_eq!(
            check(&Route::Login, &authenticated_user(), &location),
            GuardDecision::RedirectToTarget { to: "/".into() }
        );
    }

    #[test]
    fn settled_states_allow_matching_routes() {
        assert_eq!(
            check(
                &Route::Profile,
                &authenticated_user(),
                &Location::new("/profile")
            ),
            GuardDecision::Allow
        );
        assert_eq!(
            check(&Route::Login, &anonymous_user(), &Location::new("/login")),
            GuardDecision::Allow
        );
    }
}
