//! Access gate for protected views.
//!
//! A pure decision consulted before rendering any view: protected views are
//! admitted only when a session user is present, otherwise the caller is
//! redirected to the login entry point. Re-evaluated on every dispatch, so
//! a logout revokes access on the next evaluation.

use crate::session::SessionStore;

/// Client-side routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Public landing.
    Home,
    /// Login entry point.
    Login,
    /// Aggregated posts (protected).
    Posts,
}

impl Route {
    /// Returns whether the route requires an authenticated session.
    pub fn is_protected(self) -> bool {
        matches!(self, Route::Posts)
    }

    /// Path of the route, as the original web client spells it.
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Posts => "/posts",
        }
    }
}

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The view may render.
    Render(Route),
    /// Navigation must be redirected to the given route.
    Redirect(Route),
}

/// Decides whether `route` may render given the current session state.
pub fn evaluate(route: Route, session: &SessionStore) -> Decision {
    if route.is_protected() && !session.is_authenticated() {
        Decision::Redirect(Route::Login)
    } else {
        Decision::Render(route)
    }
}
