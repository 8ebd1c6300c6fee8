//! Effects - side effects declared by the reducer
//!
//! Effects are returned from the reducer and handled by the main loop's
//! effect handler, which spawns the corresponding API task. This keeps every
//! reducer pure while making remote calls explicit and inspectable.

use crate::api::ProfileUpdate;

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Load the item catalogue
    FetchCatalogue,
    /// Load the public order feed
    FetchFeed,
    /// Load the authenticated user's order history
    FetchUserOrders,
    /// Submit the composed order
    SubmitOrder { item_ids: Vec<String> },
    /// One-time session probe (refreshes a stale token first if needed)
    ProbeSession,
    Login {
        email: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
    },
    UpdateProfile { update: ProfileUpdate },
    /// Revoke the session server-side and clear the stored tokens
    Logout,
    RequestPasswordReset { email: String },
    ConfirmPasswordReset { password: String, token: String },
}
