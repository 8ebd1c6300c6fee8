//! User slice: the authenticated profile and the auth-check flags
//!
//! Two independent booleans matter here. `loading` is the request-in-flight
//! flag shared by all five auth operations. `auth_checked` records that the
//! one-time session probe finished, regardless of outcome - a failed probe
//! still completes the check. The guard needs both flags to tell "still
//! checking" apart from "checked and unauthenticated".

use stellar_core::DispatchResult;

use crate::api::{Profile, ProfileUpdate};
use crate::effect::Effect;

use super::normalized;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserState {
    /// Empty fields mean unauthenticated.
    pub user: Profile,
    /// Has the one-time session check finished, whatever its outcome.
    pub auth_checked: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl UserState {
    /// Authenticated requires a completed check and a non-empty profile.
    pub fn is_authenticated(&self) -> bool {
        self.auth_checked && !self.user.email.is_empty()
    }

    pub fn user_name(&self) -> &str {
        &self.user.name
    }
}

/// Which half of the password-reset flow completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasswordResetStage {
    Requested,
    Confirmed,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UserAction {
    /// One-time session probe against the stored token.
    Probe,
    /// No stored token: the check completes without a probe.
    AuthChecked,
    Login {
        email: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
    },
    UpdateProfile(ProfileUpdate),
    Logout,
    RequestPasswordReset {
        email: String,
    },
    ConfirmPasswordReset {
        password: String,
        token: String,
    },
    /// Probe, login, register or profile update succeeded.
    DidAuthenticate(Profile),
    /// The probe failed; the check is still complete.
    DidProbeError(String),
    /// Login / register / update / logout / password reset failed.
    DidError(String),
    DidLogout,
    DidPasswordReset(PasswordResetStage),
}

impl UserAction {
    pub fn name(&self) -> &'static str {
        match self {
            UserAction::Probe => "UserProbe",
            UserAction::AuthChecked => "UserAuthChecked",
            UserAction::Login { .. } => "UserLogin",
            UserAction::Register { .. } => "UserRegister",
            UserAction::UpdateProfile(_) => "UserUpdateProfile",
            UserAction::Logout => "UserLogout",
            UserAction::RequestPasswordReset { .. } => "UserRequestPasswordReset",
            UserAction::ConfirmPasswordReset { .. } => "UserConfirmPasswordReset",
            UserAction::DidAuthenticate(_) => "UserDidAuthenticate",
            UserAction::DidProbeError(_) => "UserDidProbeError",
            UserAction::DidError(_) => "UserDidError",
            UserAction::DidLogout => "UserDidLogout",
            UserAction::DidPasswordReset(_) => "UserDidPasswordReset",
        }
    }
}

pub fn reduce(state: &mut UserState, action: UserAction) -> DispatchResult<Effect> {
    match action {
        UserAction::Probe => pending(state, Effect::ProbeSession),
        UserAction::AuthChecked => {
            if state.auth_checked {
                DispatchResult::unchanged()
            } else {
                state.auth_checked = true;
                DispatchResult::changed()
            }
        }
        UserAction::Login { email, password } => pending(state, Effect::Login { email, password }),
        UserAction::Register {
            name,
            email,
            password,
        } => pending(
            state,
            Effect::Register {
                name,
                email,
                password,
            },
        ),
        UserAction::UpdateProfile(update) => pending(state, Effect::UpdateProfile { update }),
        UserAction::Logout => pending(state, Effect::Logout),
        UserAction::RequestPasswordReset { email } => {
            pending(state, Effect::RequestPasswordReset { email })
        }
        UserAction::ConfirmPasswordReset { password, token } => {
            pending(state, Effect::ConfirmPasswordReset { password, token })
        }
        UserAction::DidAuthenticate(user) => {
            state.user = user;
            state.auth_checked = true;
            state.loading = false;
            state.error = None;
            DispatchResult::changed()
        }
        UserAction::DidProbeError(message) => {
            state.user = Profile::default();
            // A failed probe still completes the check
            state.auth_checked = true;
            state.loading = false;
            state.error = Some(normalized(message));
            DispatchResult::changed()
        }
        UserAction::DidError(message) => {
            state.user = Profile::default();
            state.loading = false;
            state.error = Some(normalized(message));
            DispatchResult::changed()
        }
        UserAction::DidLogout => {
            // Equivalent to revoking the session: back to the initial shape
            *state = UserState::default();
            DispatchResult::changed()
        }
        UserAction::DidPasswordReset(_) => {
            state.loading = false;
            state.error = None;
            DispatchResult::changed()
        }
    }
}

fn pending(state: &mut UserState, effect: Effect) -> DispatchResult<Effect> {
    state.loading = true;
    state.error = None;
    DispatchResult::changed_with(effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FALLBACK_ERROR;

    fn profile() -> Profile {
        Profile {
            email: "test@example.com".into(),
            name: "Test User".into(),
        }
    }

    #[test]
    fn pending_actions_set_loading_and_clear_error() {
        let intents = vec![
            UserAction::Probe,
            UserAction::Login {
                email: "test@example.com".into(),
                password: "password123".into(),
            },
            UserAction::Register {
                name: "Test User".into(),
                email: "test@example.com".into(),
                password: "password123".into(),
            },
            UserAction::UpdateProfile(ProfileUpdate {
                name: Some("Updated User".into()),
                ..Default::default()
            }),
            UserAction::Logout,
        ];

        for action in intents {
            let mut state = UserState {
                error: Some("previous error".into()),
                ..Default::default()
            };

            let result = reduce(&mut state, action);

            assert!(result.changed);
            assert_eq!(result.effects.len(), 1);
            assert!(state.loading);
            assert_eq!(state.error, None);
            assert!(!state.auth_checked);
            assert_eq!(state.user, Profile::default());
        }
    }

    #[test]
    fn authenticate_sets_user_and_completes_check() {
        let mut state = UserState {
            loading: true,
            error: Some("previous error".into()),
            ..Default::default()
        };

        let result = reduce(&mut state, UserAction::DidAuthenticate(profile()));

        assert!(result.changed);
        assert!(state.auth_checked);
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.user, profile());
        assert!(state.is_authenticated());
    }

    #[test]
    fn failed_ops_set_error_and_reset_user() {
        let mut state = UserState {
            loading: true,
            ..Default::default()
        };

        let result = reduce(&mut state, UserAction::DidError("auth failed".into()));

        assert!(result.changed);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("auth failed"));
        assert_eq!(state.user, Profile::default());
        assert!(!state.auth_checked);
    }

    #[test]
    fn failed_probe_still_completes_the_check() {
        let mut state = UserState {
            loading: true,
            ..Default::default()
        };

        reduce(&mut state, UserAction::DidProbeError("jwt expired".into()));

        assert!(!state.loading);
        assert!(state.auth_checked);
        assert!(!state.is_authenticated());
        assert_eq!(state.error.as_deref(), Some("jwt expired"));
    }

    #[test]
    fn missing_error_message_gets_fallback() {
        let mut state = UserState {
            loading: true,
            ..Default::default()
        };

        reduce(&mut state, UserAction::DidError(String::new()));

        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some(FALLBACK_ERROR));
    }

    #[test]
    fn logout_resets_the_whole_slice() {
        let mut state = UserState {
            user: profile(),
            auth_checked: true,
            loading: true,
            error: Some("some error".into()),
        };

        let result = reduce(&mut state, UserAction::DidLogout);

        assert!(result.changed);
        assert_eq!(state, UserState::default());
    }

    #[test]
    fn auth_checked_without_probe_is_idempotent() {
        let mut state = UserState::default();

        assert!(reduce(&mut state, UserAction::AuthChecked).changed);
        assert!(state.auth_checked);
        assert!(!state.is_authenticated());

        assert!(!reduce(&mut state, UserAction::AuthChecked).changed);
    }

    #[test]
    fn authenticated_requires_both_flags() {
        let checked_only = UserState {
            auth_checked: true,
            ..Default::default()
        };
        assert!(!checked_only.is_authenticated());

        // A profile without a completed check is still not authenticated
        let unchecked_user = UserState {
            user: profile(),
            ..Default::default()
        };
        assert!(!unchecked_user.is_authenticated());
    }

    #[test]
    fn password_reset_clears_loading() {
        let mut state = UserState::default();
        let result = reduce(
            &mut state,
            UserAction::RequestPasswordReset {
                email: "test@example.com".into(),
            },
        );
        assert!(state.loading);
        assert!(matches!(
            result.effects[0],
            Effect::RequestPasswordReset { .. }
        ));

        reduce(
            &mut state,
            UserAction::DidPasswordReset(PasswordResetStage::Requested),
        );
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }
}
