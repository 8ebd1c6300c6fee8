//! Stellar Burgers terminal client
//!
//! Wires the pieces together: terminal setup, the store and its runtime,
//! startup dispatches (catalogue fetch, the one-time session check, the
//! initial route), the tick and feed-refresh subscriptions, and the effect
//! handler that turns declared effects into keyed API tasks.
//!
//! # Usage
//!
//! ```sh
//! # Start on the builder
//! cargo run -p stellar-burgers
//!
//! # Open a route directly (no background, renders as a full page)
//! cargo run -p stellar-burgers -- --path /feed/12345
//! ```

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use stellar_core::{EffectContext, Location, LoggingMiddleware, Runtime, StoreWithMiddleware};
use tracing::warn;

use stellar_burgers::action::Action;
use stellar_burgers::api::{
    ApiClient, ApiError, FeedEntry, OrderConfirmation, Profile, ProfileUpdate, TokenPair,
    DEFAULT_API_BASE,
};
use stellar_burgers::components::AppView;
use stellar_burgers::effect::Effect;
use stellar_burgers::reducer;
use stellar_burgers::router::NavAction;
use stellar_burgers::session::{self, Session, SessionStore, StartupAuth};
use stellar_burgers::slices::builder::BuilderAction;
use stellar_burgers::slices::catalogue::CatalogueAction;
use stellar_burgers::slices::feed::FeedAction;
use stellar_burgers::slices::orders::OrdersAction;
use stellar_burgers::slices::user::{PasswordResetStage, UserAction};
use stellar_burgers::state::AppState;

/// Loading-spinner animation cadence.
const TICK_MS: u64 = 120;

/// Terminal client for the Stellar Burgers ordering service
#[derive(Parser, Debug)]
#[command(name = "stellar-burgers")]
#[command(about = "Compose and track cosmic burger orders from the terminal")]
struct Args {
    /// Base URL of the orders API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Feed refresh interval in seconds
    #[arg(long, short, default_value = "30")]
    refresh_interval: u64,

    /// Route to open at startup
    #[arg(long, short, default_value = "/")]
    path: String,

    /// Session file location (defaults to the platform data directory)
    #[arg(long)]
    session_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    let sessions = match &args.session_file {
        Some(path) => SessionStore::at_path(path.clone()),
        None => SessionStore::open_default().map_err(io::Error::other)?,
    };
    let api = ApiClient::new(&args.api_base);

    // ===== Terminal setup =====
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, args, api, sessions).await;

    // ===== Cleanup =====
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    args: Args,
    api: ApiClient,
    sessions: SessionStore,
) -> io::Result<()> {
    let store = StoreWithMiddleware::new(
        AppState::new(Location::new(args.path.clone())),
        reducer::reduce,
        LoggingMiddleware::new(),
    );
    let mut runtime = Runtime::from_store(store);

    // Tick timer for the loading spinner
    runtime
        .subscriptions()
        .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);

    // The feed snapshot is replaced wholesale on each fetch
    runtime.subscriptions().interval(
        "feed_refresh",
        Duration::from_secs(args.refresh_interval),
        || Action::Feed(FeedAction::Fetch),
    );

    // The catalogue loads once per session
    runtime.enqueue(Action::Catalogue(CatalogueAction::Fetch));

    // One-time session check: probe when a stored token exists (the probe
    // task refreshes a stale one first), otherwise the check completes
    // without a request.
    match sessions.startup_auth(session::unix_now()) {
        StartupAuth::Probe | StartupAuth::Refresh => {
            runtime.enqueue(Action::User(UserAction::Probe));
        }
        StartupAuth::Skip => runtime.enqueue(Action::User(UserAction::AuthChecked)),
    }

    // Enter the initial route through the reducer so the guard runs and the
    // route's fetches are declared.
    runtime.enqueue(Action::Nav(NavAction::Replace(args.path.clone())));

    let ui = RefCell::new(AppView::new());

    runtime
        .run(
            terminal,
            |frame, area, state| {
                ui.borrow_mut().render(frame, area, state);
            },
            |event, state| ui.borrow_mut().map_event(event, state),
            |action| matches!(action, Action::Quit),
            |effect, ctx| handle_effect(effect, ctx, &api, &sessions),
        )
        .await
}

/// Turn a declared effect into a keyed task.
///
/// Keys are per operation: respawning on a live key aborts the in-flight
/// task, so a superseded call never applies a stale resolution.
fn handle_effect(
    effect: Effect,
    ctx: &mut EffectContext<Action>,
    api: &ApiClient,
    sessions: &SessionStore,
) {
    let api = api.clone();
    let sessions = sessions.clone();
    match effect {
        Effect::FetchCatalogue => {
            ctx.tasks().spawn("catalogue", async move {
                match api.fetch_catalogue().await {
                    Ok(items) => Action::Catalogue(CatalogueAction::DidLoad(items)),
                    Err(e) => Action::Catalogue(CatalogueAction::DidError(e.to_string())),
                }
            });
        }
        Effect::FetchFeed => {
            ctx.tasks().spawn("feed", async move {
                match api.fetch_feed().await {
                    Ok(snapshot) => Action::Feed(FeedAction::DidLoad(snapshot)),
                    Err(e) => Action::Feed(FeedAction::DidError(e.to_string())),
                }
            });
        }
        Effect::FetchUserOrders => {
            ctx.tasks().spawn("orders", async move {
                match own_orders(&api, &sessions).await {
                    Ok(orders) => Action::Orders(OrdersAction::DidLoad(orders)),
                    Err(e) => Action::Orders(OrdersAction::DidError(e.to_string())),
                }
            });
        }
        Effect::SubmitOrder { item_ids } => {
            ctx.tasks().spawn("submit_order", async move {
                match place_order(&api, &sessions, &item_ids).await {
                    Ok(confirmation) => Action::Builder(BuilderAction::DidSubmit(confirmation)),
                    Err(e) => Action::Builder(BuilderAction::DidError(e.to_string())),
                }
            });
        }
        Effect::ProbeSession => {
            ctx.tasks().spawn("auth", async move {
                match probe(&api, &sessions).await {
                    Ok(user) => Action::User(UserAction::DidAuthenticate(user)),
                    Err(e) => {
                        // An unusable session is discarded, not retried
                        let _ = sessions.clear();
                        Action::User(UserAction::DidProbeError(e.to_string()))
                    }
                }
            });
        }
        Effect::Login { email, password } => {
            ctx.tasks().spawn("auth", async move {
                match api.login(&email, &password).await {
                    Ok(auth) => {
                        persist_session(&sessions, &auth.tokens);
                        Action::User(UserAction::DidAuthenticate(auth.user))
                    }
                    Err(e) => Action::User(UserAction::DidError(e.to_string())),
                }
            });
        }
        Effect::Register {
            name,
            email,
            password,
        } => {
            ctx.tasks().spawn("auth", async move {
                match api.register(&name, &email, &password).await {
                    Ok(auth) => {
                        persist_session(&sessions, &auth.tokens);
                        Action::User(UserAction::DidAuthenticate(auth.user))
                    }
                    Err(e) => Action::User(UserAction::DidError(e.to_string())),
                }
            });
        }
        Effect::UpdateProfile { update } => {
            ctx.tasks().spawn("auth", async move {
                match change_profile(&api, &sessions, &update).await {
                    Ok(user) => Action::User(UserAction::DidAuthenticate(user)),
                    Err(e) => Action::User(UserAction::DidError(e.to_string())),
                }
            });
        }
        Effect::Logout => {
            ctx.tasks().spawn("auth", async move {
                let Some(stored) = sessions.load() else {
                    return Action::User(UserAction::DidLogout);
                };
                match api.logout(&stored.refresh_token).await {
                    Ok(()) => {
                        let _ = sessions.clear();
                        Action::User(UserAction::DidLogout)
                    }
                    Err(e) => Action::User(UserAction::DidError(e.to_string())),
                }
            });
        }
        Effect::RequestPasswordReset { email } => {
            ctx.tasks().spawn("auth", async move {
                match api.request_password_reset(&email).await {
                    Ok(()) => Action::User(UserAction::DidPasswordReset(
                        PasswordResetStage::Requested,
                    )),
                    Err(e) => Action::User(UserAction::DidError(e.to_string())),
                }
            });
        }
        Effect::ConfirmPasswordReset { password, token } => {
            ctx.tasks().spawn("auth", async move {
                match api.confirm_password_reset(&password, &token).await {
                    Ok(()) => Action::User(UserAction::DidPasswordReset(
                        PasswordResetStage::Confirmed,
                    )),
                    Err(e) => Action::User(UserAction::DidError(e.to_string())),
                }
            });
        }
    }
}

/// A usable access token, refreshing a stale one first.
async fn access_token(api: &ApiClient, sessions: &SessionStore) -> Result<String, ApiError> {
    let Some(stored) = sessions.load() else {
        return Err(ApiError::Api(Some("authorization required".into())));
    };
    if !stored.is_expired(session::unix_now()) {
        return Ok(stored.access_token);
    }
    if stored.refresh_token.is_empty() {
        return Err(ApiError::Api(Some("session expired".into())));
    }
    let tokens = api.refresh_token(&stored.refresh_token).await?;
    let renewed = Session::issued(&tokens, session::unix_now());
    if let Err(e) = sessions.save(&renewed) {
        warn!(error = %e, "could not persist the refreshed session");
    }
    Ok(renewed.access_token)
}

async fn probe(api: &ApiClient, sessions: &SessionStore) -> Result<Profile, ApiError> {
    let token = access_token(api, sessions).await?;
    api.fetch_user(&token).await
}

async fn own_orders(api: &ApiClient, sessions: &SessionStore) -> Result<Vec<FeedEntry>, ApiError> {
    let token = access_token(api, sessions).await?;
    api.fetch_user_orders(&token).await
}

async fn place_order(
    api: &ApiClient,
    sessions: &SessionStore,
    item_ids: &[String],
) -> Result<OrderConfirmation, ApiError> {
    let token = access_token(api, sessions).await?;
    api.submit_order(item_ids, &token).await
}

async fn change_profile(
    api: &ApiClient,
    sessions: &SessionStore,
    update: &ProfileUpdate,
) -> Result<Profile, ApiError> {
    let token = access_token(api, sessions).await?;
    api.update_user(&token, update).await
}

fn persist_session(sessions: &SessionStore, tokens: &TokenPair) {
    let issued = Session::issued(tokens, session::unix_now());
    if let Err(e) = sessions.save(&issued) {
        warn!(error = %e, "could not persist the session");
    }
}
