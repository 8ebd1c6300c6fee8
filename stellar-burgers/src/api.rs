//! Typed client for the orders API
//!
//! Every remote operation the app consumes lives here as a typed request
//! function. Failures are normalized at this boundary: whatever the server
//! or transport did, callers get an [`ApiError`] whose `Display` output is a
//! human-readable message, substituting a fixed fallback when the failure
//! carries no message of its own. Nothing above this layer ever sees a raw
//! `reqwest::Error`.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Production API base.
pub const DEFAULT_API_BASE: &str = "https://norma.nomoreparties.space/api";

/// Shown when a failure carries no message of its own.
pub const FALLBACK_ERROR: &str = "request failed";

// ============================================================================
// Domain types
// ============================================================================

/// Item category. Wire names follow the service (`bun`/`main`/`sauce`).
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum Category {
    #[serde(rename = "bun")]
    Base,
    #[serde(rename = "main")]
    Filling,
    #[serde(rename = "sauce")]
    Topping,
}

/// Immutable catalogue descriptor. Loaded once per session, never mutated.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CatalogueItem {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub name: String,
    pub price: u64,
    pub calories: u32,
    pub proteins: u32,
    pub fat: u32,
    pub carbohydrates: u32,
    pub image: String,
    #[serde(rename = "image_mobile")]
    pub image_mobile: String,
    #[serde(rename = "image_large")]
    pub image_large: String,
}

/// Lifecycle status of a placed order.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    #[serde(rename = "done")]
    Done,
    #[serde(rename = "pending")]
    Pending,
    #[serde(other)]
    Other,
}

/// One entry of the public feed or the user's order history.
///
/// Ingredients are catalogue identifiers, resolved against the catalogue
/// slice at the view layer.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct FeedEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub ingredients: Vec<String>,
    pub status: OrderStatus,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    pub number: u64,
}

/// The whole feed, replaced wholesale on each successful fetch.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct FeedSnapshot {
    pub orders: Vec<FeedEntry>,
    pub total: u64,
    #[serde(rename = "totalToday")]
    pub total_today: u64,
}

/// Authenticated user profile. Empty fields mean unauthenticated.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Profile {
    pub email: String,
    pub name: String,
}

/// Confirmation returned for a submitted order.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct OrderConfirmation {
    pub name: String,
    pub number: u64,
}

/// Access/refresh token pair issued on login, register and refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenPair {
    /// Includes the scheme, e.g. `Bearer <jwt>`; sent verbatim.
    pub access_token: String,
    pub refresh_token: String,
}

/// Login/register result: profile plus tokens.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthSession {
    pub user: Profile,
    pub tokens: TokenPair,
}

/// Partial profile update; unset fields are left untouched server-side.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// ============================================================================
// Errors
// ============================================================================

/// Normalized API failure.
#[derive(Debug)]
pub enum ApiError {
    /// Transport-level failure (connection, timeout, decode).
    Request(reqwest::Error),
    /// The service rejected the call; the message may be absent.
    Api(Option<String>),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Request(e) => write!(f, "{}", e),
            ApiError::Api(Some(message)) if !message.trim().is_empty() => {
                write!(f, "{}", message)
            }
            ApiError::Api(_) => write!(f, "{}", FALLBACK_ERROR),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Request(e)
    }
}

// ============================================================================
// Wire envelopes
// ============================================================================

#[derive(Debug, Deserialize)]
struct IngredientsResponse {
    success: bool,
    data: Vec<CatalogueItem>,
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    success: bool,
    #[serde(flatten)]
    snapshot: FeedSnapshot,
}

#[derive(Debug, Deserialize)]
struct OrderNumber {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct NewOrderResponse {
    success: bool,
    name: String,
    order: OrderNumber,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    success: bool,
    user: Profile,
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    success: bool,
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    success: bool,
    user: Profile,
}

#[derive(Debug, Deserialize)]
struct AckResponse {
    success: bool,
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

/// Thin typed wrapper over the HTTP API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base.trim_end_matches('/'), path)
    }

    async fn execute<T>(&self, builder: reqwest::RequestBuilder, path: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!(path, "api request");
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            warn!(path, status = %status, "api request rejected");
            return Err(ApiError::Api(body.message));
        }
        response.json::<T>().await.map_err(ApiError::Request)
    }

    /// `fetchCatalogue` - the immutable item catalogue.
    pub async fn fetch_catalogue(&self) -> Result<Vec<CatalogueItem>, ApiError> {
        let resp: IngredientsResponse = self
            .execute(self.http.get(self.url("/ingredients")), "/ingredients")
            .await?;
        if !resp.success {
            return Err(ApiError::Api(None));
        }
        Ok(resp.data)
    }

    /// `fetchFeed` - the public order feed with totals.
    pub async fn fetch_feed(&self) -> Result<FeedSnapshot, ApiError> {
        let resp: FeedResponse = self
            .execute(self.http.get(self.url("/orders/all")), "/orders/all")
            .await?;
        if !resp.success {
            return Err(ApiError::Api(None));
        }
        Ok(resp.snapshot)
    }

    /// `fetchUserOrders` - the authenticated user's order history.
    pub async fn fetch_user_orders(&self, access_token: &str) -> Result<Vec<FeedEntry>, ApiError> {
        let resp: FeedResponse = self
            .execute(
                self.http
                    .get(self.url("/orders"))
                    .header("Authorization", access_token),
                "/orders",
            )
            .await?;
        if !resp.success {
            return Err(ApiError::Api(None));
        }
        Ok(resp.snapshot.orders)
    }

    /// `submitOrder` - place an order from catalogue item ids.
    pub async fn submit_order(
        &self,
        item_ids: &[String],
        access_token: &str,
    ) -> Result<OrderConfirmation, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            ingredients: &'a [String],
        }

        let resp: NewOrderResponse = self
            .execute(
                self.http
                    .post(self.url("/orders"))
                    .header("Authorization", access_token)
                    .json(&Body {
                        ingredients: item_ids,
                    }),
                "/orders",
            )
            .await?;
        if !resp.success {
            return Err(ApiError::Api(None));
        }
        Ok(OrderConfirmation {
            name: resp.name,
            number: resp.order.number,
        })
    }

    /// `login` - authenticate and receive a token pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
        }

        let resp: AuthResponse = self
            .execute(
                self.http
                    .post(self.url("/auth/login"))
                    .json(&Body { email, password }),
                "/auth/login",
            )
            .await?;
        Self::auth_session(resp)
    }

    /// `register` - create an account; response shape matches login.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
            email: &'a str,
            password: &'a str,
        }

        let resp: AuthResponse = self
            .execute(
                self.http.post(self.url("/auth/register")).json(&Body {
                    name,
                    email,
                    password,
                }),
                "/auth/register",
            )
            .await?;
        Self::auth_session(resp)
    }

    fn auth_session(resp: AuthResponse) -> Result<AuthSession, ApiError> {
        if !resp.success {
            return Err(ApiError::Api(None));
        }
        Ok(AuthSession {
            user: resp.user,
            tokens: TokenPair {
                access_token: resp.access_token,
                refresh_token: resp.refresh_token,
            },
        })
    }

    /// `refreshSession` - exchange the refresh token for a new pair.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            token: &'a str,
        }

        let resp: TokenResponse = self
            .execute(
                self.http.post(self.url("/auth/token")).json(&Body {
                    token: refresh_token,
                }),
                "/auth/token",
            )
            .await?;
        if !resp.success {
            return Err(ApiError::Api(None));
        }
        Ok(TokenPair {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token,
        })
    }

    /// The one-time session probe: who does this access token belong to.
    pub async fn fetch_user(&self, access_token: &str) -> Result<Profile, ApiError> {
        let resp: UserResponse = self
            .execute(
                self.http
                    .get(self.url("/auth/user"))
                    .header("Authorization", access_token),
                "/auth/user",
            )
            .await?;
        if !resp.success {
            return Err(ApiError::Api(None));
        }
        Ok(resp.user)
    }

    /// `updateProfile` - patch the authenticated profile.
    pub async fn update_user(
        &self,
        access_token: &str,
        update: &ProfileUpdate,
    ) -> Result<Profile, ApiError> {
        let resp: UserResponse = self
            .execute(
                self.http
                    .patch(self.url("/auth/user"))
                    .header("Authorization", access_token)
                    .json(update),
                "/auth/user",
            )
            .await?;
        if !resp.success {
            return Err(ApiError::Api(None));
        }
        Ok(resp.user)
    }

    /// `logout` - revoke the refresh token.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            token: &'a str,
        }

        let resp: AckResponse = self
            .execute(
                self.http.post(self.url("/auth/logout")).json(&Body {
                    token: refresh_token,
                }),
                "/auth/logout",
            )
            .await?;
        if !resp.success {
            return Err(ApiError::Api(resp.message));
        }
        Ok(())
    }

    /// Request a password-reset code for the given email.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
        }

        let resp: AckResponse = self
            .execute(
                self.http
                    .post(self.url("/password-reset"))
                    .json(&Body { email }),
                "/password-reset",
            )
            .await?;
        if !resp.success {
            return Err(ApiError::Api(resp.message));
        }
        Ok(())
    }

    /// Set a new password using the emailed reset code.
    pub async fn confirm_password_reset(
        &self,
        password: &str,
        token: &str,
    ) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            password: &'a str,
            token: &'a str,
        }

        let resp: AckResponse = self
            .execute(
                self.http
                    .post(self.url("/password-reset/reset"))
                    .json(&Body { password, token }),
                "/password-reset/reset",
            )
            .await?;
        if !resp.success {
            return Err(ApiError::Api(resp.message));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_uses_message_when_present() {
        let e = ApiError::Api(Some("email or password are incorrect".into()));
        assert_eq!(e.to_string(), "email or password are incorrect");
    }

    #[test]
    fn error_display_falls_back_when_message_missing() {
        assert_eq!(ApiError::Api(None).to_string(), FALLBACK_ERROR);
        assert_eq!(ApiError::Api(Some("  ".into())).to_string(), FALLBACK_ERROR);
    }

    #[test]
    fn catalogue_item_deserializes_from_wire_shape() {
        let json = r#"{
            "_id": "643d69a5c3f7b9001cfa093c",
            "name": "Краторная булка N-200i",
            "type": "bun",
            "proteins": 80,
            "fat": 24,
            "carbohydrates": 53,
            "calories": 420,
            "price": 1255,
            "image": "https://example.test/bun-02.png",
            "image_mobile": "https://example.test/bun-02-mobile.png",
            "image_large": "https://example.test/bun-02-large.png"
        }"#;

        let item: CatalogueItem = serde_json::from_str(json).expect("valid item");
        assert_eq!(item.category, Category::Base);
        assert_eq!(item.price, 1255);
        assert_eq!(item.id, "643d69a5c3f7b9001cfa093c");
    }

    #[test]
    fn feed_entry_status_tolerates_unknown_values() {
        let json = r#"{
            "_id": "68c9745d673086001ba887a5",
            "ingredients": ["a", "b"],
            "status": "created",
            "name": "Краторный бургер",
            "createdAt": "2025-09-16T14:29:49.829Z",
            "updatedAt": "2025-09-16T14:29:51.043Z",
            "number": 88827
        }"#;

        let entry: FeedEntry = serde_json::from_str(json).expect("valid entry");
        assert_eq!(entry.status, OrderStatus::Other);
        assert_eq!(entry.number, 88827);
    }

    #[test]
    fn feed_response_flattens_snapshot() {
        let json = r#"{"success": true, "orders": [], "total": 88827, "totalToday": 42}"#;
        let resp: FeedResponse = serde_json::from_str(json).expect("valid feed");
        assert!(resp.success);
        assert_eq!(resp.snapshot.total, 88827);
        assert_eq!(resp.snapshot.total_today, 42);
    }

    #[test]
    fn profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            name: Some("New Name".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).expect("serializable");
        assert_eq!(json, r#"{"name":"New Name"}"#);
    }
}
