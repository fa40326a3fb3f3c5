use std::sync::{Arc, OnceLock};

use anyhow::anyhow;
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use tracing::{error, info, warn};
use uuid::Uuid;

use inkwell_db::{Database, is_constraint_violation};
use inkwell_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::error::ApiError;
use crate::rows::{now_timestamp, parse_id, user_from_row};
use crate::validation::{FieldErrors, validate_register};

/// Verified against when a login names an unknown user.
const DUMMY_PASSWORD: &str = "inkwell-dummy-password";

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub auth: AuthSettings,
}

/// Token signing and password hashing parameters.
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub password_params: Params,
    dummy_hash: Arc<OnceLock<String>>,
}

impl AuthSettings {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: chrono::Duration::days(30),
            password_params: Params::default(),
            dummy_hash: Arc::default(),
        }
    }

    pub fn with_token_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_password_params(mut self, params: Params) -> Self {
        self.password_params = params;
        self.dummy_hash = Arc::default();
        self
    }

    /// Computes the stand-in hash for unknown-user logins up front, so the
    /// first such login costs the same as every later one.
    pub fn prepare(&self) -> anyhow::Result<()> {
        self.dummy_hash().map(|_| ())
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.password_params.clone())
    }

    fn hash_password(&self, password: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("password hashing failed: {}", e))?;
        Ok(hash.to_string())
    }

    fn dummy_hash(&self) -> anyhow::Result<&str> {
        if let Some(hash) = self.dummy_hash.get() {
            return Ok(hash.as_str());
        }
        let hash = self.hash_password(DUMMY_PASSWORD)?;
        Ok(self.dummy_hash.get_or_init(|| hash).as_str())
    }
}

/// Runs store work on the blocking pool so SQLite never stalls the runtime.
pub(crate) async fn run_blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow!("blocking task failed"))
        })?
}

// -- Service --

pub fn register_user(
    db: &Database,
    settings: &AuthSettings,
    req: RegisterRequest,
) -> Result<RegisterResponse, ApiError> {
    validate_register(&req)?;

    if db.get_user_by_username(&req.username)?.is_some() {
        return Err(username_taken());
    }

    let password_hash = settings.hash_password(&req.password)?;

    let user_id = Uuid::new_v4().to_string();
    let created_at = now_timestamp();
    // A concurrent registration may claim the name while we were hashing.
    db.create_user(&user_id, &req.username, &password_hash, &created_at)
        .map_err(|e| {
            if is_constraint_violation(&e) {
                username_taken()
            } else {
                ApiError::Internal(e)
            }
        })?;

    let user = db
        .get_user_by_id(&user_id)?
        .ok_or_else(|| anyhow!("user {} vanished after insert", user_id))?;
    let user = user_from_row(&user)?;

    let token = create_token(settings, user.id, &user.username)?;
    info!("Registered user {} ({})", user.username, user.id);

    Ok(RegisterResponse { user, token })
}

fn username_taken() -> ApiError {
    ApiError::validation("username", "A user with that username already exists.")
}

/// Unknown usernames and wrong passwords fail identically.
pub fn login_user(
    db: &Database,
    settings: &AuthSettings,
    req: LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let mut errors = FieldErrors::default();
    if req.username.is_empty() {
        errors.add("username", "This field may not be blank.");
    }
    if req.password.is_empty() {
        errors.add("password", "This field may not be blank.");
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let Some(user) = db.get_user_by_username(&req.username)? else {
        // Pay for one Argon2 verify here too, so response time does not
        // reveal whether the username exists.
        let dummy = settings.dummy_hash()?;
        let parsed = PasswordHash::new(dummy).map_err(|e| anyhow!("dummy hash unreadable: {}", e))?;
        let _ = settings.hasher().verify_password(req.password.as_bytes(), &parsed);
        warn!("Login rejected: unknown user");
        return Err(ApiError::InvalidCredentials);
    };

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| anyhow!("stored hash for {} unreadable: {}", user.id, e))?;

    settings
        .hasher()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| {
            warn!("Login rejected: bad password for {}", user.id);
            ApiError::InvalidCredentials
        })?;

    let user_id = parse_id(&user.id)?;
    let token = create_token(settings, user_id, &user.username)?;
    info!("User {} logged in", user.username);

    Ok(LoginResponse {
        message: "Login successful".into(),
        user_id,
        username: user.username,
        token,
    })
}

// -- Handlers --

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let resp = run_blocking(&state, move |s| register_user(&s.db, &s.auth, req)).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    let resp = run_blocking(&state, move |s| login_user(&s.db, &s.auth, req)).await?;
    Ok(Json(resp))
}

// -- Tokens --

fn create_token(settings: &AuthSettings, user_id: Uuid, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + settings.token_ttl).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )?;

    Ok(token)
}

pub(crate) fn decode_token(settings: &AuthSettings, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}
