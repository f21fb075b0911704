use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use axum::{Extension, Json, extract::State, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use rand_core::OsRng;
use tracing::info;
use uuid::Uuid;

use prconnect_db::{Database, is_constraint_violation};
use prconnect_db::models::{NewUser, ProfileUpdate};
use prconnect_types::api::{AuthPayload, Claims, Envelope, LoginRequest, RegisterRequest, UpdateProfileRequest};
use prconnect_types::models::User;

use crate::config::AdminSeed;
use crate::error::ApiError;
use crate::state::{AppState, with_db};

const MIN_PASSWORD_LEN: usize = 6;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    for (field, value) in [
        ("fullName", &req.full_name),
        ("email", &req.email),
        ("companyName", &req.company_name),
        ("password", &req.password),
        ("confirmPassword", &req.confirm_password),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::bad_request(format!("Field '{field}' is required")));
        }
    }

    let email = req.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(ApiError::bad_request("Invalid email format"));
    }
    if req.password != req.confirm_password {
        return Err(ApiError::bad_request("Passwords do not match"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }

    let lookup = email.clone();
    if with_db(&state, move |db| db.get_user_by_email(&lookup)).await?.is_some() {
        return Err(ApiError::Conflict("User with this email already exists".into()));
    }

    let password_hash = hash_password(&req.password)?;
    let user_id = Uuid::new_v4();

    let user = {
        let id = user_id.to_string();
        let full_name = req.full_name.trim().to_string();
        let company_name = req.company_name.trim().to_string();
        with_db(&state, move |db| {
            db.create_user(&NewUser {
                id: &id,
                full_name: &full_name,
                email: &email,
                password_hash: &password_hash,
                company_name: &company_name,
                is_admin: false,
            })?;
            db.get_user_by_id(&id)
        })
        .await
        .map_err(|e| match e {
            // lost a race with a concurrent registration for the same email
            ApiError::Internal(cause) if is_constraint_violation(&cause) => {
                ApiError::Conflict("User with this email already exists".into())
            }
            other => other,
        })?
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("user {user_id} vanished after insert")))?
        .into_user()
    };

    let token = create_token(&state.jwt_secret, state.token_ttl, user.id, &user.email)?;
    info!("New user registered: {} ({})", user.email, user.company_name);

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(AuthPayload { user, token }).with_message("User registered successfully")),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let email = req.email.trim().to_lowercase();
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let row = with_db(&state, move |db| db.get_user_by_email(&email))
        .await?
        .ok_or(ApiError::Unauthorized("Invalid email or password"))?;

    let parsed_hash = PasswordHash::new(&row.password)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("stored password hash is unreadable: {e}")))?;
    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized("Invalid email or password"))?;

    if !row.is_active {
        return Err(ApiError::Unauthorized("Account is deactivated"));
    }

    let user = row.into_user();
    let token = create_token(&state.jwt_secret, state.token_ttl, user.id, &user.email)?;
    info!("User logged in: {}", user.email);

    Ok(Json(Envelope::ok(AuthPayload { user, token }).with_message("Login successful")))
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let user = load_user(&state, &claims).await?.ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(Envelope::ok(user)))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let clearable = |field: Option<Option<String>>| {
        field.map(|value| value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
    };
    let update = ProfileUpdate {
        full_name: req.full_name.map(|v| v.trim().to_string()),
        company_name: req.company_name.map(|v| v.trim().to_string()),
        phone: clearable(req.phone),
        location: clearable(req.location),
    };

    let id = claims.sub.to_string();
    let user = with_db(&state, move |db| db.update_profile(&id, &update))
        .await?
        .ok_or(ApiError::NotFound("User not found"))?
        .into_user();

    info!("Profile updated for user: {}", user.email);
    Ok(Json(Envelope::ok(user).with_message("Profile updated successfully")))
}

pub async fn verify(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    match load_user(&state, &claims).await? {
        Some(user) if user.is_active => Ok(Json(Envelope::ok(user).with_message("Token is valid"))),
        _ => Err(ApiError::Unauthorized("Invalid user")),
    }
}

async fn load_user(state: &AppState, claims: &Claims) -> Result<Option<User>, ApiError> {
    let id = claims.sub.to_string();
    let row = with_db(state, move |db| db.get_user_by_id(&id)).await?;
    Ok(row.map(|r| r.into_user()))
}

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

pub fn create_token(
    secret: &str,
    ttl: chrono::Duration,
    user_id: Uuid,
    email: &str,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: (chrono::Utc::now() + ttl).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Create the configured admin, or promote and reactivate it if the email is
/// already registered.
pub fn ensure_admin(db: &Database, seed: &AdminSeed) -> anyhow::Result<()> {
    let email = seed.email.trim().to_lowercase();

    if let Some(existing) = db.get_user_by_email(&email)? {
        if !existing.is_admin || !existing.is_active {
            db.set_admin(&existing.id, true)?;
            db.set_active(&existing.id, true)?;
            info!("Promoted {} to admin", email);
        }
        return Ok(());
    }

    let password_hash = hash_password(&seed.password).map_err(|e| anyhow::anyhow!("{e}"))?;
    let id = Uuid::new_v4().to_string();
    db.create_user(&NewUser {
        id: &id,
        full_name: "Administrator",
        email: &email,
        password_hash: &password_hash,
        company_name: "PR-Connect",
        is_admin: true,
    })?;
    info!("Seeded admin account {}", email);
    Ok(())
}
