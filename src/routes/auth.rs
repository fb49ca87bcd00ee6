use crate::{
    auth::{generate_token, hash_password, verify_password, AuthResponse, LoginRequest, RegisterRequest},
    error::AppError,
    store::{AppState, UserStore},
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user.
///
/// Fails with a conflict when the email or the username is already taken;
/// no record is created in that case. On success the password is stored
/// only as a bcrypt hash, and the response carries a signed token plus the
/// public user fields.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    if state
        .store
        .user_identity_taken(&register_data.email, &register_data.username)
        .await?
    {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password(&register_data.password)?;

    let user = state
        .store
        .insert_user(&register_data.username, &register_data.email, &password_hash)
        .await?;

    let token = generate_token(user.id, &user.username)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user: user.public(),
    }))
}

/// Login.
///
/// The same error is returned for an unknown email and for a wrong
/// password, so the response never reveals which check failed.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = state
        .store
        .find_user_by_email(&login_data.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&login_data.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = generate_token(user.id, &user.username)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: user.public(),
    }))
}
