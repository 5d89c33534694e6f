use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    middleware,
    routing::{get, post},
};
use axum_helpers::{JwtAuth, JwtClaims, RoleGate, ValidatedJson, role_gate};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{
    AccessToken, LoginRequest, RegisterRequest, ResendOtpRequest, TokenPair, UpdateUser,
    UserFilter, UserResponse, VerifyRequest,
};
use crate::repository::UserRepository;
use crate::service::UserService;

/// Roles accepted by routes that only require a logged-in user
const ANY_ROLE: &[&str] = &["user", "admin", "super-admin", "seller"];
/// Roles accepted by the admin CRUD routes
const ADMIN_ONLY: &[&str] = &["admin"];

/// Shared state for the user routes
#[derive(Clone)]
pub struct AuthState<R: UserRepository> {
    pub service: UserService<R>,
    pub jwt_auth: JwtAuth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListUsersResponse {
    pub data: Vec<UserResponse>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// Build the `/user` router: public auth flow, token routes for any
/// authenticated role, and admin-only CRUD.
pub fn router<R>(state: AuthState<R>) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let any_gate = RoleGate::new(state.jwt_auth.clone(), ANY_ROLE);
    let admin_gate = RoleGate::new(state.jwt_auth.clone(), ADMIN_ONLY);

    let public = Router::new()
        .route("/register", post(register))
        .route("/verify", post(verify))
        .route("/resend-otp", post(resend_otp))
        .route("/login", post(login));

    let authenticated = Router::new()
        .route("/refresh", get(refresh))
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(any_gate, role_gate));

    let admin = Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route_layer(middleware::from_fn_with_state(admin_gate, role_gate));

    public.merge(authenticated).merge(admin).with_state(state)
}

async fn register<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<Json<MessageResponse>> {
    state.service.register(input).await?;
    Ok(Json(MessageResponse {
        message: "User created successfully otp is sended to email and phone".to_string(),
    }))
}

async fn verify<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<VerifyRequest>,
) -> UserResult<Json<UserResponse>> {
    let user = state.service.verify_email(input).await?;
    Ok(Json(user.into()))
}

async fn resend_otp<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<ResendOtpRequest>,
) -> UserResult<Json<MessageResponse>> {
    state.service.resend_otp(&input.email).await?;
    Ok(Json(MessageResponse {
        message: "Otp sent".to_string(),
    }))
}

async fn login<R: UserRepository>(
    State(state): State<AuthState<R>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<TokenPair>> {
    let user = state.service.login(input).await?;
    let user_id = user.id.to_string();
    let role = user.role.to_string();

    let access_token = state
        .jwt_auth
        .create_access_token(&user_id, &role)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to sign access token");
            UserError::Internal(e.to_string())
        })?;
    let refresh_token = state
        .jwt_auth
        .create_refresh_token(&user_id, &role)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to sign refresh token");
            UserError::Internal(e.to_string())
        })?;

    Ok(Json(TokenPair {
        access_token,
        refresh_token,
    }))
}

/// Re-issue an access token from the presented (still valid) claims.
/// Stateless: the user record is not consulted.
async fn refresh<R: UserRepository>(
    State(state): State<AuthState<R>>,
    Extension(claims): Extension<JwtClaims>,
) -> UserResult<Json<AccessToken>> {
    let access_token = state
        .jwt_auth
        .create_access_token(&claims.sub, &claims.role)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to sign access token");
            UserError::Internal(e.to_string())
        })?;

    Ok(Json(AccessToken { access_token }))
}

async fn me<R: UserRepository>(
    State(state): State<AuthState<R>>,
    Extension(claims): Extension<JwtClaims>,
) -> UserResult<Json<UserResponse>> {
    let id = Uuid::parse_str(&claims.sub).map_err(|_| UserError::Unauthorized)?;
    let user = state.service.get_user(id).await?;
    Ok(Json(user.into()))
}

async fn list_users<R: UserRepository>(
    State(state): State<AuthState<R>>,
    Query(filter): Query<UserFilter>,
) -> UserResult<Json<ListUsersResponse>> {
    let limit = filter.limit;
    let offset = filter.offset;
    let (users, total) = state.service.list_users(filter).await?;

    Ok(Json(ListUsersResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
        total,
        limit,
        offset,
    }))
}

async fn get_user<R: UserRepository>(
    State(state): State<AuthState<R>>,
    Path(id): Path<Uuid>,
) -> UserResult<Json<UserResponse>> {
    let user = state.service.get_user(id).await?;
    Ok(Json(user.into()))
}

async fn update_user<R: UserRepository>(
    State(state): State<AuthState<R>>,
    Path(id): Path<Uuid>,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<UserResponse>> {
    let user = state.service.update_user(id, input).await?;
    Ok(Json(user.into()))
}

async fn delete_user<R: UserRepository>(
    State(state): State<AuthState<R>>,
    Path(id): Path<Uuid>,
) -> UserResult<Json<MessageResponse>> {
    state.service.delete_user(id).await?;
    Ok(Json(MessageResponse {
        message: "User deleted".to_string(),
    }))
}
