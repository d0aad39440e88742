//! HTTP handlers for membership endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::membership::{
    CancelMembershipCommand, CancelMembershipHandler, CheckAccessHandler, CheckAccessQuery,
    CreateFreeMembershipCommand, CreateFreeMembershipHandler, CreatePaidMembershipCommand,
    CreatePaidMembershipHandler, GetMembershipHandler, GetMembershipQuery,
    GetMembershipStatsHandler, GetMembershipStatsQuery, HandlePaymentWebhookCommand,
    HandlePaymentWebhookHandler,
};
use crate::domain::foundation::UserId;
use crate::domain::membership::MembershipError;
use crate::ports::{
    AccessChecker, EventPublisher, MembershipReader, MembershipRepository, PaymentProvider,
    PromoCodeValidator,
};

use super::dto::{
    AccessCheckResponse, CancelMembershipRequest, CheckoutResponse, CreateFreeMembershipRequest,
    CreatePaidMembershipRequest, ErrorResponse, MembershipResponse, MembershipStatsResponse,
    MembershipViewResponse, PortalResponse, TierLimitsResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct MembershipAppState {
    pub membership_repository: Arc<dyn MembershipRepository>,
    pub membership_reader: Arc<dyn MembershipReader>,
    pub promo_code_validator: Arc<dyn PromoCodeValidator>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub access_checker: Arc<dyn AccessChecker>,
    pub event_publisher: Arc<dyn EventPublisher>,
}

impl MembershipAppState {
    /// Create handlers on demand from the shared state.
    pub fn get_membership_handler(&self) -> GetMembershipHandler {
        GetMembershipHandler::new(self.membership_reader.clone())
    }

    pub fn check_access_handler(&self) -> CheckAccessHandler {
        CheckAccessHandler::new(self.membership_reader.clone())
    }

    pub fn create_free_membership_handler(&self) -> CreateFreeMembershipHandler {
        CreateFreeMembershipHandler::new(
            self.membership_repository.clone(),
            self.promo_code_validator.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn create_paid_membership_handler(&self) -> CreatePaidMembershipHandler {
        CreatePaidMembershipHandler::new(
            self.membership_repository.clone(),
            self.payment_provider.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn cancel_membership_handler(&self) -> CancelMembershipHandler {
        CancelMembershipHandler::new(
            self.membership_repository.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.membership_repository.clone(),
            self.payment_provider.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn stats_handler(&self) -> GetMembershipStatsHandler {
        GetMembershipStatsHandler::new(self.membership_reader.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// User Context (would come from auth middleware in production)
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated user context extracted from request.
///
/// In production, this would be extracted from JWT/session by auth middleware.
/// For now, uses a header-based extraction for development/testing.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // In production, this would validate JWT token from Authorization header
            // For development, we accept an X-User-Id header
            let user_id = parts
                .headers
                .get("X-User-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| UserId::new(s).ok())
                .ok_or(AuthenticationRequired)?;

            Ok(AuthenticatedUser { user_id })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/membership - Get current user's membership details
pub async fn get_membership(
    State(state): State<MembershipAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, MembershipApiError> {
    let handler = state.get_membership_handler();
    let query = GetMembershipQuery {
        user_id: user.user_id,
    };

    let result = handler.handle(query).await?;

    let response = MembershipResponse {
        membership: result.map(MembershipViewResponse::from),
    };

    Ok(Json(response))
}

/// GET /api/membership/limits - Get tier limits for current user
pub async fn get_tier_limits(
    State(state): State<MembershipAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, MembershipApiError> {
    let limits = state.access_checker.get_tier_limits(&user.user_id).await?;
    let response = TierLimitsResponse::from(limits);
    Ok(Json(response))
}

/// GET /api/membership/access - Check if user has access
pub async fn check_access(
    State(state): State<MembershipAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, MembershipApiError> {
    let handler = state.check_access_handler();
    let query = CheckAccessQuery {
        user_id: user.user_id,
    };

    let result = handler.handle(query).await?;

    let response = AccessCheckResponse {
        has_access: result.has_access,
    };

    Ok(Json(response))
}

/// GET /api/membership/stats - Get membership statistics (admin only)
pub async fn get_membership_stats(
    State(state): State<MembershipAppState>,
    _user: AuthenticatedUser, // Would check admin role in production
) -> Result<impl IntoResponse, MembershipApiError> {
    let handler = state.stats_handler();
    let query = GetMembershipStatsQuery {};

    let result = handler.handle(query).await?;

    let response = MembershipStatsResponse::from(result);
    Ok(Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/membership/free - Create free membership with promo code
pub async fn create_free_membership(
    State(state): State<MembershipAppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateFreeMembershipRequest>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let handler = state.create_free_membership_handler();
    let cmd = CreateFreeMembershipCommand {
        user_id: user.user_id,
        promo_code: request.promo_code,
    };

    let result = handler.handle(cmd).await?;

    // Convert to view response
    let view = crate::ports::MembershipView {
        id: result.membership.id,
        user_id: result.membership.user_id.clone(),
        tier: result.membership.tier,
        status: result.membership.status,
        has_access: result.membership.has_access(),
        days_remaining: result.membership.days_remaining(),
        period_end: result.membership.current_period_end,
        promo_code: result.membership.promo_code.clone(),
        created_at: result.membership.created_at,
    };

    let response = MembershipResponse {
        membership: Some(MembershipViewResponse::from(view)),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/membership/checkout - Start paid checkout flow
pub async fn create_checkout(
    State(state): State<MembershipAppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreatePaidMembershipRequest>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let handler = state.create_paid_membership_handler();
    let cmd = CreatePaidMembershipCommand {
        user_id: user.user_id,
        email: request.email,
        tier: request.tier,
        success_url: request.success_url,
        cancel_url: request.cancel_url,
        promo_code: request.promo_code,
    };

    let result = handler.handle(cmd).await?;

    let response = CheckoutResponse {
        checkout_url: result.checkout_session.url,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/membership/cancel - Cancel membership
///
/// Note: The `immediate` field in the request is currently ignored as cancellation
/// always takes effect at the end of the current billing period.
pub async fn cancel_membership(
    State(state): State<MembershipAppState>,
    user: AuthenticatedUser,
    Json(_request): Json<CancelMembershipRequest>,
) -> Result<impl IntoResponse, MembershipApiError> {
    let handler = state.cancel_membership_handler();
    let cmd = CancelMembershipCommand {
        user_id: user.user_id,
    };

    handler.handle(cmd).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/membership/portal - Get Stripe customer portal URL
pub async fn get_portal_url(
    State(state): State<MembershipAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, MembershipApiError> {
    // Find membership to get Stripe customer ID
    let membership = state
        .membership_repository
        .find_by_user_id(&user.user_id)
        .await?
        .ok_or_else(|| MembershipError::not_found_for_user(user.user_id.clone()))?;

    let customer_id = membership
        .stripe_customer_id
        .clone()
        .ok_or_else(|| {
            MembershipError::validation("stripe_customer_id", "No Stripe customer associated")
        })?;

    // TODO: Get return URL from config or request
    let return_url = "/dashboard";

    let portal_session = state
        .payment_provider
        .create_portal_session(&customer_id, return_url)
        .await
        .map_err(|e| MembershipError::payment_failed(e.to_string()))?;

    let response = PortalResponse {
        portal_url: portal_session.url,
    };
    Ok(Json(response))
}

/// POST /api/webhooks/stripe - Handle Stripe webhook events
pub async fn handle_stripe_webhook(
    State(state): State<MembershipAppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, MembershipApiError> {
    // Extract Stripe signature header
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            MembershipError::validation("Stripe-Signature", "Missing Stripe-Signature header")
        })?;

    let handler = state.webhook_handler();
    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    handler.handle(cmd).await?;

    Ok(StatusCode::OK)
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
pub struct MembershipApiError(MembershipError);

impl From<MembershipError> for MembershipApiError {
    fn from(err: MembershipError) -> Self {
        Self(err)
    }
}

impl From<crate::domain::foundation::DomainError> for MembershipApiError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        Self(MembershipError::infrastructure(err.to_string()))
    }
}

impl IntoResponse for MembershipApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            MembershipError::NotFound(_) | MembershipError::NotFoundForUser(_) => {
                (StatusCode::NOT_FOUND, "MEMBERSHIP_NOT_FOUND")
            }
            MembershipError::AlreadyExists(_) => (StatusCode::CONFLICT, "MEMBERSHIP_EXISTS"),
            MembershipError::Expired(_) => (StatusCode::PAYMENT_REQUIRED, "MEMBERSHIP_EXPIRED"),
            MembershipError::InvalidTier(_) => (StatusCode::BAD_REQUEST, "INVALID_TIER"),
            MembershipError::InvalidPromoCode { .. } => {
                (StatusCode::BAD_REQUEST, "INVALID_PROMO_CODE")
            }
            MembershipError::PromoCodeExhausted(_) => {
                (StatusCode::BAD_REQUEST, "PROMO_CODE_EXHAUSTED")
            }
            MembershipError::PaymentFailed { .. } => {
                (StatusCode::PAYMENT_REQUIRED, "PAYMENT_FAILED")
            }
            MembershipError::InvalidState { .. } => {
                (StatusCode::CONFLICT, "INVALID_STATE_TRANSITION")
            }
            MembershipError::InvalidWebhookSignature => {
                (StatusCode::UNAUTHORIZED, "INVALID_WEBHOOK_SIGNATURE")
            }
            MembershipError::ValidationFailed { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            MembershipError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        // Use the error's built-in message() method for consistent messaging
        let message = self.0.message();
        let body = ErrorResponse::new(error_code, message);
        (status, Json(body)).into_response()
    }
}
