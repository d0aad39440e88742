//! Axum router configuration for membership endpoints.
//!
//! This module defines the route structure for membership-related API endpoints
//! and wires them to their corresponding handlers.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    cancel_membership, check_access, create_checkout, create_free_membership, get_membership,
    get_membership_stats, get_portal_url, get_tier_limits, handle_stripe_webhook,
    MembershipAppState,
};

/// Create the membership API router.
///
/// # Routes
///
/// ## User Endpoints (require authentication)
/// - `GET /` - Get current user's membership details
/// - `GET /limits` - Get tier limits for current user
/// - `GET /access` - Check if user has access
/// - `GET /portal` - Get Stripe customer portal URL
/// - `POST /free` - Create free membership with promo code
/// - `POST /checkout` - Start paid checkout flow
/// - `POST /cancel` - Cancel membership
///
/// ## Admin Endpoints (require admin role)
/// - `GET /stats` - Get membership statistics
///
/// ## Webhook Endpoints (no auth, signature verified)
/// - `POST /webhooks/stripe` - Handle Stripe webhooks
pub fn membership_routes() -> Router<MembershipAppState> {
    Router::new()
        // User endpoints
        .route("/", get(get_membership))
        .route("/limits", get(get_tier_limits))
        .route("/access", get(check_access))
        .route("/portal", get(get_portal_url))
        .route("/free", post(create_free_membership))
        .route("/checkout", post(create_checkout))
        .route("/cancel", post(cancel_membership))
        // Admin endpoints
        .route("/stats", get(get_membership_stats))
}

/// Create the Stripe webhook router.
///
/// This is separate from the main membership routes because webhooks
/// don't require user authentication (they're verified via signature).
///
/// # Routes
/// - `POST /stripe` - Handle Stripe webhooks
pub fn webhook_routes() -> Router<MembershipAppState> {
    Router::new().route("/stripe", post(handle_stripe_webhook))
}

/// Create the complete membership module router.
///
/// Combines user/admin routes and webhook routes into a single router
/// suitable for mounting at `/api/membership` and `/api/webhooks`.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use crate::adapters::http::membership::{membership_router, MembershipAppState};
///
/// let app_state = MembershipAppState { /* ... */ };
/// let app = Router::new()
///     .nest("/api/membership", membership_routes())
///     .nest("/api/webhooks", webhook_routes())
///     .with_state(app_state);
/// ```
pub fn membership_router() -> Router<MembershipAppState> {
    Router::new()
        .nest("/membership", membership_routes())
        .nest("/webhooks", webhook_routes())
}
