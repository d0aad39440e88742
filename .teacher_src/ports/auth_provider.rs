//! Auth provider port for user profile retrieval.
//!
//! This is a secondary authentication port for cases where you need to
//! fetch user information outside of a request context (e.g., batch jobs,
//! admin operations, etc.).
//!
//! # When to Use
//!
//! - **SessionValidator**: Primary port - use for validating incoming requests
//! - **AuthProvider**: Secondary port - use for looking up user profiles by ID
//!
//! Most request handlers should use `SessionValidator` + the extracted
//! `AuthenticatedUser`. Use `AuthProvider` when you need to look up a
//! user that isn't the current requester.
//!
//! # Example
//!
//! ```ignore
//! // In an admin handler that needs to look up another user
//! async fn get_user_details(
//!     auth_provider: Arc<dyn AuthProvider>,
//!     user_id: &UserId,
//! ) -> Result<UserDetails, AuthError> {
//!     let user = auth_provider.get_user(user_id).await?;
//!     Ok(UserDetails::from(user))
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::{AuthenticatedUser, AuthError, UserId};

/// Retrieves user profile information from the auth provider.
///
/// This port is for looking up users by ID, separate from token validation.
/// Use this when you need to fetch profile info for a user other than the
/// current requester.
///
/// # Contract
///
/// Implementations must:
/// - Return the user if they exist in the auth system
/// - Return `AuthError::UserNotFound` if the user doesn't exist
/// - Return `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Get a user by their ID.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The unique user identifier
    ///
    /// # Returns
    ///
    /// * `Ok(AuthenticatedUser)` - User found and profile retrieved
    /// * `Err(AuthError::UserNotFound)` - No user exists with this ID
    /// * `Err(AuthError::ServiceUnavailable)` - Auth provider unreachable
    async fn get_user(&self, user_id: &UserId) -> Result<AuthenticatedUser, AuthError>;
}
