/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules,
/// enforcing a Defense-in-Depth strategy. This structure ensures that
/// access control is applied explicitly at the module level (via Axum layers),
/// preventing accidental exposure of protected endpoints.
///
/// There is no separate admin router: admin and superUser are roles evaluated
/// inside the ownership predicate of each mutation handler, not a distinct
/// route surface.

/// Routes accessible to all clients (anonymous, read-only, plus the auth
/// gateway endpoints).
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires a validated user session.
pub mod authenticated;
