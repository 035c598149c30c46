/// Router Module Index
///
/// The shell fallback is registered in `create_router`; these modules hold the
/// fixed endpoints that take precedence over it.

/// Health probe and chunk delivery.
pub mod public;

/// JSON access to the route table.
pub mod api;
