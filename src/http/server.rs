//! Router assembling the provider listing and admin endpoints.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::{
    context::AppState,
    handler_providers::handle_list_providers,
    handler_registrations::{
        handle_delete_registration, handle_get_registration, handle_list_registrations,
        handle_put_registration,
    },
};

/// Build the application router
pub fn build_router(ctx: AppState) -> Router {
    let mut router = Router::new();

    if *ctx.config.enable_provider_listing.as_ref() {
        router = router.route("/oauth2/providers", get(handle_list_providers));
    }

    // Admin API is only mounted when a token is configured
    if ctx.config.admin_token.is_enabled() {
        let admin_routes = Router::new()
            .route("/registrations", get(handle_list_registrations))
            .route(
                "/registrations/{registration_id}",
                get(handle_get_registration)
                    .put(handle_put_registration)
                    .delete(handle_delete_registration),
            );
        router = router.nest("/admin", admin_routes);
    }

    router.layer(TraceLayer::new_for_http()).with_state(ctx)
}
