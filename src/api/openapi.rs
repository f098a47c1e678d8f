use super::handlers::{auth, health};
use utoipa::openapi::{InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// JSON endpoints are registered here via `.routes(routes!(...))`; the static
/// file fallback and `OPTIONS /health` are added in `api::app` and stay undocumented.
pub(crate) fn api_router() -> OpenApiRouter {
    let mut router = OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(auth::login::login))
        .routes(routes!(auth::session::logout))
        .routes(routes!(auth::content::content));

    let mut auth_tag = Tag::new("auth");
    auth_tag.description = Some("Admin passcode login and logout".to_string());

    let mut admin_tag = Tag::new("admin");
    admin_tag.description = Some("Content gated on an authorized session".to_string());

    router.get_openapi_mut().tags = Some(vec![auth_tag, admin_tag]);

    router
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(Some(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    let mut license = License::new(env!("CARGO_PKG_LICENSE"));
    license.identifier = Some(env!("CARGO_PKG_LICENSE").to_string());
    info.license = Some(license);

    OpenApiBuilder::new().info(info).build()
}
