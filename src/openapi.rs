use utoipa::OpenApi;
use utoipauto::utoipauto;

#[utoipauto]
#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "Jamaica House Brand REST API", description = "Jamaica House Brand Storefront API Endpoints")
    ),
)]

pub struct ApiDoc {}
