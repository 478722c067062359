use axum::{Json, response::Redirect};
use utoipa::OpenApi;

use crate::http::{ErrorBody, clients, delivery};
use crate::models::{ClientView, DeliveryStatus};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "API destinada para o projeto iDeliverTech",
        description = "Microsserviço responsável pelo gerenciamento de clientes",
        version = "1.0.0"
    ),
    paths(
        clients::create_client,
        clients::list_clients,
        clients::find_client,
        clients::delete_client,
        clients::update_client,
        delivery::confirm_delivery,
        delivery::delivery_status,
    ),
    components(schemas(
        ClientView,
        DeliveryStatus,
        ErrorBody,
        clients::ClientForm,
        clients::ClientList,
        clients::ClientAck,
    )),
    tags((name = "Cliente", description = "Adição, visualização, remoção e atualização de clientes"))
)]
pub struct ApiDoc;

/// Redirect to the API documentation
pub async fn home() -> Redirect {
    Redirect::to("/openapi")
}

/// OpenAPI document describing every endpoint
pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
