use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::AppState;
use crate::error::Error;
use crate::http::{ApiError, ErrorBody, ValidQuery};
use crate::models::DeliveryStatus;

pub const DELIVERY_NOT_FOUND_MSG: &str = "Entrega não encontrada na base :/";
pub const DELIVERY_LOOKUP_FAILED_MSG: &str = "Erro ao buscar entrega.";

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeliveryUpdateQuery {
    #[param(example = 1505)]
    pub numero_entrega: i64,
    pub entrega_realizada: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeliveryLookupQuery {
    #[param(example = 1505)]
    pub numero_entrega: i64,
}

/// Forward a delivery confirmation to the delivery service
#[utoipa::path(
    method(post, put),
    path = "/confirmar_recebimento_entrega",
    tag = "Cliente",
    params(DeliveryUpdateQuery),
    responses(
        (status = 200, description = "Resposta do serviço de entregas"),
        (status = 400, description = "Parâmetros inválidos", body = ErrorBody),
        (status = 502, description = "Serviço de entregas recusou ou não respondeu", body = ErrorBody)
    )
)]
pub async fn confirm_delivery(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<DeliveryUpdateQuery>,
) -> Result<Json<Value>, ApiError> {
    match state
        .delivery
        .update_status(query.numero_entrega, query.entrega_realizada)
        .await
    {
        Ok(body) => {
            tracing::debug!("Status da entrega {} atualizado com sucesso", query.numero_entrega);
            Ok(Json(body))
        }
        Err(Error::Upstream {
            status: Some(status),
            ..
        }) => {
            tracing::warn!(status, "delivery service rejected update of {}", query.numero_entrega);
            Err(ApiError::new(
                StatusCode::BAD_GATEWAY,
                format!(
                    "Erro ao atualizar o status da entrega. Código de status: {}",
                    status
                ),
            ))
        }
        Err(e) => {
            tracing::error!(error = %e, "delivery update {} failed", query.numero_entrega);
            Err(ApiError::new(
                StatusCode::BAD_GATEWAY,
                "Erro ao atualizar o status da entrega. Serviço de entregas indisponível.",
            ))
        }
    }
}

/// Fetch the status of a delivery from the delivery service
#[utoipa::path(
    method(get, post),
    path = "/status_pedido",
    tag = "Cliente",
    params(DeliveryLookupQuery),
    responses(
        (status = 200, description = "Status da entrega", body = DeliveryStatus),
        (status = 400, description = "Parâmetros inválidos", body = ErrorBody),
        (status = 404, description = "Entrega não encontrada", body = ErrorBody),
        (status = 500, description = "Erro ao buscar entrega", body = ErrorBody)
    )
)]
pub async fn delivery_status(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<DeliveryLookupQuery>,
) -> Result<Json<DeliveryStatus>, ApiError> {
    let numero = query.numero_entrega;
    tracing::debug!("Coletando dados sobre a entrega #{}", numero);

    match state.delivery.get_status(numero).await {
        Ok(status) => {
            tracing::debug!("Entrega encontrada: '{}'", numero);
            Ok(Json(status))
        }
        Err(Error::NotFound) => {
            tracing::warn!("Erro ao buscar entrega '{}', {}", numero, DELIVERY_NOT_FOUND_MSG);
            Err(ApiError::not_found(DELIVERY_NOT_FOUND_MSG))
        }
        Err(e) => {
            tracing::error!("Erro ao buscar entrega '{}': {}", numero, e);
            Err(ApiError::internal(DELIVERY_LOOKUP_FAILED_MSG))
        }
    }
}
