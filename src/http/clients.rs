use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::AppState;
use crate::cpf::Cpf;
use crate::error::Error;
use crate::http::{ApiError, ErrorBody, ValidForm, ValidQuery};
use crate::models::{ClientChanges, ClientView, NewClient};

pub const DUPLICATE_MSG: &str = "Cliente de mesmo nome já salvo na base :/";
pub const SAVE_FAILED_MSG: &str = "Não foi possível salvar novo item :/";
pub const NOT_FOUND_MSG: &str = "Cliente não encontrado na base :/";
pub const UPDATE_NOT_FOUND_MSG: &str = "Cliente não encontrado.";
pub const UPDATE_FAILED_MSG: &str = "Erro ao atualizar dados do cliente.";
pub const QUERY_FAILED_MSG: &str = "Erro ao consultar a base de clientes.";
pub const REMOVED_MSG: &str = "Cliente removido";
pub const UPDATED_MSG: &str = "Dados do cliente atualizados com sucesso.";

/// Form submitted to register a client
#[derive(Debug, Deserialize, ToSchema)]
pub struct ClientForm {
    #[schema(example = "abc@gmail.com")]
    pub email: String,
    #[schema(example = "Gabriela Santos")]
    pub nome: String,
    #[schema(example = 27)]
    pub idade: i32,
    #[schema(example = "000.000.000-00")]
    pub cpf: String,
}

/// Lookup by CPF, raw or punctuated
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CpfQuery {
    #[param(example = "000.000.000-00")]
    pub cpf: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateQuery {
    #[param(example = "000.000.000-00")]
    pub cpf: String,
    pub email: String,
    pub nome: String,
    pub idade: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientList {
    pub clientes: Vec<ClientView>,
}

/// Confirmation returned by delete and update
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClientAck {
    pub message: String,
    pub cpf: String,
}

/// Normalize an inbound CPF, answering 400 when it cannot be one
fn parse_cpf(raw: &str) -> Result<Cpf, ApiError> {
    Cpf::parse(raw).map_err(|e| {
        tracing::warn!(cpf = raw, error = %e, "rejected cpf");
        match e {
            Error::InvalidInput(msg) => ApiError::bad_request(msg),
            other => ApiError::bad_request(other.to_string()),
        }
    })
}

/// Register a new client
#[utoipa::path(
    post,
    path = "/cadastrar_cliente",
    tag = "Cliente",
    request_body(content = ClientForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Cliente cadastrado", body = ClientView),
        (status = 400, description = "Dados inválidos ou falha ao salvar", body = ErrorBody),
        (status = 409, description = "Email ou CPF já cadastrado", body = ErrorBody)
    )
)]
pub async fn create_client(
    State(state): State<AppState>,
    ValidForm(form): ValidForm<ClientForm>,
) -> Result<Json<ClientView>, ApiError> {
    let new_client = NewClient {
        cpf: parse_cpf(&form.cpf)?,
        email: form.email,
        name: form.nome,
        age: form.idade,
    };
    tracing::debug!("Adicionando cliente de nome: '{}'", new_client.name);

    match state.clients.create(&new_client).await {
        Ok(client) => {
            tracing::debug!("Adicionado cliente de nome: '{}'", client.name);
            Ok(Json(client.into()))
        }
        Err(Error::Duplicate) => {
            tracing::warn!(
                "Erro ao adicionar cliente '{}', {}",
                new_client.name,
                DUPLICATE_MSG
            );
            Err(ApiError::new(StatusCode::CONFLICT, DUPLICATE_MSG))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Erro ao adicionar cliente '{}'", new_client.name);
            Err(ApiError::bad_request(SAVE_FAILED_MSG))
        }
    }
}

/// List every registered client
#[utoipa::path(
    get,
    path = "/buscar_clientes",
    tag = "Cliente",
    responses(
        (status = 200, description = "Listagem de clientes", body = ClientList),
        (status = 500, description = "Falha ao consultar a base", body = ErrorBody)
    )
)]
pub async fn list_clients(State(state): State<AppState>) -> Result<Json<ClientList>, ApiError> {
    let clients = state.clients.list_all().await.map_err(|e| {
        tracing::error!(error = %e, "failed to list clients");
        ApiError::internal(QUERY_FAILED_MSG)
    })?;
    tracing::debug!("{} clientes encontrados", clients.len());

    Ok(Json(ClientList {
        clientes: clients.into_iter().map(ClientView::from).collect(),
    }))
}

/// Look up a client by CPF
#[utoipa::path(
    get,
    path = "/buscar_cliente_cpf",
    tag = "Cliente",
    params(CpfQuery),
    responses(
        (status = 200, description = "Cliente encontrado", body = ClientView),
        (status = 400, description = "CPF ou parâmetros inválidos", body = ErrorBody),
        (status = 404, description = "Cliente não encontrado", body = ErrorBody)
    )
)]
pub async fn find_client(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<CpfQuery>,
) -> Result<Json<ClientView>, ApiError> {
    let cpf = parse_cpf(&query.cpf)?;
    tracing::debug!("Coletando dados sobre cliente #{}", cpf);

    match state.clients.find_by_cpf(&cpf).await {
        Ok(client) => Ok(Json(client.into())),
        Err(Error::NotFound) => {
            tracing::warn!("Erro ao buscar cliente com cpf '{}', {}", cpf, NOT_FOUND_MSG);
            Err(ApiError::not_found(NOT_FOUND_MSG))
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to look up client {}", cpf);
            Err(ApiError::internal(QUERY_FAILED_MSG))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/deletar_cliente",
    tag = "Cliente",
    params(CpfQuery),
    responses(
        (status = 200, description = "Cliente removido", body = ClientAck),
        (status = 400, description = "CPF ou parâmetros inválidos", body = ErrorBody),
        (status = 404, description = "Cliente não encontrado", body = ErrorBody)
    )
)]
pub async fn delete_client(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<CpfQuery>,
) -> Result<Json<ClientAck>, ApiError> {
    let cpf = parse_cpf(&query.cpf)?;
    tracing::debug!("Deletando dados sobre cliente #{}", cpf);

    match state.clients.delete_by_cpf(&cpf).await {
        Ok(_) => {
            tracing::debug!("Deletado cliente #{}", cpf);
            Ok(Json(ClientAck {
                message: REMOVED_MSG.to_string(),
                cpf: cpf.into_inner(),
            }))
        }
        Err(Error::NotFound) => {
            tracing::warn!("Erro ao deletar cliente #'{}', {}", cpf, NOT_FOUND_MSG);
            Err(ApiError::not_found(NOT_FOUND_MSG))
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to delete client {}", cpf);
            Err(ApiError::internal(QUERY_FAILED_MSG))
        }
    }
}

/// Overwrite email, name and age of the client holding the given CPF
#[utoipa::path(
    put,
    path = "/atualizar_cliente",
    tag = "Cliente",
    params(UpdateQuery),
    responses(
        (status = 200, description = "Cliente atualizado", body = ClientAck),
        (status = 400, description = "CPF ou parâmetros inválidos", body = ErrorBody),
        (status = 404, description = "Cliente não encontrado", body = ErrorBody),
        (status = 500, description = "Falha ao atualizar", body = ErrorBody)
    )
)]
pub async fn update_client(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<UpdateQuery>,
) -> Result<Json<ClientAck>, ApiError> {
    let cpf = parse_cpf(&query.cpf)?;
    let changes = ClientChanges {
        email: query.email,
        name: query.nome,
        age: query.idade,
    };

    match state.clients.update_by_cpf(&cpf, &changes).await {
        Ok(_) => Ok(Json(ClientAck {
            message: UPDATED_MSG.to_string(),
            cpf: cpf.into_inner(),
        })),
        Err(Error::NotFound) => {
            tracing::warn!("Erro ao buscar cliente com CPF '{}', {}", cpf, NOT_FOUND_MSG);
            Err(ApiError::not_found(UPDATE_NOT_FOUND_MSG))
        }
        Err(e) => {
            tracing::error!("Erro ao atualizar dados do cliente: {}", e);
            Err(ApiError::internal(UPDATE_FAILED_MSG))
        }
    }
}
