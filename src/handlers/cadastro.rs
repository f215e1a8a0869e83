use axum::{Json, extract::State};

use crate::db::models::NewIdealizador;
use crate::router::AppState;
use crate::types::api::{LoginRequest, MessageResponse};
use crate::IdealizaError;

/// GET /
pub async fn home() -> Json<MessageResponse> {
    Json(MessageResponse::new("API de Cadastro funcionando"))
}

/// POST /cadastro
pub async fn cadastrar(
    State(state): State<AppState>,
    Json(idealizador): Json<NewIdealizador>,
) -> Result<Json<MessageResponse>, IdealizaError> {
    let id = state.service.register(idealizador).await?;
    Ok(Json(MessageResponse::with_id(
        "Idealizador cadastrado com sucesso!",
        id,
    )))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(credenciais): Json<LoginRequest>,
) -> Result<Json<MessageResponse>, IdealizaError> {
    let outcome = state
        .service
        .login(&credenciais.email, &credenciais.senha)
        .await?;
    Ok(Json(MessageResponse::with_id(
        format!("Bem-vindo {}!", outcome.nome),
        outcome.id,
    )))
}
