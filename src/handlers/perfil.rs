use axum::{
    Json,
    extract::{Path, State},
};

use crate::db::models::{Profile, ProfileUpdate};
use crate::router::AppState;
use crate::types::api::{ChangePasswordRequest, MessageResponse};
use crate::IdealizaError;

/// GET /perfil/{id}
pub async fn obter_perfil(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Profile>, IdealizaError> {
    Ok(Json(state.service.get_profile(id).await?))
}

/// PUT /perfil/{id}
pub async fn atualizar_perfil(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dados): Json<ProfileUpdate>,
) -> Result<Json<MessageResponse>, IdealizaError> {
    state.service.update_profile(id, dados).await?;
    Ok(Json(MessageResponse::new("Perfil atualizado com sucesso!")))
}

/// PUT /perfil/{id}/senha
pub async fn alterar_senha(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, IdealizaError> {
    state
        .service
        .change_password(id, &req.senha_atual, &req.nova_senha)
        .await?;
    Ok(Json(MessageResponse::new("Senha alterada com sucesso!")))
}

/// DELETE /perfil/{id}
pub async fn excluir_perfil(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, IdealizaError> {
    state.service.delete_profile(id).await?;
    Ok(Json(MessageResponse::new(
        "Perfil e habilidades excluídos com sucesso!",
    )))
}
