use axum::{
    Json,
    extract::{Path, State},
};

use crate::router::AppState;
use crate::types::api::{HabilidadesResponse, MessageResponse};
use crate::IdealizaError;

/// GET /habilidades/{id}
pub async fn listar_habilidades(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<HabilidadesResponse>, IdealizaError> {
    let habilidades = state.service.list_habilidades(id).await?;
    Ok(Json(HabilidadesResponse { habilidades }))
}

/// POST /habilidades/{id} with a bare JSON array body.
pub async fn salvar_habilidades(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(habilidades): Json<Vec<String>>,
) -> Result<Json<MessageResponse>, IdealizaError> {
    state.service.replace_habilidades(id, habilidades).await?;
    Ok(Json(MessageResponse::new(
        "Habilidades atualizadas com sucesso!",
    )))
}
