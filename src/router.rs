use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::sqlite::IdealizadoresStorage;
use crate::handlers::{cadastro, habilidades, perfil};
use crate::service::{CredentialHasher, IdealizadorService};

#[derive(Clone)]
pub struct AppState {
    pub service: IdealizadorService,
}

impl AppState {
    pub fn new(storage: IdealizadoresStorage, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            service: IdealizadorService::new(storage, hasher),
        }
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(cadastro::home))
        .route("/cadastro", post(cadastro::cadastrar))
        .route("/login", post(cadastro::login))
        .route(
            "/perfil/{id}",
            get(perfil::obter_perfil)
                .put(perfil::atualizar_perfil)
                .delete(perfil::excluir_perfil),
        )
        .route("/perfil/{id}/senha", put(perfil::alterar_senha))
        .route(
            "/habilidades/{id}",
            get(habilidades::listar_habilidades).post(habilidades::salvar_habilidades),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
