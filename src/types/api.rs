use serde::{Deserialize, Serialize};

/// `{"mensagem": ...}` plus an optional id.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub mensagem: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl MessageResponse {
    pub fn new(mensagem: impl Into<String>) -> Self {
        Self {
            mensagem: mensagem.into(),
            id: None,
        }
    }

    pub fn with_id(mensagem: impl Into<String>, id: i64) -> Self {
        Self {
            mensagem: mensagem.into(),
            id: Some(id),
        }
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub senha_atual: String,
    pub nova_senha: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabilidadesResponse {
    pub habilidades: Vec<String>,
}
