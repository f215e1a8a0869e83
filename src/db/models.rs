use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Registration payload. `senha` is plaintext here and only ever leaves this struct hashed.
#[derive(Clone, Deserialize)]
pub struct NewIdealizador {
    pub nome: String,
    #[serde(default)]
    pub telefone: Option<String>,
    pub email: String,
    pub senha: String,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub funcao: Option<String>,
    #[serde(default)]
    pub pais: Option<String>,
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub sobre_mim: Option<String>,
}

/// Row as stored, minus `senha`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct IdealizadorRow {
    pub id: i64,
    pub nome: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub funcao: Option<String>,
    pub pais: Option<String>,
    pub cidade: Option<String>,
    pub sobre_mim: Option<String>,
}

/// Columns needed to check a password.
#[derive(Clone, FromRow)]
pub struct LoginRow {
    pub id: i64,
    pub nome: Option<String>,
    pub senha: Vec<u8>,
}

/// Public profile: every text column flattened to `""` when unset, plus the skill list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: i64,
    pub nome: String,
    pub telefone: String,
    pub email: String,
    pub github: String,
    pub linkedin: String,
    pub funcao: String,
    pub pais: String,
    pub cidade: String,
    pub sobre_mim: String,
    pub habilidades: Vec<String>,
}

impl IdealizadorRow {
    pub fn into_profile(self, habilidades: Vec<String>) -> Profile {
        Profile {
            id: self.id,
            nome: self.nome.unwrap_or_default(),
            telefone: self.telefone.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            github: self.github.unwrap_or_default(),
            linkedin: self.linkedin.unwrap_or_default(),
            funcao: self.funcao.unwrap_or_default(),
            pais: self.pais.unwrap_or_default(),
            cidade: self.cidade.unwrap_or_default(),
            sobre_mim: self.sobre_mim.unwrap_or_default(),
            habilidades,
        }
    }
}

/// Sparse profile update. `None` (absent or JSON `null`) leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub nome: Option<String>,
    pub telefone: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub funcao: Option<String>,
    pub pais: Option<String>,
    pub cidade: Option<String>,
    pub sobre_mim: Option<String>,
    pub email: Option<String>,
}

impl ProfileUpdate {
    /// Column/value pairs for every present field, in a fixed column order.
    pub fn assignments(self) -> Vec<(&'static str, String)> {
        [
            ("nome", self.nome),
            ("telefone", self.telefone),
            ("github", self.github),
            ("linkedin", self.linkedin),
            ("funcao", self.funcao),
            ("pais", self.pais),
            ("cidade", self.cidade),
            ("sobre_mim", self.sobre_mim),
            ("email", self.email),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|v| (column, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nome.is_none()
            && self.telefone.is_none()
            && self.github.is_none()
            && self.linkedin.is_none()
            && self.funcao.is_none()
            && self.pais.is_none()
            && self.cidade.is_none()
            && self.sobre_mim.is_none()
            && self.email.is_none()
    }
}
