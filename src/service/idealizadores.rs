use crate::db::models::{NewIdealizador, Profile, ProfileUpdate};
use crate::db::sqlite::IdealizadoresStorage;
use crate::error::IdealizaError;
use crate::service::credentials::CredentialHasher;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Identity returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub id: i64,
    pub nome: String,
}

/// Registration, login and profile/skill management on top of the storage.
#[derive(Clone)]
pub struct IdealizadorService {
    storage: IdealizadoresStorage,
    hasher: Arc<dyn CredentialHasher>,
}

impl IdealizadorService {
    pub fn new(storage: IdealizadoresStorage, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { storage, hasher }
    }

    pub fn storage(&self) -> &IdealizadoresStorage {
        &self.storage
    }

    /// Hash the password and insert the row. Returns the new id.
    pub async fn register(&self, new: NewIdealizador) -> Result<i64, IdealizaError> {
        let senha_hash = self.hash_off_thread(new.senha.clone()).await?;
        let id = self.storage.insert(&new, &senha_hash).await?;
        info!(id, "idealizador registered");
        Ok(id)
    }

    pub async fn login(&self, email: &str, senha: &str) -> Result<LoginOutcome, IdealizaError> {
        let Some(row) = self.storage.find_login_by_email(email).await? else {
            return Err(IdealizaError::NotFound("Usuário não encontrado"));
        };

        if !self.verify_off_thread(senha.to_string(), row.senha).await? {
            debug!(id = row.id, "login rejected: password mismatch");
            return Err(IdealizaError::WrongPassword);
        }

        Ok(LoginOutcome {
            id: row.id,
            nome: row.nome.unwrap_or_default(),
        })
    }

    pub async fn get_profile(&self, id: i64) -> Result<Profile, IdealizaError> {
        let (row, habilidades) = self
            .storage
            .get_with_habilidades(id)
            .await?
            .ok_or(IdealizaError::NotFound("Perfil não encontrado"))?;
        Ok(row.into_profile(habilidades))
    }

    /// Apply only the fields present in `update`. An empty update runs no statement.
    pub async fn update_profile(&self, id: i64, update: ProfileUpdate) -> Result<(), IdealizaError> {
        if update.is_empty() {
            return Err(IdealizaError::EmptyUpdate);
        }
        let affected = self.storage.update_fields(id, update.assignments()).await?;
        if affected == 0 {
            warn!(id, "profile update matched no idealizador");
        }
        Ok(())
    }

    /// Dedicated password change: the current password must verify first.
    pub async fn change_password(
        &self,
        id: i64,
        senha_atual: &str,
        nova_senha: &str,
    ) -> Result<(), IdealizaError> {
        let Some(row) = self.storage.find_login_by_id(id).await? else {
            return Err(IdealizaError::NotFound("Usuário não encontrado."));
        };
        if !self.verify_off_thread(senha_atual.to_string(), row.senha).await? {
            return Err(IdealizaError::WrongPassword);
        }

        let senha_hash = self.hash_off_thread(nova_senha.to_string()).await?;
        self.storage.set_senha(id, &senha_hash).await?;
        info!(id, "password changed");
        Ok(())
    }

    pub async fn list_habilidades(&self, id: i64) -> Result<Vec<String>, IdealizaError> {
        self.storage.list_habilidades(id).await
    }

    pub async fn replace_habilidades(
        &self,
        id: i64,
        habilidades: Vec<String>,
    ) -> Result<(), IdealizaError> {
        self.storage.replace_habilidades(id, &habilidades).await
    }

    pub async fn delete_profile(&self, id: i64) -> Result<(), IdealizaError> {
        let removed = self.storage.delete_cascade(id).await?;
        info!(id, habilidades = removed, "idealizador deleted");
        Ok(())
    }

    // bcrypt blocks for the whole work factor; run it on the blocking pool
    async fn hash_off_thread(&self, plaintext: String) -> Result<Vec<u8>, IdealizaError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await?
    }

    async fn verify_off_thread(&self, plaintext: String, hash: Vec<u8>) -> Result<bool, IdealizaError> {
        let hasher = self.hasher.clone();
        Ok(tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash)).await?)
    }
}
