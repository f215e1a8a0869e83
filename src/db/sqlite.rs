use crate::db::models::{IdealizadorRow, LoginRow, NewIdealizador};
use crate::db::schema::SQLITE_INIT;
use crate::error::IdealizaError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, QueryBuilder, Sqlite};
use std::str::FromStr;
use tracing::debug;

pub type SqlitePool = Pool<Sqlite>;

const SELECT_PROFILE: &str = r#"SELECT id, nome, telefone, email, github, linkedin,
    funcao, pais, cidade, sobre_mim
    FROM idealizadores WHERE id = ?"#;

const SELECT_HABILIDADES: &str =
    "SELECT nome FROM habilidades WHERE idealizador_id = ? ORDER BY id";

const DELETE_HABILIDADES: &str = "DELETE FROM habilidades WHERE idealizador_id = ?";

/// Write transactions take the RESERVED lock up front so a concurrent writer
/// makes them wait on the busy timeout instead of failing on lock upgrade.
const BEGIN_IMMEDIATE: &str = "BEGIN IMMEDIATE";

/// Open (creating if missing) the SQLite database behind `database_url`.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, IdealizaError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(connect_opts)
        .await?;
    Ok(pool)
}

#[derive(Clone)]
pub struct IdealizadoresStorage {
    pool: SqlitePool,
}

impl IdealizadoresStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL. Idempotent.
    pub async fn init_schema(&self) -> Result<(), IdealizaError> {
        // sqlx::query runs a single statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a new idealizador. Returns the row id.
    /// A duplicate email fails with `EmailConflict` and leaves the table untouched.
    pub async fn insert(
        &self,
        new: &NewIdealizador,
        senha_hash: &[u8],
    ) -> Result<i64, IdealizaError> {
        let result = sqlx::query(
            r#"
            INSERT INTO idealizadores (
                nome, telefone, email, senha, github,
                linkedin, funcao, pais, cidade, sobre_mim
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.nome)
        .bind(&new.telefone)
        .bind(&new.email)
        .bind(senha_hash)
        .bind(&new.github)
        .bind(&new.linkedin)
        .bind(&new.funcao)
        .bind(&new.pais)
        .bind(&new.cidade)
        .bind(&new.sobre_mim)
        .execute(&self.pool)
        .await
        .map_err(IdealizaError::from_write)?;
        Ok(result.last_insert_rowid())
    }

    pub async fn find_login_by_email(&self, email: &str) -> Result<Option<LoginRow>, IdealizaError> {
        let row = sqlx::query_as::<_, LoginRow>(
            "SELECT id, nome, senha FROM idealizadores WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_login_by_id(&self, id: i64) -> Result<Option<LoginRow>, IdealizaError> {
        let row = sqlx::query_as::<_, LoginRow>(
            "SELECT id, nome, senha FROM idealizadores WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Profile row plus its skills, read over one connection.
    pub async fn get_with_habilidades(
        &self,
        id: i64,
    ) -> Result<Option<(IdealizadorRow, Vec<String>)>, IdealizaError> {
        let mut conn = self.pool.acquire().await?;

        let Some(row) = sqlx::query_as::<_, IdealizadorRow>(SELECT_PROFILE)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
        else {
            return Ok(None);
        };

        let habilidades: Vec<String> = sqlx::query_scalar(SELECT_HABILIDADES)
            .bind(id)
            .fetch_all(&mut *conn)
            .await?;
        Ok(Some((row, habilidades)))
    }

    /// Apply `assignments` as a single `UPDATE ... WHERE id = ?`. Returns rows affected.
    /// Column names come from `ProfileUpdate::assignments`, never from input.
    pub async fn update_fields(
        &self,
        id: i64,
        assignments: Vec<(&'static str, String)>,
    ) -> Result<u64, IdealizaError> {
        if assignments.is_empty() {
            return Err(IdealizaError::EmptyUpdate);
        }

        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE idealizadores SET ");
        let mut set = qb.separated(", ");
        for (column, value) in assignments {
            set.push(column)
                .push_unseparated(" = ")
                .push_bind_unseparated(value);
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(IdealizaError::from_write)?;
        Ok(result.rows_affected())
    }

    pub async fn set_senha(&self, id: i64, senha_hash: &[u8]) -> Result<u64, IdealizaError> {
        let result = sqlx::query("UPDATE idealizadores SET senha = ? WHERE id = ?")
            .bind(senha_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Skill names in insertion order. An unknown id yields an empty list.
    pub async fn list_habilidades(&self, id: i64) -> Result<Vec<String>, IdealizaError> {
        let habilidades = sqlx::query_scalar(SELECT_HABILIDADES)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(habilidades)
    }

    /// Replace the whole skill set of `id` in one transaction.
    pub async fn replace_habilidades(
        &self,
        id: i64,
        habilidades: &[String],
    ) -> Result<(), IdealizaError> {
        let fail = |source| IdealizaError::Transaction {
            context: "Erro ao salvar habilidades",
            source,
        };

        let mut tx = self.pool.begin_with(BEGIN_IMMEDIATE).await.map_err(fail)?;

        let removed = sqlx::query(DELETE_HABILIDADES)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(fail)?
            .rows_affected();

        for nome in habilidades {
            sqlx::query("INSERT INTO habilidades (idealizador_id, nome) VALUES (?, ?)")
                .bind(id)
                .bind(nome)
                .execute(&mut *tx)
                .await
                .map_err(fail)?;
        }

        tx.commit().await.map_err(fail)?;
        debug!(id, removed, inserted = habilidades.len(), "habilidades replaced");
        Ok(())
    }

    /// Delete the idealizador and every skill it owns, all-or-nothing.
    /// Returns the number of skills removed.
    pub async fn delete_cascade(&self, id: i64) -> Result<u64, IdealizaError> {
        let fail = |source| IdealizaError::Transaction {
            context: "Erro ao excluir perfil",
            source,
        };

        let mut tx = self.pool.begin_with(BEGIN_IMMEDIATE).await.map_err(fail)?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM idealizadores WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(fail)?;
        if exists.is_none() {
            return Err(IdealizaError::NotFound("Usuário não encontrado."));
        }

        // an early return drops `tx`, which rolls it back
        let removed = sqlx::query(DELETE_HABILIDADES)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(fail)?
            .rows_affected();

        sqlx::query("DELETE FROM idealizadores WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(fail)?;

        tx.commit().await.map_err(fail)?;
        Ok(removed)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    /// Single-connection in-memory database with the schema applied.
    pub(crate) async fn memory_storage() -> IdealizadoresStorage {
        let storage = IdealizadoresStorage::new(
            connect("sqlite::memory:", 1)
                .await
                .expect("failed to open in-memory sqlite"),
        );
        storage.init_schema().await.expect("schema init failed");
        storage
    }

    fn new_idealizador(email: &str) -> NewIdealizador {
        NewIdealizador {
            nome: "Ana".to_string(),
            telefone: Some("81 99999-0000".to_string()),
            email: email.to_string(),
            senha: "unused".to_string(),
            github: None,
            linkedin: None,
            funcao: Some("dev".to_string()),
            pais: Some("Brasil".to_string()),
            cidade: Some("Recife".to_string()),
            sobre_mim: None,
        }
    }

    #[tokio::test]
    async fn init_schema_is_idempotent() {
        let storage = memory_storage().await;
        storage.init_schema().await.expect("second init must be a no-op");
        storage.init_schema().await.expect("third init must be a no-op");
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict_and_keeps_first_row() {
        let storage = memory_storage().await;
        let id = storage
            .insert(&new_idealizador("a@x.com"), b"hash-1")
            .await
            .unwrap();

        let mut second = new_idealizador("a@x.com");
        second.nome = "Outro".to_string();
        let err = storage.insert(&second, b"hash-2").await.unwrap_err();
        assert!(matches!(err, IdealizaError::EmailConflict));

        let row = storage.find_login_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.nome.as_deref(), Some("Ana"));
        assert_eq!(row.senha, b"hash-1");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM idealizadores")
            .fetch_one(storage.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn update_fields_touches_only_given_columns() {
        let storage = memory_storage().await;
        let id = storage
            .insert(&new_idealizador("a@x.com"), b"hash")
            .await
            .unwrap();

        let affected = storage
            .update_fields(id, vec![("cidade", "Olinda".to_string())])
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let (row, _) = storage.get_with_habilidades(id).await.unwrap().unwrap();
        assert_eq!(row.cidade.as_deref(), Some("Olinda"));
        assert_eq!(row.nome.as_deref(), Some("Ana"));
        assert_eq!(row.pais.as_deref(), Some("Brasil"));
        assert_eq!(row.telefone.as_deref(), Some("81 99999-0000"));
    }

    #[tokio::test]
    async fn update_fields_rejects_empty_assignment_list() {
        let storage = memory_storage().await;
        let err = storage.update_fields(1, Vec::new()).await.unwrap_err();
        assert!(matches!(err, IdealizaError::EmptyUpdate));
    }

    #[tokio::test]
    async fn email_update_onto_taken_address_is_conflict() {
        let storage = memory_storage().await;
        storage
            .insert(&new_idealizador("a@x.com"), b"hash")
            .await
            .unwrap();
        let b = storage
            .insert(&new_idealizador("b@x.com"), b"hash")
            .await
            .unwrap();

        let err = storage
            .update_fields(b, vec![("email", "a@x.com".to_string())])
            .await
            .unwrap_err();
        assert!(matches!(err, IdealizaError::EmailConflict));
    }

    #[tokio::test]
    async fn replace_habilidades_swaps_whole_set_and_keeps_duplicates() {
        let storage = memory_storage().await;
        storage
            .replace_habilidades(1, &["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        storage.replace_habilidades(1, &["c".to_string()]).await.unwrap();
        assert_eq!(storage.list_habilidades(1).await.unwrap(), vec!["c"]);

        let dup = vec!["rust".to_string(), "sql".to_string(), "rust".to_string()];
        storage.replace_habilidades(1, &dup).await.unwrap();
        assert_eq!(storage.list_habilidades(1).await.unwrap(), dup);
    }

    #[tokio::test]
    async fn delete_cascade_removes_skills_with_owner() {
        let storage = memory_storage().await;
        let id = storage
            .insert(&new_idealizador("a@x.com"), b"hash")
            .await
            .unwrap();
        let other = storage
            .insert(&new_idealizador("b@x.com"), b"hash")
            .await
            .unwrap();
        storage
            .replace_habilidades(id, &["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        storage
            .replace_habilidades(other, &["z".to_string()])
            .await
            .unwrap();

        assert_eq!(storage.delete_cascade(id).await.unwrap(), 2);
        assert!(storage.list_habilidades(id).await.unwrap().is_empty());
        assert!(storage.get_with_habilidades(id).await.unwrap().is_none());
        assert_eq!(storage.list_habilidades(other).await.unwrap(), vec!["z"]);

        let err = storage.delete_cascade(id).await.unwrap_err();
        assert!(matches!(err, IdealizaError::NotFound(_)));
    }

    async fn abort_inserts_named_boom(storage: &IdealizadoresStorage) {
        sqlx::query(
            r#"CREATE TRIGGER habilidades_abort BEFORE INSERT ON habilidades
               WHEN NEW.nome = 'boom'
               BEGIN SELECT RAISE(ABORT, 'boom'); END"#,
        )
        .execute(storage.pool())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn failed_replace_keeps_previous_set() {
        let storage = memory_storage().await;
        storage
            .replace_habilidades(1, &["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        abort_inserts_named_boom(&storage).await;

        let err = storage
            .replace_habilidades(1, &["c".to_string(), "boom".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert!(err.to_string().starts_with("Erro ao salvar habilidades"));

        assert_eq!(storage.list_habilidades(1).await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn failed_delete_rolls_back_skill_removal() {
        let storage = memory_storage().await;
        let id = storage
            .insert(&new_idealizador("a@x.com"), b"hash")
            .await
            .unwrap();
        storage
            .replace_habilidades(id, &["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        sqlx::query(
            r#"CREATE TRIGGER idealizadores_abort BEFORE DELETE ON idealizadores
               BEGIN SELECT RAISE(ABORT, 'locked'); END"#,
        )
        .execute(storage.pool())
        .await
        .unwrap();

        let err = storage.delete_cascade(id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert!(err.to_string().starts_with("Erro ao excluir perfil"));

        assert_eq!(storage.list_habilidades(id).await.unwrap(), vec!["a", "b"]);
        assert!(storage.get_with_habilidades(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_lookup_failure_carries_context() {
        let storage = memory_storage().await;
        sqlx::query("DROP TABLE idealizadores")
            .execute(storage.pool())
            .await
            .unwrap();

        let err = storage.delete_cascade(1).await.unwrap_err();
        assert!(matches!(
            err,
            IdealizaError::Transaction {
                context: "Erro ao excluir perfil",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn delete_waits_for_concurrent_writer() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut db_path = std::env::temp_dir();
        db_path.push(format!(
            "idealiza-lock-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));

        let pool = connect(&format!("sqlite:{}", db_path.display()), 2)
            .await
            .expect("failed to open sqlite file");
        let storage = IdealizadoresStorage::new(pool);
        storage.init_schema().await.unwrap();
        let id = storage
            .insert(&new_idealizador("a@x.com"), b"hash")
            .await
            .unwrap();
        storage
            .replace_habilidades(id, &["a".to_string()])
            .await
            .unwrap();

        // hold the write lock from another connection
        let mut writer = storage.pool().begin().await.unwrap();
        sqlx::query("INSERT INTO habilidades (idealizador_id, nome) VALUES (999, 'x')")
            .execute(&mut *writer)
            .await
            .unwrap();

        let deleting = {
            let storage = storage.clone();
            tokio::spawn(async move { storage.delete_cascade(id).await })
        };
        tokio::time::sleep(Duration::from_millis(200)).await;
        writer.commit().await.unwrap();

        assert_eq!(deleting.await.unwrap().unwrap(), 1);
        assert!(storage.get_with_habilidades(id).await.unwrap().is_none());
        assert_eq!(storage.list_habilidades(999).await.unwrap(), vec!["x"]);

        storage.pool().close().await;
        let _ = std::fs::remove_file(&db_path);
    }
}
