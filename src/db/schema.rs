//! SQL DDL for the two profile tables.

/// SQLite schema with:
/// - `idealizadores.email` UNIQUE (the only enforced constraint besides the PKs)
/// - `senha` stored as a BLOB holding the bcrypt modular-crypt string
/// - `habilidades.idealizador_id` referencing its owner by value only; no FOREIGN KEY,
///   cascading is done by the storage layer inside a transaction
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS idealizadores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nome TEXT,
    telefone TEXT,
    email TEXT NOT NULL UNIQUE,
    senha BLOB NOT NULL,
    github TEXT,
    linkedin TEXT,
    funcao TEXT,
    pais TEXT,
    cidade TEXT,
    sobre_mim TEXT
);

CREATE TABLE IF NOT EXISTS habilidades (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    idealizador_id INTEGER NOT NULL,
    nome TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_habilidades_idealizador_id ON habilidades(idealizador_id);
"#;
