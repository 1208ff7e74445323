//! # Erros do motor de reconhecimento
//!
//! O núcleo é puro e quase nunca falha: normalização devolve `None`, buscas sem
//! resultado devolvem `None`. Os erros abaixo cobrem apenas violações de pré-condição
//! (categoria sem índice carregado) e a carga dos arquivos de dados.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A categoria pedida não tem gazetteer carregado. É erro de configuração.
    #[error("categoria sem gazetteer carregado: {0}")]
    UnsupportedCategory(String),

    #[error("falha ao ler {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON inválido em {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Formato JSON reconhecido, mas com estrutura inesperada.
    #[error("estrutura inesperada em {path}: {reason}")]
    Layout { path: PathBuf, reason: String },

    #[error("timestamp inválido '{value}': {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
