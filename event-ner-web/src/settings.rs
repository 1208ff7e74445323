//! Configuração em camadas: padrões → `event-ner.toml` (opcional) → arquivo passado
//! em `--config` → variáveis `EVENT_NER_*`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use event_ner_core::TeamResolverLimits;
use serde::Deserialize;

pub const ENV_PREFIX: &str = "EVENT_NER";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Diretório com `gazetteers/`, `reference/` e `words.txt`.
    pub data_dir: PathBuf,
    pub bind: String,
    /// Ids já processados, um por linha.
    pub processed_log: PathBuf,
    pub max_team_rounds: usize,
    pub max_team_candidates: usize,
}

impl Settings {
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let limits = TeamResolverLimits::default();
        let mut builder = Config::builder()
            .set_default("data_dir", "data")?
            .set_default("bind", "0.0.0.0:3000")?
            .set_default("processed_log", "old_events.txt")?
            .set_default("max_team_rounds", limits.max_rounds as u64)?
            .set_default("max_team_candidates", limits.max_candidates as u64)?
            .add_source(File::with_name("event-ner").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("falha ao montar a configuração")?
            .try_deserialize()
            .context("configuração inválida")
    }

    pub fn team_limits(&self) -> TeamResolverLimits {
        TeamResolverLimits {
            max_rounds: self.max_team_rounds,
            max_candidates: self.max_team_candidates,
        }
    }
}
