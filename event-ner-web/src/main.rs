//! Servidor web Axum e rotulador em lote para o reconhecimento de entidades em eventos

mod server;
mod settings;
mod store;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use event_ner_core::{EventPipeline, KnowledgeLoader, RawEventRow};
use tracing::info;

use crate::server::AppState;
use crate::settings::Settings;
use crate::store::ProcessedLog;

#[derive(Parser)]
#[command(name = "event-ner", about = "Rótulos de entidades e tipo de entretenimento para eventos")]
struct Cli {
    /// Arquivo de configuração adicional (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Diretório de dados (sobrescreve a configuração)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sobe o servidor HTTP/WebSocket
    Serve {
        /// Endereço de escuta (ex: 0.0.0.0:3000)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Rotula uma exportação TSV de eventos e grava JSON lines
    Label {
        /// Exportação tabulada com cabeçalho (coluna pk_event_dim obrigatória)
        input: PathBuf,
        /// Arquivo de saída (.jsonl)
        #[arg(short, long, default_value = "labelled_events.jsonl")]
        output: PathBuf,
        /// Rotula também eventos já registrados no log de processados
        #[arg(long)]
        all: bool,
    },
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    info!(settings_loaded = ?settings, "configuração carregada");

    let loader = KnowledgeLoader::new(&settings.data_dir);
    let knowledge = loader
        .load_all()
        .with_context(|| format!("falha ao carregar {}", settings.data_dir.display()))?;
    let pipeline = EventPipeline::new(Arc::new(knowledge)).with_team_limits(settings.team_limits());

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            let state = Arc::new(AppState { pipeline });
            server::serve(state, &bind).await
        }
        Commands::Label { input, output, all } => {
            let processed_log = settings.processed_log.clone();
            tokio::task::spawn_blocking(move || label(&pipeline, &input, &output, &processed_log, all))
                .await
                .context("rotulagem interrompida")?
        }
    }
}

fn label(
    pipeline: &EventPipeline,
    input: &std::path::Path,
    output: &std::path::Path,
    processed_log: &std::path::Path,
    all: bool,
) -> Result<()> {
    let t0 = Instant::now();
    let mut log = ProcessedLog::open(processed_log)?;
    let rows = store::read_rows(input)?;
    let total = rows.len();

    let fresh: Vec<RawEventRow> = rows.into_iter().filter(|r| all || !log.contains(&r.id)).collect();
    info!(total, new = fresh.len(), already_processed = log.len(), "linhas lidas");

    let events = pipeline.label_batch(&fresh);
    store::write_events(output, &events)?;
    let recorded = log.record(events.iter().map(|e| e.id.as_str()))?;

    info!(
        labelled = events.len(),
        recorded,
        output = %output.display(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "rotulagem concluída"
    );
    Ok(())
}
