//! Adaptadores de entrada e saída do rotulador em lote.
//!
//! - entrada: exportação tabulada (TSV com cabeçalho, opcionalmente `.gz`) da tabela de eventos;
//! - controle: log de ids já processados, um por linha;
//! - saída: uma linha JSON por evento rotulado.

use std::collections::{HashMap, HashSet};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use event_ner_core::{Event, RawEventRow};
use flate2::read::GzDecoder;
use serde::Serialize;

pub const ID_COLUMN: &str = "pk_event_dim";
const TITLE_COLUMNS: [&str; 6] = ["title1", "title2", "title3", "title4", "title5", "title6"];

/// Abre a exportação, descompactando quando o nome termina em `.gz`.
fn open_export(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("falha ao abrir {}", path.display()))?;
    let gzipped = path.extension().map(|ext| ext == "gz").unwrap_or(false);
    if gzipped {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Lê a exportação TSV (ou `.tsv.gz`). Campos entre aspas podem conter tabs e quebras de
/// linha. Colunas são achadas pelo cabeçalho; só o id é obrigatório.
pub fn read_rows(path: &Path) -> Result<Vec<RawEventRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(open_export(path)?);

    let headers = reader
        .headers()
        .with_context(|| format!("falha ao ler o cabeçalho de {}", path.display()))?
        .clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    let columns: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim(), i))
        .collect();
    let Some(&id_at) = columns.get(ID_COLUMN) else {
        bail!("{}: coluna '{ID_COLUMN}' ausente no cabeçalho", path.display());
    };

    let mut rows = Vec::new();
    for (n, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("{}: registro {} inválido", path.display(), n + 1))?;
        let cell = |name: &str| -> Option<String> {
            columns
                .get(name)
                .and_then(|&i| record.get(i))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let id = record.get(id_at).map(str::trim).unwrap_or_default();
        if id.is_empty() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            tracing::warn!(line, "linha sem id ignorada");
            continue;
        }
        rows.push(RawEventRow {
            id: id.to_string(),
            performance_time: cell("performance_time"),
            primary_show_desc: cell("primary_show_desc"),
            title_who: cell("title_who"),
            title_where: cell("title_where"),
            title_when: cell("title_when"),
            titles: TITLE_COLUMNS.iter().filter_map(|c| cell(c)).collect(),
        });
    }
    Ok(rows)
}

/// Ids de eventos já rotulados em execuções anteriores.
pub struct ProcessedLog {
    path: PathBuf,
    ids: HashSet<String>,
}

impl ProcessedLog {
    /// Arquivo ausente equivale a log vazio.
    pub fn open(path: &Path) -> Result<Self> {
        let ids = if path.is_file() {
            std::fs::read_to_string(path)
                .with_context(|| format!("falha ao ler {}", path.display()))?
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()
        } else {
            HashSet::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            ids,
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Acrescenta ao arquivo os ids ainda não registrados. Devolve quantos eram novos.
    pub fn record<'a, I>(&mut self, ids: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fresh: Vec<&str> = ids.into_iter().filter(|id| self.ids.insert(id.to_string())).collect();
        if fresh.is_empty() {
            return Ok(0);
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("falha ao abrir {}", self.path.display()))?;
        let mut out = BufWriter::new(file);
        for id in &fresh {
            writeln!(out, "{id}")?;
        }
        out.flush()?;
        Ok(fresh.len())
    }
}

#[derive(Serialize)]
struct LabelledRecord<'a> {
    #[serde(flatten)]
    event: &'a Event,
    labelled_at: DateTime<Utc>,
}

/// Grava os eventos como JSON lines, sobrescrevendo `path`.
pub fn write_events(path: &Path, events: &[Event]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("falha ao criar {}", path.display()))?;
    let mut out = BufWriter::new(file);
    let labelled_at = Utc::now();
    for event in events {
        serde_json::to_writer(&mut out, &LabelledRecord { event, labelled_at })?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_ner_core::LabelMap;

    #[test]
    fn test_read_rows_by_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.tsv");
        std::fs::write(
            &path,
            "pk_event_dim\tprimary_show_desc\tperformance_time\ttitle_who\ttitle1\ttitle2\n\
             7\tSydney FC v Brisbane Roar\t2012-03-24 19:30:00\t\tRound 3\t\n\
             \tno id\t\t\t\t\n\
             \n\
             8\tKaskade\t\tLive Nation\t\tencore\n",
        )
        .unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "7");
        assert_eq!(rows[0].title_who, None);
        assert_eq!(rows[0].titles, vec!["Round 3"]);
        assert_eq!(rows[0].performance_time.as_deref(), Some("2012-03-24 19:30:00"));
        assert_eq!(rows[1].description(), "Kaskade Live Nation encore");
    }

    #[test]
    fn test_read_rows_quoted_fields_span_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.tsv");
        std::fs::write(
            &path,
            "\tpk_event_dim\tprimary_show_desc\n0\t1\t\"Kaskade\nLive\"\n1\t2\tCircus Oz\n",
        )
        .unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "1");
        assert_eq!(rows[0].primary_show_desc.as_deref(), Some("Kaskade\nLive"));
        assert_eq!(rows[1].id, "2");
        assert_eq!(rows[1].primary_show_desc.as_deref(), Some("Circus Oz"));
    }

    #[test]
    fn test_read_rows_gzip_export() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.tsv.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder
            .write_all(b"pk_event_dim\tprimary_show_desc\n7\tSydney FC v Brisbane Roar\n")
            .unwrap();
        encoder.finish().unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "7");
        assert_eq!(rows[0].description(), "Sydney FC v Brisbane Roar");
    }

    #[test]
    fn test_read_rows_requires_id_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.tsv");
        std::fs::write(&path, "primary_show_desc\nKaskade\n").unwrap();
        assert!(read_rows(&path).is_err());
    }

    #[test]
    fn test_processed_log_appends_only_new_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old_events.txt");

        let mut log = ProcessedLog::open(&path).unwrap();
        assert_eq!(log.len(), 0);
        assert_eq!(log.record(["1", "2"]).unwrap(), 2);
        assert_eq!(log.record(["2", "3"]).unwrap(), 1);

        let reopened = ProcessedLog::open(&path).unwrap();
        assert_eq!(reopened.len(), 3);
        assert!(reopened.contains("3"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1\n2\n3\n");
    }

    #[test]
    fn test_write_events_as_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labelled.jsonl");
        let event = Event {
            id: "9".into(),
            timestamp: None,
            description: "Circus Oz".into(),
            labels: LabelMap::new(),
            entertainment_type: None,
            slot: None,
        };
        write_events(&path, &[event.clone(), event]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["id"], "9");
        assert!(value["labelled_at"].is_string());
    }
}
