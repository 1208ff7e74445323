//! # Carga do Conhecimento a partir de Disco
//!
//! Adaptador externo ao motor: lê os arquivos de dados uma única vez e devolve um
//! [`Knowledge`] imutável.
//!
//! ## Layout do diretório
//!
//! ```text
//! <dir>/
//! ├── gazetteers/<categoria>.{json,txt}
//! ├── reference/{popular_artists,award_winners,performed_in_australia,possibly_dead}.{json,txt}
//! └── words.txt
//! ```
//!
//! | Formato | Conteúdo                                                  |
//! |---------|-----------------------------------------------------------|
//! | `.txt`  | uma frase por linha; linhas vazias e `#...` são ignoradas |
//! | `.json` | array de frases, ou objeto letra → array de frases        |
//!
//! Arquivo ausente não é erro (a categoria simplesmente fica sem gazetteer, ou só com
//! o vocabulário embutido). Arquivo presente e malformado é.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::category::Category;
use crate::error::{EngineError, Result};
use crate::gazetteer::{CategoryIndex, GazetteerIndex};
use crate::pipeline::Knowledge;
use crate::ranker::ReferenceSets;
use crate::spell::WordList;

pub const GAZETTEER_DIR: &str = "gazetteers";
pub const REFERENCE_DIR: &str = "reference";
pub const DICTIONARY_FILE: &str = "words.txt";

/// Carrega gazetteers, conjuntos de referência e dicionário de um diretório.
pub struct KnowledgeLoader {
    data_dir: PathBuf,
}

impl KnowledgeLoader {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn load_all(&self) -> Result<Knowledge> {
        let gazetteer = self.load_gazetteer()?;
        let references = self.load_references()?;
        let dictionary = self.load_dictionary()?;
        tracing::info!(
            dir = %self.data_dir.display(),
            categories = gazetteer.categories().len(),
            phrases = gazetteer.len(),
            references = references.len(),
            words = dictionary.len(),
            "conhecimento carregado"
        );
        Ok(Knowledge::new(gazetteer, references, dictionary))
    }

    /// Um índice por categoria com arquivo (somado ao vocabulário embutido, se houver).
    pub fn load_gazetteer(&self) -> Result<GazetteerIndex> {
        let dir = self.data_dir.join(GAZETTEER_DIR);
        let mut index = GazetteerIndex::new();

        for category in Category::ALL {
            let builtins = category.builtin_phrases().iter().map(|s| s.to_string());
            let phrases: Vec<String> = match self.find_file(&dir, category.name()) {
                Some(path) => builtins.chain(read_phrases(&path)?).collect(),
                None if category.builtin_phrases().is_empty() => {
                    tracing::debug!(%category, "sem gazetteer");
                    continue;
                }
                None => builtins.collect(),
            };
            let cat_index = CategoryIndex::build(category, phrases);
            tracing::debug!(%category, phrases = cat_index.len(), "gazetteer indexado");
            index.insert(category, cat_index);
        }

        if !index.contains_category(Category::Artists) {
            tracing::warn!(dir = %dir.display(), "gazetteer de artistas ausente");
        }
        Ok(index)
    }

    pub fn load_references(&self) -> Result<ReferenceSets> {
        let dir = self.data_dir.join(REFERENCE_DIR);
        let load = |name: &str| -> Result<Vec<String>> {
            match self.find_file(&dir, name) {
                Some(path) => read_phrases(&path),
                None => {
                    tracing::warn!(set = name, dir = %dir.display(), "conjunto de referência ausente");
                    Ok(Vec::new())
                }
            }
        };

        Ok(ReferenceSets::new()
            .with_popular(load("popular_artists")?)
            .with_award_winners(load("award_winners")?)
            .with_performed_in_australia(load("performed_in_australia")?)
            .with_possibly_dead(load("possibly_dead")?))
    }

    /// Dicionário usado pela verificação ortográfica. Sem ele, toda palavra parece
    /// nome próprio, o que infla a pontuação dos artistas.
    pub fn load_dictionary(&self) -> Result<WordList> {
        let path = self.data_dir.join(DICTIONARY_FILE);
        if !path.is_file() {
            tracing::warn!(path = %path.display(), "dicionário ausente");
            return Ok(WordList::default());
        }
        Ok(WordList::from_lines(&read(&path)?))
    }

    /// `<dir>/<stem>.json` tem precedência sobre `<dir>/<stem>.txt`.
    fn find_file(&self, dir: &Path, stem: &str) -> Option<PathBuf> {
        ["json", "txt"]
            .iter()
            .map(|ext| dir.join(format!("{stem}.{ext}")))
            .find(|p| p.is_file())
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Lê as frases de um arquivo `.txt` ou `.json`.
pub fn read_phrases(path: &Path) -> Result<Vec<String>> {
    let content = read(path)?;
    let is_json = path.extension().map(|ext| ext == "json").unwrap_or(false);
    if is_json {
        let value: Value = serde_json::from_str(&content).map_err(|source| EngineError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        phrases_from_json(path, value)
    } else {
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect())
    }
}

fn phrases_from_json(path: &Path, value: Value) -> Result<Vec<String>> {
    let layout = |reason: String| EngineError::Layout {
        path: path.to_path_buf(),
        reason,
    };
    let list = |items: Vec<Value>, context: &str| -> Result<Vec<String>> {
        let mut phrases = Vec::new();
        for item in items {
            phrases.extend(item_phrases(item).map_err(|reason| layout(format!("{context}: {reason}")))?);
        }
        Ok(phrases)
    };

    match value {
        Value::Array(items) => list(items, "lista"),
        // Letra → itens. As chaves são descartadas: o índice reagrupa pela frase normalizada.
        Value::Object(buckets) => {
            let mut phrases = Vec::new();
            for (letter, items) in buckets {
                match items {
                    Value::Array(items) => phrases.extend(list(items, &format!("balde '{letter}'"))?),
                    _ => return Err(layout(format!("balde '{letter}' não é uma lista"))),
                }
            }
            Ok(phrases)
        }
        _ => Err(layout("esperava lista ou objeto de listas".to_string())),
    }
}

/// Frases de um item: texto puro ou registro com `name`.
///
/// Registros de países trazem ainda `other_names` e `abbr`, que também viram frases.
/// Os demais campos (`state`, `postcode`...) são ignorados.
fn item_phrases(item: Value) -> std::result::Result<Vec<String>, String> {
    let mut record = match item {
        Value::String(s) => return Ok(vec![s]),
        Value::Object(record) => record,
        other => return Err(format!("esperava texto ou registro, encontrou {other}")),
    };

    let mut phrases = match record.remove("name") {
        Some(Value::String(name)) => vec![name],
        _ => return Err("registro sem 'name' de texto".to_string()),
    };
    match record.remove("other_names") {
        None | Some(Value::Null) => {}
        Some(Value::Array(others)) => {
            for other in others {
                match other {
                    Value::String(s) => phrases.push(s),
                    other => return Err(format!("'other_names' esperava texto, encontrou {other}")),
                }
            }
        }
        Some(other) => return Err(format!("'other_names' não é uma lista: {other}")),
    }
    match record.remove("abbr") {
        None | Some(Value::Null) => {}
        Some(Value::String(abbr)) => phrases.push(abbr),
        Some(other) => return Err(format!("'abbr' esperava texto, encontrou {other}")),
    }
    Ok(phrases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn data_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let gaz = dir.path().join(GAZETTEER_DIR);
        let refs = dir.path().join(REFERENCE_DIR);
        fs::create_dir_all(&gaz).unwrap();
        fs::create_dir_all(&refs).unwrap();

        fs::write(gaz.join("artists.txt"), "# artistas\nKaskade\nThe Wiggles\n\nx\n").unwrap();
        fs::write(gaz.join("teams.json"), r#"["Sydney FC", "Melbourne Victory"]"#).unwrap();
        // Chave errada de propósito: "Mamma Mia!" deve ir para o balde "m"
        fs::write(gaz.join("musicals.json"), r#"{"x": ["Mamma Mia! (Revival)"], "c": ["Cats"]}"#).unwrap();
        fs::write(gaz.join("venue_types.txt"), "velodrome\n").unwrap();
        fs::write(refs.join("popular_artists.txt"), "The Wiggles\n").unwrap();
        fs::write(dir.path().join(DICTIONARY_FILE), "big\nshow\n").unwrap();
        dir
    }

    #[test]
    fn test_load_all() {
        let dir = data_dir();
        let knowledge = KnowledgeLoader::new(dir.path()).load_all().unwrap();

        let g = &knowledge.gazetteer;
        assert_eq!(g.bucket(Category::Artists, 'k'), &["kaskade"]);
        assert_eq!(g.bucket(Category::Artists, 'w'), &["wiggles"]);
        assert!(g.bucket(Category::Artists, 'x').is_empty());
        assert_eq!(g.bucket(Category::Teams, 's'), &["sydney fc"]);
        assert_eq!(g.bucket(Category::Musicals, 'm'), &["mamma mia"]);
        assert_eq!(g.bucket(Category::Musicals, 'c'), &["cats"]);
        assert!(!g.contains_category(Category::Boxers));

        assert!(knowledge.references.popular.contains("wiggles"));
        assert!(knowledge.references.award_winners.is_empty());
        assert_eq!(knowledge.dictionary.len(), 2);
    }

    #[test]
    fn test_builtins_are_merged_with_files() {
        let dir = data_dir();
        let g = KnowledgeLoader::new(dir.path()).load_gazetteer().unwrap();
        let v = g.bucket(Category::VenueTypes, 'v');
        assert!(v.contains(&"velodrome".to_string()));
        assert!(g.bucket(Category::VenueTypes, 's').contains(&"stadium".to_string()));
        // Sem arquivo, o vocabulário embutido continua disponível
        assert!(g.contains_category(Category::TournamentTypes));
    }

    #[test]
    fn test_missing_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let knowledge = KnowledgeLoader::new(dir.path().join("nada")).load_all().unwrap();
        assert!(!knowledge.gazetteer.contains_category(Category::Artists));
        assert!(knowledge.references.is_empty());
        assert!(knowledge.dictionary.is_empty());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let gaz = dir.path().join(GAZETTEER_DIR);
        fs::create_dir_all(&gaz).unwrap();
        fs::write(gaz.join("promoters.json"), "[\"Live Nation\"").unwrap();
        let err = KnowledgeLoader::new(dir.path()).load_gazetteer().unwrap_err();
        assert!(matches!(err, EngineError::Json { .. }));

        fs::write(gaz.join("promoters.json"), r#"{"l": "Live Nation"}"#).unwrap();
        let err = KnowledgeLoader::new(dir.path()).load_gazetteer().unwrap_err();
        assert!(matches!(err, EngineError::Layout { .. }));

        fs::write(gaz.join("promoters.json"), "[1, 2]").unwrap();
        let err = KnowledgeLoader::new(dir.path()).load_gazetteer().unwrap_err();
        assert!(matches!(err, EngineError::Layout { .. }));
    }

    #[test]
    fn test_bucketed_records() {
        let dir = tempfile::tempdir().unwrap();
        let gaz = dir.path().join(GAZETTEER_DIR);
        fs::create_dir_all(&gaz).unwrap();
        fs::write(
            gaz.join("suburbs.json"),
            r#"{"a": [{"name": "aarons pass", "state": "nsw", "postcode": 2850}],
                "b": [{"name": "Bondi Beach", "state": "nsw", "postcode": 2026}, "Balmain"]}"#,
        )
        .unwrap();
        let g = KnowledgeLoader::new(dir.path()).load_gazetteer().unwrap();
        assert_eq!(g.bucket(Category::Suburbs, 'a'), &["aarons pass"]);
        assert_eq!(g.bucket(Category::Suburbs, 'b'), &["balmain", "bondi beach"]);
    }

    #[test]
    fn test_country_records_with_other_names() {
        let dir = tempfile::tempdir().unwrap();
        let gaz = dir.path().join(GAZETTEER_DIR);
        fs::create_dir_all(&gaz).unwrap();
        fs::write(
            gaz.join("countries.json"),
            r#"[{"name": "New Zealand", "other_names": ["Aotearoa"], "abbr": "NZ"},
                {"name": "Afghanistan", "other_names": null, "abbr": "afg"}]"#,
        )
        .unwrap();
        let g = KnowledgeLoader::new(dir.path()).load_gazetteer().unwrap();
        assert!(g.bucket(Category::Countries, 'n').contains(&"new zealand".to_string()));
        assert!(g.bucket(Category::Countries, 'n').contains(&"nz".to_string()));
        assert_eq!(g.bucket(Category::Countries, 'a'), &["afg", "afghanistan", "aotearoa"]);

        fs::write(gaz.join("countries.json"), r#"[{"abbr": "nz"}]"#).unwrap();
        let err = KnowledgeLoader::new(dir.path()).load_gazetteer().unwrap_err();
        assert!(matches!(err, EngineError::Layout { .. }));
    }

    #[test]
    fn test_json_takes_precedence_over_txt() {
        let dir = tempfile::tempdir().unwrap();
        let gaz = dir.path().join(GAZETTEER_DIR);
        fs::create_dir_all(&gaz).unwrap();
        fs::write(gaz.join("circuses.txt"), "Circus Oz\n").unwrap();
        fs::write(gaz.join("circuses.json"), r#"["Cirque du Soleil"]"#).unwrap();
        let g = KnowledgeLoader::new(dir.path()).load_gazetteer().unwrap();
        assert_eq!(g.bucket(Category::Circuses, 'c'), &["cirque du soleil"]);
    }
}
