//! # event-ner-core: Reconhecimento de Entidades em Descrições de Eventos
//!
//! Este crate extrai rótulos estruturados (artistas, times, países, locais, promotores...)
//! de descrições curtas e ruidosas de eventos de uma bilheteria, e classifica cada evento
//! por tipo de entretenimento. É um motor determinístico, guiado por regras e dicionários,
//! com tolerância difusa limitada.
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui em uma única direção:
//!
//! 1.  **Entrada**: Descrição bruta (String), montada a partir de uma [`RawEventRow`].
//! 2.  **Normalização** ([`normalizer`]): minúsculas, separadores, números por extenso, abreviações.
//! 3.  **Busca** ([`matcher`]): frases do [`GazetteerIndex`] presentes como palavras inteiras.
//! 4.  **Times** ([`teams`]): busca difusa multi-palavra, no máximo 2 times por partida.
//! 5.  **Ranqueamento** ([`ranker`]): top 3 artistas por pontuação; filtro de países curtos.
//! 6.  **Classificação** ([`classifier`]): regras ordenadas → tipo de entretenimento.
//! 7.  **Saída**: [`LabelMap`] + [`EntertainmentType`] dentro de um [`Event`].
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use std::sync::Arc;
//! use event_ner_core::{Category, EventPipeline, GazetteerIndex, Knowledge, ReferenceSets, WordList};
//!
//! // 1. Monta o conhecimento (normalmente via `KnowledgeLoader`)
//! let gazetteer = GazetteerIndex::with_builtins()
//!     .with_category(Category::Teams, ["Sydney FC", "Melbourne Victory"]);
//! let knowledge = Knowledge::new(gazetteer, ReferenceSets::new(), WordList::default());
//!
//! // 2. Analisa uma descrição
//! let pipeline = EventPipeline::new(Arc::new(knowledge));
//! let analysis = pipeline.analyze("Sydney FC vs Melbourne Victory at Allianz Stadium");
//!
//! assert_eq!(analysis.labels.get(Category::Teams).map(|t| t.len()), Some(2));
//! assert_eq!(analysis.entertainment_type.map(|t| t.tag()), Some("sport"));
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: Orquestrador que conecta todos os estágios e emite eventos observáveis.
//! - [`loader`]: Leitura dos gazetteers, conjuntos de referência e dicionário.
//! - [`event`]: Linhas da fonte de dados e eventos rotulados.

pub mod category;
pub mod classifier;
pub mod error;
pub mod event;
pub mod gazetteer;
pub mod loader;
pub mod matcher;
pub mod normalizer;
pub mod pipeline;
pub mod ranker;
pub mod spell;
pub mod teams;

pub use category::Category;
pub use classifier::{classify, EntertainmentType};
pub use error::{EngineError, Result};
pub use event::{Event, LabelMap, PartOfDay, PerformanceSlot, RawEventRow};
pub use gazetteer::{CategoryIndex, GazetteerIndex};
pub use loader::KnowledgeLoader;
pub use normalizer::{normalize, normalize_artist_name, normalize_title, NormalizerKind};
pub use pipeline::{Analysis, EventPipeline, Knowledge, PipelineEvent};
pub use ranker::{filter_countries, rank_artists, ArtistCandidate, ReferenceSets};
pub use spell::{SpellChecker, WordList};
pub use teams::{TeamResolver, TeamResolverLimits};
