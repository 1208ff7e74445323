//! # Pipeline de Rotulagem: Orquestrador com Eventos Observáveis
//!
//! O pipeline coordena os módulos do motor (normalizador, busca no gazetteer, resolvedor
//! de times, ranqueador e classificador) e emite eventos em cada passo via um canal
//! (`mpsc`), permitindo que o servidor WebSocket transmita o progresso em tempo real.
//!
//! ## Fluxo
//!
//! ```text
//! descrição ─► Normalizador ─┬─► busca por categoria ─► ranqueador (artistas, países) ─┐
//!                            └─► resolvedor de times ───────────────────────────────────┴─► LabelMap ─► Classificador
//! ```
//!
//! Todo o conhecimento ([`Knowledge`]) é imutável e compartilhado via `Arc`, então
//! eventos diferentes podem ser rotulados em paralelo sem sincronização.

use std::collections::BTreeSet;
use std::sync::{mpsc, Arc};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::classifier::{classify, EntertainmentType};
use crate::event::{Event, LabelMap, PerformanceSlot, RawEventRow};
use crate::gazetteer::GazetteerIndex;
use crate::matcher::find_in_normalized;
use crate::normalizer::{normalize, normalize_artist_name, normalize_title, NormalizerKind};
use crate::ranker::{filter_countries, rank_artists, score_artists, ArtistCandidate, ReferenceSets};
use crate::spell::WordList;
use crate::teams::{team_candidates, TeamResolver, TeamResolverLimits};

/// Tudo o que o motor consulta: gazetteers, conjuntos de referência e dicionário.
///
/// Construído uma vez na inicialização e nunca mais alterado.
#[derive(Debug, Clone, Default)]
pub struct Knowledge {
    pub gazetteer: GazetteerIndex,
    pub references: ReferenceSets,
    pub dictionary: WordList,
}

impl Knowledge {
    pub fn new(gazetteer: GazetteerIndex, references: ReferenceSets, dictionary: WordList) -> Self {
        Self {
            gazetteer,
            references,
            dictionary,
        }
    }
}

/// Resultado da análise de uma descrição.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub labels: LabelMap,
    pub entertainment_type: Option<EntertainmentType>,
}

/// Eventos emitidos pelo pipeline durante o processamento.
///
/// Permitem que um cliente acompanhe cada decisão do motor, passo a passo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PipelineEvent {
    /// **Passo 1**: As três variantes normalizadas da descrição.
    Normalized {
        generic: Option<String>,
        artist: Option<String>,
        title: Option<String>,
    },
    /// **Passo 2** (por categoria): Frases do gazetteer encontradas no texto.
    CategoryMatched { category: Category, phrases: Vec<String> },
    /// Artistas avaliados e os que sobreviveram ao corte.
    ArtistsRanked {
        candidates: Vec<ArtistCandidate>,
        kept: Vec<String>,
    },
    /// Países antes e depois do filtro de códigos curtos.
    CountriesFiltered { matched: Vec<String>, kept: Vec<String> },
    /// **Passo 3**: Times resolvidos pela busca difusa.
    TeamsResolved { candidates: usize, teams: Vec<String> },
    /// **Passo 4**: Tipo de entretenimento atribuído.
    Classified { entertainment_type: Option<EntertainmentType> },
    /// **Fim**: Resultado consolidado.
    Done {
        labels: LabelMap,
        entertainment_type: Option<EntertainmentType>,
        processing_ms: u64,
    },
}

/// As variantes normalizadas de uma mesma descrição, calculadas uma única vez.
struct NormalizedViews {
    generic: Option<String>,
    artist: Option<String>,
    title: Option<String>,
}

impl NormalizedViews {
    fn of(description: &str) -> Self {
        Self {
            generic: normalize(description),
            artist: normalize_artist_name(description),
            title: normalize_title(description),
        }
    }

    fn for_kind(&self, kind: NormalizerKind) -> Option<&str> {
        match kind {
            NormalizerKind::Generic => self.generic.as_deref(),
            NormalizerKind::ArtistName => self.artist.as_deref(),
            NormalizerKind::Title => self.title.as_deref(),
        }
    }
}

/// Pipeline de rotulagem de eventos.
///
/// - **Síncrono**: [`EventPipeline::analyze`] para uma descrição.
/// - **Streaming**: [`EventPipeline::analyze_streaming`] para UIs reativas (via WebSocket).
/// - **Lote**: [`EventPipeline::label_batch`] rotula linhas em paralelo (rayon).
#[derive(Debug, Clone)]
pub struct EventPipeline {
    knowledge: Arc<Knowledge>,
    team_limits: TeamResolverLimits,
}

impl EventPipeline {
    pub fn new(knowledge: Arc<Knowledge>) -> Self {
        Self {
            knowledge,
            team_limits: TeamResolverLimits::default(),
        }
    }

    pub fn with_team_limits(mut self, limits: TeamResolverLimits) -> Self {
        self.team_limits = limits;
        self
    }

    pub fn knowledge(&self) -> &Knowledge {
        &self.knowledge
    }

    /// Processa a descrição de forma síncrona e retorna o resultado final.
    pub fn analyze(&self, description: &str) -> Analysis {
        self.run(description, &mut |_: PipelineEvent| {})
    }

    /// Executa o pipeline enviando eventos de progresso pelo canal `tx`.
    ///
    /// # Fluxo de Eventos
    /// 1. `Normalized`
    /// 2. `CategoryMatched` (loop), seguido de `ArtistsRanked` / `CountriesFiltered` quando couber
    /// 3. `TeamsResolved`, se houver gazetteer de times
    /// 4. `Classified`
    /// 5. `Done`
    ///
    /// Um receptor que desconecta no meio não interrompe o processamento.
    pub fn analyze_streaming(&self, description: &str, tx: mpsc::Sender<PipelineEvent>) -> Analysis {
        self.run(description, &mut |event: PipelineEvent| {
            let _ = tx.send(event);
        })
    }

    fn run(&self, description: &str, emit: &mut dyn FnMut(PipelineEvent)) -> Analysis {
        let start = Instant::now();
        let knowledge = &*self.knowledge;

        // === Passo 1: Normalização ===
        let views = NormalizedViews::of(description);
        emit(PipelineEvent::Normalized {
            generic: views.generic.clone(),
            artist: views.artist.clone(),
            title: views.title.clone(),
        });

        // === Passo 2: Busca por categoria ===
        let mut labels = LabelMap::new();
        for category in knowledge.gazetteer.categories() {
            if category == Category::Teams {
                continue;
            }
            let Some(text) = views.for_kind(category.normalizer_kind()) else {
                continue;
            };
            let found = match find_in_normalized(&knowledge.gazetteer, text, category) {
                Ok(Some(found)) => found,
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!(%category, error = %err, "busca ignorada");
                    continue;
                }
            };
            emit(PipelineEvent::CategoryMatched {
                category,
                phrases: found.iter().cloned().collect(),
            });

            match category {
                Category::Artists => {
                    let candidates =
                        score_artists(&found, &knowledge.references, &knowledge.dictionary);
                    let kept = rank_artists(&found, &knowledge.references, &knowledge.dictionary);
                    emit(PipelineEvent::ArtistsRanked {
                        candidates,
                        kept: kept.clone(),
                    });
                    labels.insert(category, kept);
                }
                Category::Countries => {
                    let kept = filter_countries(&found).unwrap_or_default();
                    emit(PipelineEvent::CountriesFiltered {
                        matched: found.into_iter().collect(),
                        kept: kept.clone(),
                    });
                    labels.insert(category, kept);
                }
                _ => labels.insert(category, found),
            }
        }

        // === Passo 3: Times (busca difusa) ===
        let team_text = views
            .generic
            .as_deref()
            .filter(|_| knowledge.gazetteer.contains_category(Category::Teams));
        if let Some(text) = team_text {
            let candidates = team_candidates(&knowledge.gazetteer);
            let resolver = TeamResolver::new(&knowledge.dictionary).with_limits(self.team_limits);
            let teams = resolver
                .find_teams(&candidates, text)
                .unwrap_or_else(BTreeSet::new);
            emit(PipelineEvent::TeamsResolved {
                candidates: candidates.len(),
                teams: teams.iter().cloned().collect(),
            });
            labels.insert(Category::Teams, teams);
        }

        // === Passo 4: Classificação ===
        let entertainment_type = classify(&labels, description);
        emit(PipelineEvent::Classified { entertainment_type });

        tracing::debug!(
            categories = labels.len(),
            kind = ?entertainment_type,
            elapsed_us = start.elapsed().as_micros() as u64,
            "descrição analisada"
        );

        emit(PipelineEvent::Done {
            labels: labels.clone(),
            entertainment_type,
            processing_ms: start.elapsed().as_millis() as u64,
        });

        Analysis {
            labels,
            entertainment_type,
        }
    }

    /// Rotula uma linha da fonte de dados.
    ///
    /// Timestamp ilegível não impede a rotulagem: o evento fica sem horário.
    pub fn label(&self, row: &RawEventRow) -> Event {
        let description = row.description();
        let timestamp = match row.timestamp() {
            Ok(ts) => ts,
            Err(err) => {
                tracing::warn!(id = %row.id, error = %err, "horário descartado");
                None
            }
        };
        let Analysis {
            labels,
            entertainment_type,
        } = self.analyze(&description);

        Event {
            id: row.id.clone(),
            slot: timestamp.as_ref().map(PerformanceSlot::from_timestamp),
            timestamp,
            description,
            labels,
            entertainment_type,
        }
    }

    /// Rotula várias linhas em paralelo, preservando a ordem de entrada.
    pub fn label_batch(&self, rows: &[RawEventRow]) -> Vec<Event> {
        let events: Vec<Event> = rows.par_iter().map(|row| self.label(row)).collect();
        tracing::info!(
            total = events.len(),
            typed = events.iter().filter(|e| e.entertainment_type.is_some()).count(),
            "lote rotulado"
        );
        events
    }
}
