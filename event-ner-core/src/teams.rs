//! # Resolvedor de Times (busca difusa multi-palavra)
//!
//! Partidas esportivas têm exatamente dois lados, mas as descrições citam os times de
//! forma irregular: com erros de digitação ("sydny fc"), pelo apelido ("swans") ou pela
//! sigla ("gws"). Este módulo encontra **no máximo 2** times no texto.
//!
//! ## Algoritmo (lista de trabalho explícita)
//!
//! O estado é `(candidatos, texto restante, encontrados)` e cada rodada faz:
//!
//! 1. `W` = maior número de palavras entre os candidatos. Se `W` não cabe no texto, a rodada
//!    pula direto para o passo 4 (uma sigla ou apelido ainda pode caber).
//! 2. Monta todas as janelas contíguas de `W` palavras do texto.
//! 3. Para a distância de edição `d = 0, 1, 2` (uma passada por nível):
//!    - `d == 0`: o candidato precisa ser igual a uma janela; o trecho casado é apagado do
//!      texto para não satisfazer outro candidato;
//!    - `d > 0`: a distância de Levenshtein até alguma janela precisa ser **exatamente** `d`
//!      (e menor que o comprimento da forma candidata).
//! 4. Com menos de 2 times e `W > 1`, os candidatos de `W` palavras são trocados por formas
//!    encurtadas: palavras fora do dicionário (nomes de 2 palavras) ou sub-combinações de
//!    `W − 1` palavras mais a sigla (nomes maiores).
//!
//! A busca exata vem primeiro para evitar falsos positivos; a tolerância cresce aos poucos.
//! O número de rodadas e a quantidade de formas geradas por rodada são limitados.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use crate::category::Category;
use crate::gazetteer::GazetteerIndex;
use crate::spell::SpellChecker;

/// Uma partida tem dois lados.
pub const MAX_TEAMS: usize = 2;
/// Maior distância de edição tolerada.
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Limites de segurança contra entradas patológicas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamResolverLimits {
    /// Número máximo de rodadas (cada rodada reduz `W` em pelo menos 1).
    pub max_rounds: usize,
    /// Máximo de formas encurtadas geradas em uma rodada.
    pub max_candidates: usize,
}

impl Default for TeamResolverLimits {
    fn default() -> Self {
        Self {
            max_rounds: 6,
            max_candidates: 4096,
        }
    }
}

/// Estado da lista de trabalho.
struct WorkList {
    /// forma candidata → nome completo do time de onde ela veio
    candidates: BTreeMap<String, String>,
    text: String,
    found: BTreeSet<String>,
}

impl WorkList {
    fn width(&self) -> usize {
        self.candidates.keys().map(|c| word_count(c)).max().unwrap_or(0)
    }

    fn is_done(&self) -> bool {
        self.found.len() >= MAX_TEAMS || self.candidates.is_empty()
    }

    /// Registra o time e descarta todas as formas que apontam para ele.
    fn accept(&mut self, team: String) {
        self.candidates.retain(|_, t| *t != team);
        self.found.insert(team);
    }
}

fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Janelas contíguas de `width` palavras.
fn windows(text: &str, width: usize) -> BTreeSet<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if width == 0 || words.len() < width {
        return BTreeSet::new();
    }
    words.windows(width).map(|w| w.join(" ")).collect()
}

/// Remove a primeira ocorrência de `phrase` (palavras inteiras) do texto.
fn erase_first(text: &str, phrase: &str) -> String {
    let padded = format!(" {text} ");
    let needle = format!(" {phrase} ");
    match padded.find(&needle) {
        Some(pos) => {
            let rest = format!("{} {}", &padded[..pos], &padded[pos + needle.len()..]);
            rest.split_whitespace().collect::<Vec<_>>().join(" ")
        }
        None => text.to_string(),
    }
}

/// Sigla formada pela primeira letra de cada palavra.
fn acronym(words: &[&str]) -> String {
    words.iter().filter_map(|w| w.chars().next()).collect()
}

pub struct TeamResolver<'a> {
    dict: &'a dyn SpellChecker,
    limits: TeamResolverLimits,
}

impl<'a> TeamResolver<'a> {
    pub fn new(dict: &'a dyn SpellChecker) -> Self {
        Self {
            dict,
            limits: TeamResolverLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: TeamResolverLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Encontra até 2 times de `candidates` em `text` (ambos já normalizados).
    ///
    /// Devolve `None` se nenhum lado foi resolvido; pode devolver um único time.
    pub fn find_teams<I, S>(&self, candidates: I, text: &str) -> Option<BTreeSet<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = WorkList {
            candidates: candidates
                .into_iter()
                .map(|c| c.as_ref().trim().to_string())
                .filter(|c| !c.is_empty())
                .map(|c| (c.clone(), c))
                .collect(),
            text: text.split_whitespace().collect::<Vec<_>>().join(" "),
            found: BTreeSet::new(),
        };

        let mut rounds = 0;
        while !state.is_done() && rounds < self.limits.max_rounds {
            rounds += 1;

            let width = state.width();
            if width == 0 {
                break;
            }
            if word_count(&state.text) >= width {
                self.match_round(&mut state, width);
            }

            if state.is_done() || width == 1 {
                break;
            }
            self.shorten(&mut state, width);
        }

        if state.found.is_empty() {
            None
        } else {
            Some(state.found)
        }
    }

    /// Uma rodada: passadas com d = 0, 1, 2 sobre as janelas de `width` palavras.
    fn match_round(&self, state: &mut WorkList, width: usize) {
        for distance in 0..=MAX_EDIT_DISTANCE {
            let mut possible = windows(&state.text, width);
            let forms: Vec<String> = state.candidates.keys().cloned().collect();

            for form in forms {
                if state.found.len() >= MAX_TEAMS {
                    return;
                }
                // Pode ter saído quando outra forma do mesmo time casou
                let Some(team) = state.candidates.get(&form).cloned() else {
                    continue;
                };

                let accepted = if distance == 0 {
                    possible.contains(&form)
                } else {
                    // Uma forma de 2 letras a distância 2 casaria com qualquer palavra de 2 letras
                    distance < form.chars().count()
                        && possible.iter().any(|w| levenshtein(&form, w) == distance)
                };

                if accepted {
                    tracing::trace!(form = %form, team = %team, distance, "time resolvido");
                    state.accept(team);
                    if distance == 0 {
                        state.text = erase_first(&state.text, &form);
                        possible = windows(&state.text, width);
                    }
                }
            }
        }
    }

    /// Troca os candidatos de `width` palavras por formas encurtadas.
    fn shorten(&self, state: &mut WorkList, width: usize) {
        let longest: Vec<(String, String)> = state
            .candidates
            .iter()
            .filter(|(form, _)| word_count(form) == width)
            .map(|(f, t)| (f.clone(), t.clone()))
            .collect();
        for (form, _) in &longest {
            state.candidates.remove(form);
        }

        let mut generated = 0;
        let mut skipped = 0;
        for (form, team) in longest {
            let words: Vec<&str> = form.split_whitespace().collect();
            let shortened: Vec<String> = if width == 2 {
                // Palavra fora do dicionário tende a ser apelido ("swans", "roosters")
                words
                    .iter()
                    .filter(|w| !self.dict.check(w))
                    .map(|w| w.to_string())
                    .collect()
            } else {
                words
                    .iter()
                    .combinations(width - 1)
                    .map(|combo| combo.into_iter().join(" "))
                    .chain(std::iter::once(acronym(&words)))
                    .collect()
            };

            for short in shortened {
                if generated >= self.limits.max_candidates {
                    skipped += 1;
                    continue;
                }
                generated += 1;
                state.candidates.entry(short).or_insert_with(|| team.clone());
            }
        }

        if skipped > 0 {
            tracing::warn!(width, generated, skipped, "limite de formas encurtadas atingido");
        }
    }
}

/// Todos os nomes do gazetteer de times.
///
/// Não há pré-filtro pela primeira letra: o apelido ("roosters") e a sigla ("gws") quase
/// nunca começam com a letra do nome completo, e um erro de digitação pode cair justo nela.
pub fn team_candidates(index: &GazetteerIndex) -> Vec<String> {
    index
        .get(Category::Teams)
        .map(|idx| idx.phrases().map(str::to_string).collect())
        .unwrap_or_default()
}
