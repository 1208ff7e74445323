//! # Ranqueamento de Candidatos
//!
//! A busca de artistas costuma devolver vários candidatos para uma mesma descrição
//! (ex: "the wiggles big show" pode casar "wiggles", "big show" e "show"). Cada candidato
//! recebe uma pontuação heurística e só os 3 melhores, com pontuação positiva, ficam.
//!
//! ## Pontuação
//!
//! | Sinal                                       | Peso                      |
//! |---------------------------------------------|---------------------------|
//! | Palavras no nome                            | `+0.5 × (palavras − 1)`   |
//! | Palavras fora do dicionário (nomes próprios) | `+1 × fração desconhecida` |
//! | Artista popular                             | `+2`                      |
//! | Premiado                                    | `+1`                      |
//! | Já se apresentou na Austrália               | `+0.5`                    |
//! | Possivelmente extinto / falecido            | `−1`                      |
//!
//! Países passam por outro filtro: códigos de até 3 letras são quase sempre falsos
//! positivos ("us", "in", "it"), exceto uma lista branca.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::normalizer::normalize_artist_name;
use crate::spell::SpellChecker;

/// Tamanho máximo da lista de artistas ranqueados.
pub const MAX_RANKED_ARTISTS: usize = 3;

/// Códigos curtos de país aceitos mesmo com 3 letras ou menos.
pub const SHORT_COUNTRY_WHITELIST: [&str; 6] = ["aus", "nz", "png", "usa", "us", "uk"];

/// Conjuntos de referência consultados pelo ranqueador.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSets {
    pub popular: HashSet<String>,
    pub award_winners: HashSet<String>,
    pub performed_in_australia: HashSet<String>,
    /// Bandas extintas/artistas possivelmente falecidos, por primeira letra.
    possibly_dead: HashMap<char, HashSet<String>>,
}

fn normalized_set<I, S>(names: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|n| normalize_artist_name(n.as_ref()))
        .collect()
}

impl ReferenceSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_popular<I: IntoIterator<Item = S>, S: AsRef<str>>(mut self, names: I) -> Self {
        self.popular = normalized_set(names);
        self
    }

    pub fn with_award_winners<I: IntoIterator<Item = S>, S: AsRef<str>>(mut self, names: I) -> Self {
        self.award_winners = normalized_set(names);
        self
    }

    pub fn with_performed_in_australia<I: IntoIterator<Item = S>, S: AsRef<str>>(mut self, names: I) -> Self {
        self.performed_in_australia = normalized_set(names);
        self
    }

    pub fn with_possibly_dead<I: IntoIterator<Item = S>, S: AsRef<str>>(mut self, names: I) -> Self {
        self.possibly_dead.clear();
        for name in normalized_set(names) {
            if let Some(first) = name.chars().next() {
                self.possibly_dead.entry(first).or_default().insert(name);
            }
        }
        self
    }

    pub fn is_possibly_dead(&self, name: &str) -> bool {
        name.chars()
            .next()
            .and_then(|first| self.possibly_dead.get(&first))
            .map(|bucket| bucket.contains(name))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.popular.len()
            + self.award_winners.len()
            + self.performed_in_australia.len()
            + self.possibly_dead.values().map(HashSet::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Um artista candidato com suas features e a pontuação derivada delas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistCandidate {
    pub name: String,
    pub words_in_name: usize,
    /// Fração das palavras que o dicionário não reconhece.
    pub uncommon_word_ratio: f64,
    pub is_popular: bool,
    pub is_award_winner: bool,
    pub performed_in_australia: bool,
    pub is_possibly_dead: bool,
    pub score: f64,
}

impl ArtistCandidate {
    /// Calcula as features de `name` e a pontuação.
    pub fn assess(name: &str, refs: &ReferenceSets, dict: &dyn SpellChecker) -> Self {
        let words_in_name = name.split_whitespace().count();
        let uncommon_word_ratio = 1.0 - dict.recognised_ratio(name);
        let is_popular = refs.popular.contains(name);
        let is_award_winner = refs.award_winners.contains(name);
        let performed_in_australia = refs.performed_in_australia.contains(name);
        let is_possibly_dead = refs.is_possibly_dead(name);

        let mut score = 0.5 * words_in_name.saturating_sub(1) as f64 + uncommon_word_ratio;
        if is_popular {
            score += 2.0;
        }
        if is_award_winner {
            score += 1.0;
        }
        if performed_in_australia {
            score += 0.5;
        }
        if is_possibly_dead {
            score -= 1.0;
        }

        Self {
            name: name.to_string(),
            words_in_name,
            uncommon_word_ratio,
            is_popular,
            is_award_winner,
            performed_in_australia,
            is_possibly_dead,
            score,
        }
    }
}

/// Avalia todos os candidatos, na ordem de entrada.
pub fn score_artists<I, S>(candidates: I, refs: &ReferenceSets, dict: &dyn SpellChecker) -> Vec<ArtistCandidate>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .map(|name| ArtistCandidate::assess(name.as_ref(), refs, dict))
        .collect()
}

/// Ranqueia candidatos a artista: mantém só pontuação estritamente positiva, ordena
/// de forma decrescente (empates preservam a ordem de entrada) e corta nos 3 primeiros.
pub fn rank_artists<I, S>(candidates: I, refs: &ReferenceSets, dict: &dyn SpellChecker) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut scored: Vec<ArtistCandidate> = score_artists(candidates, refs, dict)
        .into_iter()
        .filter(|c| c.score > 0.0)
        .collect();
    // sort_by é estável
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(MAX_RANKED_ARTISTS);
    scored.into_iter().map(|c| c.name).collect()
}

/// Remove países de até 3 caracteres que não estejam na lista branca.
/// Devolve `None` se nada sobrar.
pub fn filter_countries<I, S>(countries: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let kept: Vec<String> = countries
        .into_iter()
        .map(|c| c.as_ref().to_string())
        .filter(|c| c.chars().count() > 3 || SHORT_COUNTRY_WHITELIST.contains(&c.as_str()))
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spell::WordList;

    fn dict() -> WordList {
        WordList::new(["big", "show", "the", "night", "band", "birds", "tour"])
    }

    #[test]
    fn test_scoring_features() {
        let refs = ReferenceSets::new()
            .with_popular(["Kaskade"])
            .with_award_winners(["Kaskade"])
            .with_performed_in_australia(["Kaskade"]);
        let c = ArtistCandidate::assess("kaskade", &refs, &dict());
        assert_eq!(c.words_in_name, 1);
        assert_eq!(c.uncommon_word_ratio, 1.0);
        // 0 + 1 + 2 + 1 + 0.5
        assert_eq!(c.score, 4.5);
    }

    #[test]
    fn test_dead_artists_penalised() {
        let refs = ReferenceSets::new().with_possibly_dead(["The Kinks"]);
        let c = ArtistCandidate::assess("kinks", &refs, &dict());
        assert!(c.is_possibly_dead);
        assert_eq!(c.score, 0.0);
    }

    #[test]
    fn test_rank_keeps_positive_scores_only() {
        let refs = ReferenceSets::new();
        // "show" é palavra de dicionário com 1 palavra: pontuação 0, descartado
        let ranked = rank_artists(["show", "big show"], &refs, &dict());
        assert_eq!(ranked, vec!["big show"]);
    }

    #[test]
    fn test_rank_truncates_to_three_and_orders_by_score() {
        let refs = ReferenceSets::new().with_popular(["night birds"]);
        let ranked = rank_artists(
            ["zed", "yolanda be cool", "night birds", "abba", "the band"],
            &refs,
            &dict(),
        );
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0], "night birds");
        assert_eq!(ranked[1], "yolanda be cool");
    }

    #[test]
    fn test_rank_ties_preserve_input_order() {
        let refs = ReferenceSets::new();
        let ranked = rank_artists(["zed", "abba", "kiss"], &refs, &dict());
        assert_eq!(ranked, vec!["zed", "abba", "kiss"]);
        let scored = score_artists(["zed", "abba"], &refs, &dict());
        assert!(scored.iter().all(|c| c.score > 0.0));
    }

    #[test]
    fn test_filter_countries() {
        let kept = filter_countries(["us", "aus", "xyz"]).unwrap();
        assert_eq!(kept, vec!["us", "aus"]);
        let kept = filter_countries(["in", "japan"]).unwrap();
        assert_eq!(kept, vec!["japan"]);
        assert_eq!(filter_countries(["it", "de"]), None);
    }
}
