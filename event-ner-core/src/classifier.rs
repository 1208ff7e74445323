//! # Classificador de Tipo de Entretenimento
//!
//! Mapeia os rótulos encontrados em um evento (mais algumas pistas do texto cru) para
//! um tipo de entretenimento. As regras formam uma lista **ordenada**: a primeira que
//! for satisfeita vence, independentemente da ordem de iteração do mapa de rótulos.
//!
//! | Ordem | Tipo               | Condição                                                              |
//! |-------|--------------------|-----------------------------------------------------------------------|
//! | 1     | `special interest` | boxers, psychics, life_coaches ou motivational_speakers               |
//! | 2     | `concert`          | artists + promoters; artists + palavra-pista; ou "doors open" no texto |
//! | 3     | `sport`            | exatamente 2 times; ou sport_venues + sport_names                     |
//! | 4     | `circus`           | circuses                                                              |

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::category::Category;
use crate::event::LabelMap;

/// Palavras do texto cru que indicam show quando há artista.
pub const CONCERT_CUES: [&str; 9] = [
    "guest", "featuring", "feat", "with", "headline", "presents", "vinyl", "cd", "tour",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntertainmentType {
    #[serde(rename = "special interest")]
    SpecialInterest,
    #[serde(rename = "concert")]
    Concert,
    #[serde(rename = "sport")]
    Sport,
    #[serde(rename = "circus")]
    Circus,
}

impl EntertainmentType {
    pub fn tag(&self) -> &'static str {
        match self {
            EntertainmentType::SpecialInterest => "special interest",
            EntertainmentType::Concert => "concert",
            EntertainmentType::Sport => "sport",
            EntertainmentType::Circus => "circus",
        }
    }
}

impl std::fmt::Display for EntertainmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Palavras do texto cru em minúsculas (segmentação Unicode).
fn raw_words(raw: &str) -> Vec<String> {
    raw.unicode_words().map(str::to_lowercase).collect()
}

fn has_any(labels: &LabelMap, categories: &[Category]) -> bool {
    categories.iter().any(|c| labels.contains(*c))
}

fn is_special_interest(labels: &LabelMap, _words: &[String]) -> bool {
    has_any(
        labels,
        &[
            Category::Boxers,
            Category::Psychics,
            Category::LifeCoaches,
            Category::MotivationalSpeakers,
        ],
    )
}

fn is_concert(labels: &LabelMap, words: &[String]) -> bool {
    let artists = labels.contains(Category::Artists);
    if artists && labels.contains(Category::Promoters) {
        return true;
    }
    if artists && words.iter().any(|w| CONCERT_CUES.contains(&w.as_str())) {
        return true;
    }
    words.windows(2).any(|pair| pair[0] == "doors" && pair[1] == "open")
}

fn is_sport(labels: &LabelMap, _words: &[String]) -> bool {
    let two_teams = labels.get(Category::Teams).map(|t| t.len() == 2).unwrap_or(false);
    two_teams || (labels.contains(Category::SportVenues) && labels.contains(Category::SportNames))
}

fn is_circus(labels: &LabelMap, _words: &[String]) -> bool {
    labels.contains(Category::Circuses)
}

pub type Predicate = fn(&LabelMap, &[String]) -> bool;

/// Regras em ordem de prioridade.
pub const RULES: [(EntertainmentType, Predicate); 4] = [
    (EntertainmentType::SpecialInterest, is_special_interest),
    (EntertainmentType::Concert, is_concert),
    (EntertainmentType::Sport, is_sport),
    (EntertainmentType::Circus, is_circus),
];

/// Aplica as regras em ordem e devolve o tipo da primeira satisfeita.
pub fn classify(labels: &LabelMap, raw_description: &str) -> Option<EntertainmentType> {
    let words = raw_words(raw_description);
    RULES
        .iter()
        .find(|(_, predicate)| predicate(labels, &words))
        .map(|(kind, _)| *kind)
}
