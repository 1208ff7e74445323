//! # Categorias de Rótulos
//!
//! Cada categoria corresponde a um gazetteer (lista de frases canônicas) e a uma
//! chave no [`LabelMap`](crate::event::LabelMap) de cada evento.
//!
//! | Grupo        | Categorias                                                      |
//! |--------------|-----------------------------------------------------------------|
//! | Música       | artists, promoters, opera_singers, genres                       |
//! | Esporte      | teams, sport_venues, sport_names, sports_abbrev, tournaments... |
//! | Lugar        | countries, suburbs, venue_types                                 |
//! | Interesse    | boxers, psychics, life_coaches, motivational_speakers           |
//! | Outros       | circuses, comedians, musicals, movies, companies, purchase_types|

use serde::{Deserialize, Serialize};

use crate::normalizer::NormalizerKind;

/// Categorias de entidade reconhecidas pelo motor.
///
/// A ordem das variantes define a ordem de `Category::ALL`, usada pelo pipeline
/// ao consultar os gazetteers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Artists,
    Promoters,
    Teams,
    Countries,
    Suburbs,
    VenueTypes,
    SportVenues,
    SportNames,
    SportsAbbrev,
    Tournaments,
    TournamentTypes,
    SportSponsors,
    Circuses,
    Boxers,
    Psychics,
    LifeCoaches,
    MotivationalSpeakers,
    Comedians,
    OperaSingers,
    Musicals,
    Movies,
    Companies,
    Genres,
    PurchaseTypes,
}

impl Category {
    pub const ALL: [Category; 24] = [
        Category::Artists,
        Category::Promoters,
        Category::Teams,
        Category::Countries,
        Category::Suburbs,
        Category::VenueTypes,
        Category::SportVenues,
        Category::SportNames,
        Category::SportsAbbrev,
        Category::Tournaments,
        Category::TournamentTypes,
        Category::SportSponsors,
        Category::Circuses,
        Category::Boxers,
        Category::Psychics,
        Category::LifeCoaches,
        Category::MotivationalSpeakers,
        Category::Comedians,
        Category::OperaSingers,
        Category::Musicals,
        Category::Movies,
        Category::Companies,
        Category::Genres,
        Category::PurchaseTypes,
    ];

    /// Nome da categoria (serialização, nome de arquivo de dados)
    pub fn name(&self) -> &'static str {
        match self {
            Category::Artists => "artists",
            Category::Promoters => "promoters",
            Category::Teams => "teams",
            Category::Countries => "countries",
            Category::Suburbs => "suburbs",
            Category::VenueTypes => "venue_types",
            Category::SportVenues => "sport_venues",
            Category::SportNames => "sport_names",
            Category::SportsAbbrev => "sports_abbrev",
            Category::Tournaments => "tournaments",
            Category::TournamentTypes => "tournament_types",
            Category::SportSponsors => "sport_sponsors",
            Category::Circuses => "circuses",
            Category::Boxers => "boxers",
            Category::Psychics => "psychics",
            Category::LifeCoaches => "life_coaches",
            Category::MotivationalSpeakers => "motivational_speakers",
            Category::Comedians => "comedians",
            Category::OperaSingers => "opera_singers",
            Category::Musicals => "musicals",
            Category::Movies => "movies",
            Category::Companies => "companies",
            Category::Genres => "genres",
            Category::PurchaseTypes => "purchase_types",
        }
    }

    /// Tenta parsear a partir do nome (ex: "life_coaches" → Some(LifeCoaches))
    pub fn from_name(s: &str) -> Option<Self> {
        Category::ALL.iter().copied().find(|c| c.name() == s)
    }

    /// Qual variante do normalizador se aplica às frases e ao texto desta categoria.
    pub fn normalizer_kind(&self) -> NormalizerKind {
        match self {
            Category::Artists => NormalizerKind::ArtistName,
            Category::Musicals | Category::Movies => NormalizerKind::Title,
            _ => NormalizerKind::Generic,
        }
    }

    /// Vocabulário fixo em código, para categorias que não dependem de arquivo.
    pub fn builtin_phrases(&self) -> &'static [&'static str] {
        match self {
            Category::VenueTypes => &[
                "club", "centre", "center", "studio", "stadium", "grounds", "park", "pub",
                "school", "bar", "oval", "showgrounds", "court", "arena", "zoo", "gallery",
                "museum", "garden", "gardens", "theatre", "theater", "lodge", "field",
                "complex", "cafe", "church", "cathedral", "house",
            ],
            Category::TournamentTypes => &[
                "cup", "championship", "test", "trophy", "tour", "tournament", "series",
                "league", "games", "premiership", "race",
            ],
            Category::Genres => &["rock", "pop", "jazz", "soul", "funk", "folk", "blues"],
            Category::PurchaseTypes => &["fee", "merchandise", "parking", "upsell"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
