//! # Normalizador de Texto
//!
//! Converte descrições ruidosas de eventos em um fluxo canônico de palavras:
//! minúsculas, sem pontuação, números por extenso convertidos em dígitos,
//! abreviações expandidas e artigos soltos removidos.
//!
//! ## Etapas (ordem estrita)
//!
//! 1. Minúsculas.
//! 2. Separadores (`_ - : ; / . , " ' ``) viram espaço; parênteses, colchetes e chaves somem.
//! 3. `&` vira `and` (na variante de artistas, `and` vira `&`).
//! 4. Números por extenso de 0 a 99 viram dígitos (compostos antes dos simples).
//! 5. Abreviações de estados e depois abreviações de token único são expandidas.
//! 6. Artigos (`the`, `a`, `an`) são removidos e os espaços colapsados.
//!
//! ## Exemplo
//!
//! ```rust
//! use event_ner_core::normalizer::normalize;
//!
//! let text = normalize("the ROLLING_STONES! :) ? ... twenty two");
//! assert_eq!(text.as_deref(), Some("rolling stones 22"));
//! ```
//!
//! A saída é idempotente: `normalize(normalize(x)) == normalize(x)`.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Marcador usado no lugar de um artista não informado ("?", "...", emoticons).
pub const ARTIST_SENTINEL: &str = "@artist";

/// Variante do normalizador aplicada a uma categoria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizerKind {
    /// Pipeline padrão, usado pela maioria das categorias.
    Generic,
    /// Nomes de artistas: preserva `&` e o marcador `@artist`, trata `!` estilizado.
    ArtistName,
    /// Títulos de musicais e filmes: descarta o trecho entre parênteses antes do padrão.
    Title,
}

impl NormalizerKind {
    pub fn apply(&self, raw: &str) -> Option<String> {
        match self {
            NormalizerKind::Generic => normalize(raw),
            NormalizerKind::ArtistName => normalize_artist_name(raw),
            NormalizerKind::Title => normalize_title(raw),
        }
    }
}

/// Atalho para `kind.apply(raw)`.
pub fn normalize_with(kind: NormalizerKind, raw: &str) -> Option<String> {
    kind.apply(raw)
}

const UNITS: [&str; 9] = ["one", "two", "three", "four", "five", "six", "seven", "eight", "nine"];
const TEENS: [&str; 10] = [
    "ten", "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen",
    "eighteen", "nineteen",
];
/// Dezenas; "fourty" é um erro ortográfico frequente nas descrições.
const TENS: [(&str, u32); 9] = [
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fourty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

/// Estados e territórios australianos. Expandidos antes das demais abreviações.
const STATE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("nsw", "new south wales"),
    ("vic", "victoria"),
    ("tas", "tasmania"),
    ("sa", "south australia"),
    ("wa", "western australia"),
    ("act", "australian capital territory"),
    ("nt", "northern territory"),
    ("qld", "queensland"),
];

/// Abreviações de token único: variantes de cidades e termos de competição/papel.
const TOKEN_ABBREVIATIONS: &[(&str, &str)] = &[
    ("syd", "sydney"),
    ("mel", "melbourne"),
    ("melb", "melbourne"),
    ("bris", "brisbane"),
    ("brisb", "brisbane"),
    ("gc", "gold coast"),
    ("adel", "adelaide"),
    ("canb", "canberra"),
    ("mt", "mount"),
    ("utd", "united"),
    ("intl", "international"),
    ("assoc", "association"),
    ("champs", "championships"),
    ("rd", "round"),
    ("qf", "quarter final"),
    ("sf", "semi final"),
    ("gf", "grand final"),
    ("ft", "featuring"),
    ("feat", "featuring"),
    ("pres", "presents"),
];

const ARTICLES: [&str; 3] = ["the", "a", "an"];

fn is_separator(c: char) -> bool {
    matches!(c, '_' | '-' | ':' | ';' | '/' | '.' | ',' | '"' | '\'' | '`')
}

fn is_bracket(c: char) -> bool {
    matches!(c, '[' | ']' | '{' | '}' | '(' | ')')
}

/// Etapa 2: separadores viram espaço, agrupadores são descartados.
fn replace_separators(s: &str) -> String {
    s.chars()
        .filter(|c| !is_bracket(*c))
        .map(|c| if is_separator(c) { ' ' } else { c })
        .collect()
}

/// Troca por espaço tudo que não é alfanumérico nem está em `keep`.
fn strip_punctuation(s: &str, keep: &[char]) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || keep.contains(&c) {
                c
            } else {
                ' '
            }
        })
        .collect()
}

fn spelled_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let tens = TENS.iter().map(|(w, _)| *w).collect::<Vec<_>>().join("|");
        let teens = TEENS.join("|");
        let units = UNITS.join("|");
        // A alternância é leftmost-first: o composto "twenty two" vence "twenty" isolado.
        let pattern = format!(
            r"\b(?:({tens})\s+({units})|({tens})|({teens})|({units}|zero))\b"
        );
        Regex::new(&pattern).expect("padrão de números por extenso é válido")
    })
}

fn tens_value(word: &str) -> u32 {
    TENS.iter().find(|(w, _)| *w == word).map(|(_, v)| *v).unwrap_or(0)
}

fn unit_value(word: &str) -> u32 {
    UNITS.iter().position(|w| *w == word).map(|i| i as u32 + 1).unwrap_or(0)
}

/// Converte números por extenso entre 0 e 99 em dígitos, somente em palavras inteiras.
///
/// Os compostos (`twenty two`) são reconhecidos antes das dezenas, que vêm antes de
/// 10–19, que vêm antes de 1–9. Assim `"twenty two"` vira `"22"` e nunca `"202"`.
pub fn spelled_numbers_to_digits(s: &str) -> String {
    spelled_number_regex()
        .replace_all(s, |caps: &Captures| {
            if let (Some(tens), Some(unit)) = (caps.get(1), caps.get(2)) {
                (tens_value(tens.as_str()) + unit_value(unit.as_str())).to_string()
            } else if let Some(tens) = caps.get(3) {
                tens_value(tens.as_str()).to_string()
            } else if let Some(teen) = caps.get(4) {
                let i = TEENS.iter().position(|w| *w == teen.as_str()).unwrap_or(0);
                (10 + i).to_string()
            } else if let Some(unit) = caps.get(5) {
                unit_value(unit.as_str()).to_string()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

fn expand_with(tokens: Vec<String>, table: &[(&str, &str)]) -> Vec<String> {
    tokens
        .into_iter()
        .map(|t| {
            table
                .iter()
                .find(|(abbr, _)| *abbr == t)
                .map(|(_, full)| full.to_string())
                .unwrap_or(t)
        })
        .collect()
}

/// Expande abreviações em uma única passada (sem recursão): estados primeiro,
/// depois abreviações de token único.
pub fn expand_abbreviations(s: &str) -> String {
    let tokens: Vec<String> = s.split_whitespace().map(str::to_string).collect();
    let tokens = expand_with(tokens, STATE_ABBREVIATIONS);
    let tokens = expand_with(tokens, TOKEN_ABBREVIATIONS);
    tokens.join(" ")
}

fn remove_articles(s: &str) -> String {
    s.split_whitespace()
        .filter(|w| !ARTICLES.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalização genérica. Devolve `None` para entrada vazia ou que fica vazia.
pub fn normalize(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }

    let s = raw.to_lowercase();
    let s = replace_separators(&s);
    let s = s.replace('&', " and ");
    let s = strip_punctuation(&s, &[]);
    let s = spelled_numbers_to_digits(&s);
    let s = expand_abbreviations(&s);
    let s = remove_articles(&s);

    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn emoticon_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*:[()]\s*").expect("padrão de emoticon é válido"))
}

fn bang_before_non_word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!+([^\w!])").expect("padrão de exclamação é válido"))
}

fn trailing_bang_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!+$").expect("padrão de exclamação final é válido"))
}

/// Normalização específica para nomes de artistas.
///
/// - `"?"` ou `"..."` sozinhos viram o marcador `@artist`;
/// - `:)` e `:(` viram `@artist`;
/// - `!` no fim de palavra some, e os restantes viram `i` (`"p!nk"` → `"pink"`);
/// - `and` isolado vira `&`;
/// - apenas o artigo inicial é removido (`"the the"` continua `"the"`).
pub fn normalize_artist_name(raw: &str) -> Option<String> {
    let lower = raw.to_lowercase();
    let trimmed = lower.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed == "?" || trimmed == "..." {
        return Some(ARTIST_SENTINEL.to_string());
    }

    let s = emoticon_regex().replace_all(&lower, " @artist ");
    let s = replace_separators(&s);
    let s = bang_before_non_word_regex().replace_all(&s, "$1");
    let s = trailing_bang_regex().replace_all(s.trim_end(), "");
    let s = s.replace('!', "i");
    let s = strip_punctuation(&s, &['&', '@']);
    let s = spelled_numbers_to_digits(&s);

    let mut tokens: Vec<&str> = s
        .split_whitespace()
        .map(|w| if w == "and" { "&" } else { w })
        .collect();
    if tokens.len() > 1 && ARTICLES.contains(&tokens[0]) {
        tokens.remove(0);
    }

    let s = tokens.join(" ");
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn parenthesised_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\([^)]*\)?").expect("padrão de parênteses é válido"))
}

/// Normalização de títulos (musicais, filmes): `"cats (1998 revival)"` → `"cats"`.
pub fn normalize_title(raw: &str) -> Option<String> {
    let without_notes = parenthesised_regex().replace_all(raw, " ");
    normalize(&without_notes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_description() {
        assert_eq!(
            normalize("the ROLLING_STONES! :) ? ... twenty two").as_deref(),
            Some("rolling stones 22")
        );
    }

    #[test]
    fn test_empty_input_is_none() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
        // Só pontuação e artigos: nada sobra
        assert_eq!(normalize("the ... !!"), None);
    }

    #[test]
    fn test_spelled_numbers() {
        assert_eq!(spelled_numbers_to_digits("twenty two"), "22");
        assert_eq!(spelled_numbers_to_digits("forty"), "40");
        assert_eq!(spelled_numbers_to_digits("fourty four"), "44");
        assert_eq!(spelled_numbers_to_digits("seventeen seven"), "17 7");
        assert_eq!(spelled_numbers_to_digits("ninety nine luftballons"), "99 luftballons");
        // Palavra inteira apenas
        assert_eq!(spelled_numbers_to_digits("someone tone"), "someone tone");
    }

    #[test]
    fn test_compound_is_never_split() {
        let out = normalize("twenty two").unwrap();
        assert_eq!(out, "22");
        assert_ne!(out, "202");
    }

    #[test]
    fn test_separators_and_brackets() {
        assert_eq!(normalize("sydney/melbourne-live").as_deref(), Some("sydney melbourne live"));
        assert_eq!(normalize("(live) [encore]").as_deref(), Some("live encore"));
    }

    #[test]
    fn test_ampersand_becomes_and() {
        assert_eq!(normalize("salt & pepper").as_deref(), Some("salt and pepper"));
    }

    #[test]
    fn test_abbreviations_expand_once() {
        assert_eq!(
            normalize("Swans v Giants, SCG NSW").as_deref(),
            Some("swans v giants scg new south wales")
        );
        assert_eq!(normalize("Mt Druitt").as_deref(), Some("mount druitt"));
        assert_eq!(normalize("syd utd gf").as_deref(), Some("sydney united grand final"));
    }

    #[test]
    fn test_articles_removed_everywhere() {
        assert_eq!(normalize("The Wiggles at an Arena").as_deref(), Some("wiggles at arena"));
    }

    #[test]
    fn test_idempotence() {
        let samples = [
            "the ROLLING_STONES! :) ? ... twenty two",
            "AC/DC - Power Up Tour, Qld",
            "Sydney FC vs Melbourne Victory @ ANZ Stadium",
            "twenty a two",
            "Florence + the Machine (Live)",
            "Mt. Hotham Ski-Fest  eleven  & more",
        ];
        for s in samples {
            let once = normalize(s).unwrap();
            assert_eq!(normalize(&once).as_deref(), Some(once.as_str()), "entrada: {s}");
        }
    }

    #[test]
    fn test_artist_sentinels() {
        assert_eq!(normalize_artist_name("?").as_deref(), Some(ARTIST_SENTINEL));
        assert_eq!(normalize_artist_name(" ... ").as_deref(), Some(ARTIST_SENTINEL));
        assert_eq!(
            normalize_artist_name("band :) tonight").as_deref(),
            Some("band @artist tonight")
        );
    }

    #[test]
    fn test_artist_exclamation_marks() {
        assert_eq!(normalize_artist_name("P!nk").as_deref(), Some("pink"));
        assert_eq!(normalize_artist_name("Rock!!").as_deref(), Some("rock"));
        assert_eq!(normalize_artist_name("Wham! Live").as_deref(), Some("wham live"));
    }

    #[test]
    fn test_artist_and_and_articles() {
        assert_eq!(
            normalize_artist_name("The Mamas and The Papas").as_deref(),
            Some("mamas & the papas")
        );
        assert_eq!(
            normalize_artist_name("Twenty One Pilots").as_deref(),
            Some("21 pilots")
        );
    }

    #[test]
    fn test_title_drops_parenthesised_notes() {
        assert_eq!(normalize_title("Cats (1998 Revival)").as_deref(), Some("cats"));
        assert_eq!(
            normalize_with(NormalizerKind::Title, "The Lion King").as_deref(),
            Some("lion king")
        );
    }
}
