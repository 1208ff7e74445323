//! # Busca de Frases do Gazetteer
//!
//! Dado um texto e uma categoria, encontra todas as frases do gazetteer presentes
//! no texto como palavras inteiras.
//!
//! ## Algoritmo
//!
//! 1. Normaliza o texto com a variante da categoria e divide em palavras.
//! 2. Para cada posição `i`, pega o balde da primeira letra de `words[i]`.
//! 3. Mantém só as frases com no máximo `len(words) - i` palavras.
//! 4. Testa a presença com espaços nas bordas (`" art "` não casa com `" artisan "`).
//! 5. Devolve a união de todas as posições, ou `None` se nada casou.
//!
//! Frases sobrepostas não são desambiguadas: se `"new south wales"` e `"south wales"`
//! estiverem no gazetteer, ambas são reportadas.

use std::collections::{BTreeSet, HashSet};

use crate::category::Category;
use crate::error::{EngineError, Result};
use crate::gazetteer::GazetteerIndex;

/// Teste de presença por palavra inteira. `padded_haystack` já deve ter um espaço
/// em cada ponta.
pub(crate) fn contains_padded(padded_haystack: &str, phrase: &str) -> bool {
    padded_haystack.contains(&format!(" {phrase} "))
}

/// `true` se `phrase` aparece em `text` como sequência de palavras inteiras.
pub fn contains_whole_words(text: &str, phrase: &str) -> bool {
    contains_padded(&format!(" {text} "), phrase)
}

/// Procura as frases de `category` em um texto já normalizado.
///
/// Útil quando o mesmo texto é consultado em várias categorias com o mesmo normalizador.
pub fn find_in_normalized(
    index: &GazetteerIndex,
    normalized: &str,
    category: Category,
) -> Result<Option<BTreeSet<String>>> {
    let cat_index = index
        .get(category)
        .ok_or_else(|| EngineError::UnsupportedCategory(category.name().to_string()))?;

    let words: Vec<&str> = normalized.split_whitespace().collect();
    let padded = format!(" {} ", words.join(" "));

    let mut found = BTreeSet::new();
    let mut tested: HashSet<&str> = HashSet::new();

    for (i, word) in words.iter().enumerate() {
        let Some(first) = word.chars().next() else {
            continue;
        };
        let remaining = words.len() - i;

        for phrase in cat_index.bucket(first) {
            if phrase.split_whitespace().count() > remaining {
                continue;
            }
            if !tested.insert(phrase.as_str()) {
                continue;
            }
            if contains_padded(&padded, phrase) {
                found.insert(phrase.clone());
            }
        }
    }

    Ok(if found.is_empty() { None } else { Some(found) })
}

/// Normaliza `text` e procura as frases da categoria.
///
/// Falha com [`EngineError::UnsupportedCategory`] se a categoria não foi carregada.
/// Texto que normaliza para vazio devolve `Ok(None)`.
pub fn find(index: &GazetteerIndex, text: &str, category: Category) -> Result<Option<BTreeSet<String>>> {
    if !index.contains_category(category) {
        return Err(EngineError::UnsupportedCategory(category.name().to_string()));
    }
    match category.normalizer_kind().apply(text) {
        Some(normalized) => find_in_normalized(index, &normalized, category),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> GazetteerIndex {
        GazetteerIndex::new()
            .with_category(Category::Genres, ["art", "rock"])
            .with_category(
                Category::Countries,
                ["New South Wales Republic", "South Wales", "New Zealand", "Australia"],
            )
            .with_category(Category::Artists, ["Simon and Garfunkel", "Queen"])
    }

    #[test]
    fn test_whole_word_only() {
        let idx = index();
        assert_eq!(find(&idx, "Artisan markets", Category::Genres).unwrap(), None);
        let found = find(&idx, "Art & Rock night", Category::Genres).unwrap().unwrap();
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["art", "rock"]);
    }

    #[test]
    fn test_multi_word_phrases_and_overlaps() {
        let idx = index();
        let found = find(&idx, "tour of new south wales republic and new zealand", Category::Countries)
            .unwrap()
            .unwrap();
        // Sobreposição reportada sem desambiguação
        assert!(found.contains("new south wales republic"));
        assert!(found.contains("south wales"));
        assert!(found.contains("new zealand"));
        assert!(!found.contains("australia"));
    }

    #[test]
    fn test_phrase_longer_than_remaining_tokens_is_skipped() {
        let idx = index();
        assert_eq!(find(&idx, "new", Category::Countries).unwrap(), None);
    }

    #[test]
    fn test_artist_text_uses_artist_normalizer() {
        let idx = index();
        let found = find(&idx, "SIMON & GARFUNKEL live", Category::Artists).unwrap().unwrap();
        assert!(found.contains("simon & garfunkel"));
    }

    #[test]
    fn test_unsupported_category_fails_fast() {
        let idx = index();
        let err = find(&idx, "anything", Category::Boxers).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedCategory(name) if name == "boxers"));
    }

    #[test]
    fn test_empty_text_is_none() {
        let idx = index();
        assert_eq!(find(&idx, "", Category::Genres).unwrap(), None);
    }

    #[test]
    fn test_contains_whole_words() {
        assert!(contains_whole_words("sydney fc vs melbourne", "fc vs"));
        assert!(!contains_whole_words("sydney fcx", "fc"));
    }
}
