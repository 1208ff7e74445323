//! # Verificador Ortográfico por Dicionário
//!
//! O ranqueador de artistas e o resolvedor de times precisam saber se uma palavra
//! "existe no dicionário". Palavras fora do dicionário tendem a ser nomes próprios
//! (ex: "swans", "wiggles" podem estar; "kaskade", "parramatta" não).

use std::collections::HashSet;

/// Consulta síncrona e local a um dicionário.
pub trait SpellChecker: Send + Sync {
    /// `true` se a palavra é reconhecida pelo dicionário.
    fn check(&self, word: &str) -> bool;

    /// Fração das palavras de `phrase` reconhecidas (0.0 para frase vazia).
    fn recognised_ratio(&self, phrase: &str) -> f64 {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        if words.is_empty() {
            return 0.0;
        }
        let known = words.iter().filter(|w| self.check(w)).count();
        known as f64 / words.len() as f64
    }
}

/// Dicionário em memória construído a partir de uma lista de palavras.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Uma palavra por linha (formato de `/usr/share/dict/words`).
    pub fn from_lines(text: &str) -> Self {
        Self::new(text.lines())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl SpellChecker for WordList {
    fn check(&self, word: &str) -> bool {
        // Números não são nomes próprios
        if !word.is_empty() && word.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }
        self.words.contains(&word.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_is_case_insensitive() {
        let dict = WordList::from_lines("Victory\ncity\n\n");
        assert_eq!(dict.len(), 2);
        assert!(dict.check("victory"));
        assert!(dict.check("CITY"));
        assert!(!dict.check("parramatta"));
    }

    #[test]
    fn test_digits_are_recognised() {
        let dict = WordList::default();
        assert!(dict.check("22"));
        assert!(!dict.check(""));
    }

    #[test]
    fn test_recognised_ratio() {
        let dict = WordList::new(["the", "band"]);
        assert_eq!(dict.recognised_ratio("band kaskade"), 0.5);
        assert_eq!(dict.recognised_ratio(""), 0.0);
    }
}
