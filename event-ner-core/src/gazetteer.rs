//! # Índice de Gazetteers
//!
//! Um gazetteer é a lista de frases canônicas de uma categoria (ex: países, artistas).
//! Para acelerar a busca, as frases são agrupadas pela primeira letra ("baldes"),
//! e cada balde é mantido em ordem lexicográfica para desempates determinísticos.
//!
//! O índice é construído uma única vez na inicialização e depois só é lido:
//! pode ser compartilhado entre threads sem sincronização.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Frases de uma única categoria, agrupadas pela primeira letra.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryIndex {
    buckets: BTreeMap<char, Vec<String>>,
}

impl CategoryIndex {
    /// Normaliza as frases com a variante da categoria, descarta as que ficam com menos
    /// de 2 caracteres e agrupa o restante pela primeira letra (sem duplicatas).
    pub fn build<I, S>(category: Category, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let kind = category.normalizer_kind();
        let mut grouped: BTreeMap<char, BTreeSet<String>> = BTreeMap::new();

        for raw in phrases {
            let Some(phrase) = kind.apply(raw.as_ref()) else {
                continue;
            };
            if phrase.chars().count() < 2 {
                continue;
            }
            if let Some(first) = phrase.chars().next() {
                grouped.entry(first).or_default().insert(phrase);
            }
        }

        Self {
            buckets: grouped
                .into_iter()
                .map(|(letter, set)| (letter, set.into_iter().collect()))
                .collect(),
        }
    }

    /// Frases cujo primeiro caractere é `letter`, em ordem lexicográfica.
    pub fn bucket(&self, letter: char) -> &[String] {
        self.buckets.get(&letter).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.buckets.keys().copied()
    }

    /// Todas as frases, balde a balde (portanto em ordem lexicográfica).
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.buckets.values().flatten().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Índice completo: categoria → letra → frases.
#[derive(Debug, Clone, Default)]
pub struct GazetteerIndex {
    categories: HashMap<Category, CategoryIndex>,
}

impl GazetteerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Índice já contendo os vocabulários fixos (tipos de local, tipos de torneio, ...).
    pub fn with_builtins() -> Self {
        let mut index = Self::new();
        for cat in Category::ALL {
            let phrases = cat.builtin_phrases();
            if !phrases.is_empty() {
                index.insert(cat, CategoryIndex::build(cat, phrases.iter().copied()));
            }
        }
        index
    }

    /// Registra (ou substitui) o índice de uma categoria. Usado apenas na carga.
    pub fn insert(&mut self, category: Category, index: CategoryIndex) {
        self.categories.insert(category, index);
    }

    pub fn with_category<I, S>(mut self, category: Category, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.insert(category, CategoryIndex::build(category, phrases));
        self
    }

    pub fn get(&self, category: Category) -> Option<&CategoryIndex> {
        self.categories.get(&category)
    }

    pub fn contains_category(&self, category: Category) -> bool {
        self.categories.contains_key(&category)
    }

    /// Categorias carregadas, na ordem de `Category::ALL`.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .iter()
            .copied()
            .filter(|c| self.categories.contains_key(c))
            .collect()
    }

    /// Balde de uma categoria; vazio se a categoria ou a letra não existirem.
    pub fn bucket(&self, category: Category, letter: char) -> &[String] {
        self.categories
            .get(&category)
            .map(|idx| idx.bucket(letter))
            .unwrap_or(&[])
    }

    /// Total de frases em todas as categorias.
    pub fn len(&self) -> usize {
        self.categories.values().map(CategoryIndex::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
