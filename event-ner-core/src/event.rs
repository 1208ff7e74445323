//! # Eventos e Mapas de Rótulos
//!
//! Um [`Event`] nasce de uma linha da fonte de dados ([`RawEventRow`]), recebe do motor
//! um [`LabelMap`] e um tipo de entretenimento, e depois só é serializado.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Deserializer, Serialize};

use crate::category::Category;
use crate::classifier::EntertainmentType;
use crate::error::{EngineError, Result};

/// Formato dos timestamps exportados pela fonte (`2013-05-05 12:30:45`, fração opcional).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Categoria → frases canônicas encontradas em um evento.
///
/// Uma categoria sem frases nunca aparece no mapa, nem quando o mapa vem de JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelMap {
    labels: BTreeMap<Category, BTreeSet<String>>,
}

impl<'de> Deserialize<'de> for LabelMap {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<Category, BTreeSet<String>>::deserialize(deserializer)?;
        let mut map = LabelMap::new();
        for (category, phrases) in raw {
            map.insert(category, phrases);
        }
        Ok(map)
    }
}

impl LabelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitui as frases da categoria. Um conjunto vazio remove a categoria.
    pub fn insert<I, S>(&mut self, category: Category, phrases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = phrases.into_iter().map(Into::into).collect();
        if set.is_empty() {
            self.labels.remove(&category);
        } else {
            self.labels.insert(category, set);
        }
    }

    /// Acrescenta uma frase à categoria.
    pub fn add(&mut self, category: Category, phrase: impl Into<String>) {
        self.labels.entry(category).or_default().insert(phrase.into());
    }

    pub fn get(&self, category: Category) -> Option<&BTreeSet<String>> {
        self.labels.get(&category)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.labels.contains_key(&category)
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.labels.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &BTreeSet<String>)> {
        self.labels.iter().map(|(c, s)| (*c, s))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Período do dia de uma apresentação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfDay {
    /// 05h–11h
    Morning,
    /// 12h–17h
    Afternoon,
    /// 18h–20h
    Evening,
    Night,
}

impl PartOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => PartOfDay::Morning,
            12..=17 => PartOfDay::Afternoon,
            18..=20 => PartOfDay::Evening,
            _ => PartOfDay::Night,
        }
    }
}

/// Dia da semana e período do dia, derivados do horário da apresentação.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceSlot {
    pub weekday: String,
    pub part_of_day: PartOfDay,
}

impl PerformanceSlot {
    pub fn from_timestamp(ts: &NaiveDateTime) -> Self {
        let weekday = match ts.weekday() {
            Weekday::Mon => "monday",
            Weekday::Tue => "tuesday",
            Weekday::Wed => "wednesday",
            Weekday::Thu => "thursday",
            Weekday::Fri => "friday",
            Weekday::Sat => "saturday",
            Weekday::Sun => "sunday",
        };
        Self {
            weekday: weekday.to_string(),
            part_of_day: PartOfDay::from_hour(ts.hour()),
        }
    }
}

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|source| EngineError::Timestamp {
        value: value.to_string(),
        source,
    })
}

/// Uma linha da tabela de eventos, com as colunas de texto que compõem a descrição.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEventRow {
    pub id: String,
    pub performance_time: Option<String>,
    pub primary_show_desc: Option<String>,
    pub title_who: Option<String>,
    pub title_where: Option<String>,
    pub title_when: Option<String>,
    pub titles: Vec<String>,
}

impl RawEventRow {
    /// Junta as colunas de texto não vazias em uma única descrição.
    pub fn description(&self) -> String {
        [
            &self.primary_show_desc,
            &self.title_who,
            &self.title_where,
            &self.title_when,
        ]
        .into_iter()
        .flatten()
        .chain(self.titles.iter())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Horário da apresentação; coluna ausente ou vazia é `Ok(None)`.
    pub fn timestamp(&self) -> Result<Option<NaiveDateTime>> {
        match self.performance_time.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse_timestamp(value).map(Some),
        }
    }
}

/// Evento rotulado, pronto para persistência.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub timestamp: Option<NaiveDateTime>,
    pub description: String,
    pub labels: LabelMap,
    pub entertainment_type: Option<EntertainmentType>,
    pub slot: Option<PerformanceSlot>,
}
