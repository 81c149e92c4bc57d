use serde::{Deserialize, Serialize};

/// Display language of the site
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

/// Text published in every supported language
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LocalizedText {
    pub es: String,
    pub en: String,
}

impl LocalizedText {
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::Es => &self.es,
            Language::En => &self.en,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
    /// Any label the catalog adds later
    #[serde(other)]
    Unknown,
}

/// A closed range of traveler counts mapped to a per-person price
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub min_pax: u32,
    pub max_pax: u32,
    #[serde(rename = "priceCOP")]
    pub price_cop: i64,
    #[serde(rename = "priceUSD", default)]
    pub price_usd: i64,
}

impl PricingTier {
    /// Whether `pax` falls inside `[min_pax, max_pax]`
    pub fn contains(&self, pax: u32) -> bool {
        pax >= self.min_pax && pax <= self.max_pax
    }
}

/// A trekking tour as published by the booking API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub tour_id: String,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub short_description: LocalizedText,
    pub difficulty: Difficulty,
    /// Duration in days
    pub total_days: u32,
    #[serde(default)]
    pub pricing_tiers: Vec<PricingTier>,
    #[serde(default)]
    pub is_active: bool,
}
