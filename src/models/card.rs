//! Card model and its fixed vocabularies.

use serde::{Deserialize, Serialize};

/// Printing language of a card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Language {
    Portuguese,
    English,
    Japanese,
    Italian,
    Spanish,
    German,
    French,
    #[serde(rename = "Simplified Chinese")]
    SimplifiedChinese,
    #[serde(rename = "Traditional Chinese")]
    TraditionalChinese,
    Korean,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::Portuguese,
        Language::English,
        Language::Japanese,
        Language::Italian,
        Language::Spanish,
        Language::German,
        Language::French,
        Language::SimplifiedChinese,
        Language::TraditionalChinese,
        Language::Korean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Portuguese => "Portuguese",
            Language::English => "English",
            Language::Japanese => "Japanese",
            Language::Italian => "Italian",
            Language::Spanish => "Spanish",
            Language::German => "German",
            Language::French => "French",
            Language::SimplifiedChinese => "Simplified Chinese",
            Language::TraditionalChinese => "Traditional Chinese",
            Language::Korean => "Korean",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.as_str() == s)
    }
}

/// Physical condition grade, best to worst.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Condition {
    GM,
    M,
    NM,
    SP,
    MP,
    HP,
    D,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::GM => "GM",
            Condition::M => "M",
            Condition::NM => "NM",
            Condition::SP => "SP",
            Condition::MP => "MP",
            Condition::HP => "HP",
            Condition::D => "D",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GM" => Some(Condition::GM),
            "M" => Some(Condition::M),
            "NM" => Some(Condition::NM),
            "SP" => Some(Condition::SP),
            "MP" => Some(Condition::MP),
            "HP" => Some(Condition::HP),
            "D" => Some(Condition::D),
            _ => None,
        }
    }
}

/// Print variant of a card.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CardType {
    #[default]
    Normal,
    Foil,
    #[serde(rename = "Reverse Foil")]
    ReverseFoil,
    Signed,
    Promo,
    Textless,
    Altered,
    #[serde(rename = "Pre Release")]
    PreRelease,
    #[serde(rename = "First Edition")]
    FirstEdition,
    Shadowless,
    Staff,
    Misprint,
    #[serde(rename = "Shattered Holo")]
    ShatteredHolo,
    #[serde(rename = "Master Ball")]
    MasterBall,
    #[serde(rename = "Poke Ball")]
    PokeBall,
}

impl CardType {
    pub const ALL: [CardType; 15] = [
        CardType::Normal,
        CardType::Foil,
        CardType::ReverseFoil,
        CardType::Signed,
        CardType::Promo,
        CardType::Textless,
        CardType::Altered,
        CardType::PreRelease,
        CardType::FirstEdition,
        CardType::Shadowless,
        CardType::Staff,
        CardType::Misprint,
        CardType::ShatteredHolo,
        CardType::MasterBall,
        CardType::PokeBall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Normal => "Normal",
            CardType::Foil => "Foil",
            CardType::ReverseFoil => "Reverse Foil",
            CardType::Signed => "Signed",
            CardType::Promo => "Promo",
            CardType::Textless => "Textless",
            CardType::Altered => "Altered",
            CardType::PreRelease => "Pre Release",
            CardType::FirstEdition => "First Edition",
            CardType::Shadowless => "Shadowless",
            CardType::Staff => "Staff",
            CardType::Misprint => "Misprint",
            CardType::ShatteredHolo => "Shattered Holo",
            CardType::MasterBall => "Master Ball",
            CardType::PokeBall => "Poke Ball",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// A card stored in a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub list_id: String,
    pub name: String,
    pub photo_url: String,
    pub card_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_total: Option<i64>,
    pub language: Language,
    pub condition: Condition,
    pub card_type: CardType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grading_note: Option<i64>,
    pub owned: bool,
    pub card_order: i64,
}

/// A card together with the name of the list that owns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardDetail {
    #[serde(flatten)]
    pub card: Card,
    pub list_name: String,
}

/// A card as served to the read-only view, with display-ready photo URLs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    #[serde(flatten)]
    pub card: Card,
    pub display_url: String,
    pub thumbnail_url: String,
}

/// A viewed card together with the name of the list that owns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CardDetailView {
    #[serde(flatten)]
    pub card: CardView,
    pub list_name: String,
}

/// Editable card attributes, shared by create and edit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAttributes {
    pub name: String,
    pub card_number: String,
    #[serde(default)]
    pub collection_total: Option<i64>,
    pub language: Language,
    pub condition: Condition,
    #[serde(default)]
    pub card_type: CardType,
    #[serde(default)]
    pub grading_note: Option<i64>,
    #[serde(default)]
    pub owned: bool,
}

/// Request body for adding a card whose photo has already been uploaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardRequest {
    pub photo_url: String,
    #[serde(flatten)]
    pub attributes: CardAttributes,
}

/// Direction of a one-step reorder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Request body for moving a card one step.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCardRequest {
    pub direction: MoveDirection,
}
