use serde::{Deserialize, Serialize};

/// A story as supplied by the authoring app. Field names follow its camelCase JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub title: String,
    pub genre: String,
    /// Free-form, e.g. "7 minutes read".
    pub read_time: String,
    /// Paragraphs separated by blank lines; single newlines are soft breaks.
    pub body: String,
    #[serde(default)]
    pub hero_image: Option<HeroImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroImage {
    pub url: String,
    #[serde(default)]
    pub alignment: Option<Alignment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}
