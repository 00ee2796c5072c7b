use serde::{Deserialize, Serialize};

/// Type tag a raw record must carry to be admitted into the catalog
pub const APP_TYPE_TAG: &str = "app";

const STEAM_IMAGE_BASE: &str = "https://cdn.akamai.steamstatic.com/steam/apps";

/// A game in the catalog, as served to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Game {
    /// Dense 1-based identifier assigned at load time
    pub id: u32,
    pub name: String,
    #[serde(rename = "game_description", default)]
    pub description: String,
    #[serde(rename = "original_price", default)]
    pub price_label: String,
    #[serde(rename = "all_reviews", default)]
    pub reviews_summary: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub url: String,
    /// Store header image, derived from `url` when it points at a store page
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Game {
    /// Builds a catalog entry from a raw record and the id assigned by the store
    pub fn from_raw(id: u32, raw: RawRecord) -> Self {
        let url = raw.url.unwrap_or_default();
        let image_url = steam_app_id(&url).map(|app_id| format!("{STEAM_IMAGE_BASE}/{app_id}/header.jpg"));

        Self {
            id,
            name: raw.name.unwrap_or_default(),
            description: raw.game_description.unwrap_or_default(),
            price_label: raw.original_price.unwrap_or_default(),
            reviews_summary: raw.all_reviews.unwrap_or_default(),
            genres: raw.genres.map(TagList::into_vec).unwrap_or_default(),
            types: raw.types.map(TagList::into_vec).unwrap_or_default(),
            url,
            image_url,
        }
    }
}

/// One record as it appears in the pre-built catalog data file
///
/// Any `id` present in the file is ignored; the store numbers entries itself.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub game_description: Option<String>,
    #[serde(default)]
    pub original_price: Option<String>,
    #[serde(default)]
    pub all_reviews: Option<String>,
    #[serde(default)]
    pub genres: Option<TagList>,
    #[serde(default)]
    pub types: Option<TagList>,
    #[serde(default)]
    pub url: Option<String>,
}

impl RawRecord {
    /// Whether the record is tagged as an app and belongs in the catalog
    pub fn is_app(&self) -> bool {
        self.types
            .as_ref()
            .is_some_and(|types| types.iter().any(|t| t == APP_TYPE_TAG))
    }
}

/// Genre or type tags: either the source's comma-separated string or a pre-split list
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TagList {
    Joined(String),
    Split(Vec<String>),
}

impl TagList {
    fn iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            TagList::Joined(s) => Box::new(s.split(',').map(str::trim).filter(|t| !t.is_empty())),
            TagList::Split(tags) => Box::new(tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty())),
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }
}

/// Extracts the numeric app id from a store URL like `https://store.steampowered.com/app/123456/Name/`
pub fn steam_app_id(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("/app/")?;
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];

    (!digits.is_empty()).then_some(digits)
}
