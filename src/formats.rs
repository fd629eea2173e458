use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A value that is either recorded or explicitly not known yet.
///
/// Serialises as the bare value or `null`, so it reads like an `Option` on the
/// wire while keeping "no value recorded" distinct from any literal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Knowable<T> {
    Known(T),
    Unknown,
}

impl<T> Default for Knowable<T> {
    fn default() -> Self {
        Self::Unknown
    }
}

impl<T> Knowable<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unknown => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Known(value) => Some(value),
            Self::Unknown => None,
        }
    }
}

impl<T> From<Option<T>> for Knowable<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Known(value),
            None => Self::Unknown,
        }
    }
}

impl<T: Serialize> Serialize for Knowable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_known().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Knowable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseType {
    #[default]
    Theatrical,
    Ott,
    PastOtt,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastEntry {
    pub name: String,
    pub role: Option<String>,
}

/// Digital-distribution details. The extractor only ever fills `platform`;
/// `date` must come from the caller (stored record or release feed).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct OttReleaseInfo {
    #[serde(default)]
    pub platform: Knowable<String>,
    #[serde(default)]
    pub date: Knowable<NaiveDate>,
}

/// Response body of the content API page endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: String,
    #[serde(default)]
    pub source: String,
}

/// Fields scraped from one encyclopedia article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedMovie {
    pub title: String,
    pub language: String,
    pub runtime: Option<String>,
    pub budget: Option<String>,
    pub box_office: Option<String>,
    pub director: Option<String>,
    pub producer: Option<String>,
    pub production_company: Option<String>,
    pub music: Option<String>,
    pub cinematography: Option<String>,
    pub editing: Option<String>,
    pub writer: Vec<String>,
    pub cast: Vec<CastEntry>,
    pub filming_locations: Vec<String>,
    pub plot: Option<String>,
    pub ott_release: Option<OttReleaseInfo>,
    pub source_url: String,
}

/// The locally curated movie document. Editors' values here always win over
/// anything scraped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoredMovie {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub release_type: Option<ReleaseType>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub writer: Vec<String>,
    #[serde(default)]
    pub production_company: Option<String>,
    #[serde(default)]
    pub editing: Option<String>,
    #[serde(default)]
    pub music: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub box_office: Option<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub filming_locations: Vec<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub ott_release: Option<OttReleaseInfo>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct License {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LatestUpdate {
    pub id: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedMovieRecord {
    pub id: String,
    pub key: String,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub release_type: ReleaseType,
    pub language: String,
    pub runtime: String,
    pub country: String,
    pub director: Option<String>,
    pub writer: Vec<String>,
    pub producer: Option<String>,
    pub production_company: Option<String>,
    pub cinematography: Option<String>,
    pub editing: Option<String>,
    pub music: Option<String>,
    pub budget: Option<String>,
    pub box_office: Option<String>,
    pub cast: Vec<CastEntry>,
    pub filming_locations: Vec<String>,
    pub plot: Option<String>,
    pub ott_release: Option<OttReleaseInfo>,
    pub image_url: String,
    pub license: License,
    pub source_url: String,
    pub latest_update: LatestUpdate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knowable_serializes_like_an_option() -> anyhow::Result<()> {
        let info = OttReleaseInfo {
            platform: Knowable::Known("Netflix".to_owned()),
            date: Knowable::Unknown,
        };
        let json = serde_json::to_value(&info)?;
        assert_eq!(
            json,
            serde_json::json!({ "platform": "Netflix", "date": null })
        );

        let back: OttReleaseInfo = serde_json::from_value(json)?;
        assert_eq!(back, info);
        Ok(())
    }

    #[test]
    fn missing_ott_fields_deserialize_as_unknown() -> anyhow::Result<()> {
        let info: OttReleaseInfo = serde_json::from_str("{}")?;
        assert_eq!(info.platform, Knowable::Unknown);
        assert_eq!(info.date, Knowable::Unknown);
        Ok(())
    }

    #[test]
    fn release_type_uses_upper_snake_case() -> anyhow::Result<()> {
        assert_eq!(
            serde_json::to_string(&ReleaseType::PastOtt)?,
            "\"PAST_OTT\""
        );
        Ok(())
    }
}
