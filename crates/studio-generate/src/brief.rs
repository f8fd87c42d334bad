//! Content briefs: what the writer is asked to produce.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use studio_core::{Error, Result};

/// Blog category of a generated post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    /// Sales.
    #[default]
    Sales,
    /// Marketing.
    Marketing,
    /// Branding.
    Branding,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 3] = [Self::Sales, Self::Marketing, Self::Branding];

    /// Display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sales => "Sales",
            Self::Marketing => "Marketing",
            Self::Branding => "Branding",
        }
    }
}

/// Writing voice of a generated post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tone {
    /// Expert and confident.
    #[default]
    Authoritative,
    /// Friendly and story-driven.
    Conversational,
    /// Analytical and precise.
    #[serde(rename = "Data-Driven")]
    DataDriven,
    /// Energetic and action-oriented.
    Motivational,
}

impl Tone {
    /// Every tone, in display order.
    pub const ALL: [Self; 4] = [
        Self::Authoritative,
        Self::Conversational,
        Self::DataDriven,
        Self::Motivational,
    ];

    /// Display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authoritative => "Authoritative",
            Self::Conversational => "Conversational",
            Self::DataDriven => "Data-Driven",
            Self::Motivational => "Motivational",
        }
    }

    /// Short style guide for the tone.
    pub fn style(&self) -> &'static str {
        match self {
            Self::Authoritative => "expert, data-backed, confident",
            Self::Conversational => "friendly, relatable, story-driven",
            Self::DataDriven => "stats-heavy, analytical, precise",
            Self::Motivational => "energetic, inspiring, action-oriented",
        }
    }
}

macro_rules! display_and_parse {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            /// Case-insensitive match on the display name. Blank input
            /// gives the default.
            fn from_str(s: &str) -> Result<Self> {
                let s = s.trim();
                if s.is_empty() {
                    return Ok(Self::default());
                }
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        let expected: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        Error::invalid_input(format!(
                            concat!("Unknown ", $what, " '{}' (expected one of: {})"),
                            s,
                            expected.join(", ")
                        ))
                    })
            }
        }
    };
}

display_and_parse!(Category, "category");
display_and_parse!(Tone, "tone");

/// Validated generation parameters.
///
/// Construction guarantees a non-blank topic. Fields are read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentBrief {
    topic: String,
    category: Category,
    tone: Tone,
    #[serde(skip_serializing_if = "Option::is_none")]
    keywords: Option<String>,
}

impl ContentBrief {
    /// Message returned for a missing or blank topic.
    pub const TOPIC_REQUIRED: &'static str = "Topic is required";

    /// A brief with default category and tone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when `topic` is blank.
    pub fn new(topic: impl Into<String>) -> Result<Self> {
        let topic = topic.into().trim().to_string();
        if topic.is_empty() {
            return Err(Error::invalid_input(Self::TOPIC_REQUIRED));
        }
        Ok(Self {
            topic,
            category: Category::default(),
            tone: Tone::default(),
            keywords: None,
        })
    }

    /// Set the category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the tone.
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Set keywords; blank text clears them.
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        let keywords = keywords.into().trim().to_string();
        self.keywords = (!keywords.is_empty()).then_some(keywords);
        self
    }

    /// The subject of the post.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Target category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Target tone.
    pub fn tone(&self) -> Tone {
        self.tone
    }

    /// Keywords to weave in, if any.
    pub fn keywords(&self) -> Option<&str> {
        self.keywords.as_deref()
    }
}

/// A brief as it arrives over the wire: every field optional, strings only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefRequest {
    /// Required; blank is rejected.
    #[serde(default)]
    pub topic: Option<String>,
    /// Category display name.
    #[serde(default)]
    pub category: Option<String>,
    /// Tone display name.
    #[serde(default)]
    pub tone: Option<String>,
    /// Free text.
    #[serde(default)]
    pub keywords: Option<String>,
}

impl From<&ContentBrief> for BriefRequest {
    fn from(brief: &ContentBrief) -> Self {
        Self {
            topic: Some(brief.topic.clone()),
            category: Some(brief.category.to_string()),
            tone: Some(brief.tone.to_string()),
            keywords: brief.keywords.clone(),
        }
    }
}

impl TryFrom<BriefRequest> for ContentBrief {
    type Error = Error;

    fn try_from(request: BriefRequest) -> Result<Self> {
        let brief = ContentBrief::new(request.topic.unwrap_or_default())?
            .with_category(request.category.as_deref().unwrap_or_default().parse()?)
            .with_tone(request.tone.as_deref().unwrap_or_default().parse()?);
        Ok(match request.keywords {
            Some(keywords) => brief.with_keywords(keywords),
            None => brief,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_topic_rejected() {
        for topic in ["", "   ", "\n\t"] {
            let err = ContentBrief::new(topic).unwrap_err();
            assert!(err.is_input());
            assert_eq!(err.to_string(), "Topic is required");
        }
    }

    #[test]
    fn test_defaults() {
        let brief = ContentBrief::new("  Cold outreach  ").unwrap();
        assert_eq!(brief.topic(), "Cold outreach");
        assert_eq!(brief.category(), Category::Sales);
        assert_eq!(brief.tone(), Tone::Authoritative);
        assert_eq!(brief.keywords(), None);
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("branding".parse::<Category>().unwrap(), Category::Branding);
        assert_eq!("DATA-DRIVEN".parse::<Tone>().unwrap(), Tone::DataDriven);
        assert_eq!("".parse::<Tone>().unwrap(), Tone::Authoritative);
        assert_eq!(" ".parse::<Category>().unwrap(), Category::Sales);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "Finance".parse::<Category>().unwrap_err();
        assert!(err.is_input());
        assert!(err.to_string().contains("Sales, Marketing, Branding"));
        assert!("Sarcastic".parse::<Tone>().is_err());
    }

    #[test]
    fn test_keywords_blank_cleared() {
        let brief = ContentBrief::new("x").unwrap().with_keywords("   ");
        assert_eq!(brief.keywords(), None);
        let brief = brief.with_keywords(" crm, pipeline ");
        assert_eq!(brief.keywords(), Some("crm, pipeline"));
    }

    #[test]
    fn test_from_request() {
        let request: BriefRequest = serde_json::from_str(
            r#"{"topic":"Brand voice","category":"Branding","tone":"Data-Driven","keywords":""}"#,
        )
        .unwrap();
        let brief = ContentBrief::try_from(request).unwrap();
        assert_eq!(brief.category(), Category::Branding);
        assert_eq!(brief.tone(), Tone::DataDriven);
        assert_eq!(brief.keywords(), None);
    }

    #[test]
    fn test_from_request_missing_topic() {
        let request: BriefRequest = serde_json::from_str(r#"{"category":"Sales"}"#).unwrap();
        assert!(ContentBrief::try_from(request).unwrap_err().is_input());
    }

    #[test]
    fn test_request_round_trip() {
        let brief = ContentBrief::new("Launch")
            .unwrap()
            .with_category(Category::Marketing)
            .with_tone(Tone::Motivational)
            .with_keywords("growth");
        let request = BriefRequest::from(&brief);
        assert_eq!(request.tone.as_deref(), Some("Motivational"));
        assert_eq!(ContentBrief::try_from(request).unwrap(), brief);
    }

    #[test]
    fn test_serialize_display_names() {
        let brief = ContentBrief::new("x").unwrap().with_tone(Tone::DataDriven);
        let json = serde_json::to_value(&brief).unwrap();
        assert_eq!(json["tone"], "Data-Driven");
        assert_eq!(json["category"], "Sales");
        assert!(json.get("keywords").is_none());
    }
}
