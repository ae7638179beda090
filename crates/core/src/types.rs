use std::{fmt, str::FromStr};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Keeps only lowercase alphanumerics so "How-to", "how to" and "HOWTO" compare equal.
fn normalize_choice(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Declares a closed set of form choices with a display label and a short slug.
///
/// Labels are what the prompts interpolate and what serde writes; the slug is
/// the spelling offered on the command line. Parsing accepts either.
macro_rules! labeled_choice {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => ($slug:literal, $label:literal)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn slug(&self) -> &'static str {
                match self {
                    $($name::$variant => $slug,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize_choice(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| normalize_choice(v.slug()) == wanted || normalize_choice(v.label()) == wanted)
                    .ok_or_else(|| {
                        let expected: Vec<&str> = Self::ALL.iter().map(|v| v.slug()).collect();
                        format!("unknown value '{}', expected one of: {}", s, expected.join(", "))
                    })
            }
        }
    };
}

labeled_choice! {
    /// Kind of video being produced.
    VideoType {
        Tutorial => ("tutorial", "Tutorial"),
        Review => ("review", "Review"),
        Entertainment => ("entertainment", "Entertainment"),
        Educational => ("educational", "Educational"),
        Gaming => ("gaming", "Gaming"),
        Vlog => ("vlog", "Vlog"),
        HowTo => ("how-to", "How-to"),
        Unboxing => ("unboxing", "Unboxing"),
        Reaction => ("reaction", "Reaction"),
        Other => ("other", "Other"),
    }
}

labeled_choice! {
    TargetAudience {
        General => ("general", "General"),
        Beginners => ("beginners", "Beginners"),
        Intermediate => ("intermediate", "Intermediate"),
        Advanced => ("advanced", "Advanced"),
        Professionals => ("professionals", "Professionals"),
        Students => ("students", "Students"),
        Kids => ("kids", "Kids"),
        Teens => ("teens", "Teens"),
        Adults => ("adults", "Adults"),
    }
}

labeled_choice! {
    Tone {
        Professional => ("professional", "Professional"),
        Casual => ("casual", "Casual"),
        Energetic => ("energetic", "Energetic"),
        Educational => ("educational", "Educational"),
        Funny => ("funny", "Funny"),
        Serious => ("serious", "Serious"),
        Inspirational => ("inspirational", "Inspirational"),
        Conversational => ("conversational", "Conversational"),
    }
}

labeled_choice! {
    /// Estimated running time bucket.
    VideoLength {
        Under5 => ("under-5", "Under 5 minutes"),
        From5To10 => ("5-10", "5-10 minutes"),
        From10To20 => ("10-20", "10-20 minutes"),
        From20To30 => ("20-30", "20-30 minutes"),
        Over30 => ("30-plus", "30+ minutes"),
    }
}

/// Everything the user filled in for one generation action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub content: String,
    pub video_type: VideoType,
    pub target_audience: TargetAudience,
    pub tone: Tone,
    /// Comma-separated, passed through verbatim.
    pub keywords: String,
    pub style_preferences: String,
    pub channel_info: String,
    pub competitor_keywords: String,
    pub video_length: VideoLength,
}

/// One of the four independent generation tasks, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStep {
    Titles,
    Description,
    Tags,
    Thumbnails,
}

impl GenerationStep {
    pub const ORDER: [GenerationStep; 4] = [
        GenerationStep::Titles,
        GenerationStep::Description,
        GenerationStep::Tags,
        GenerationStep::Thumbnails,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GenerationStep::Titles => "titles",
            GenerationStep::Description => "description",
            GenerationStep::Tags => "tags",
            GenerationStep::Thumbnails => "thumbnail concepts",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    /// False when the response had no section markers and only `all` is filled.
    pub categorized: bool,
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub trending: Vec<String>,
    pub all: Vec<String>,
}

impl TagSet {
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
            && self.primary.is_empty()
            && self.secondary.is_empty()
            && self.trending.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMetrics {
    pub word_count: usize,
    pub char_count: usize,
    pub reading_time_minutes: usize,
    pub top_keywords: Vec<(String, usize)>,
}

/// What a single run produced, recorded in the generation history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSummary {
    pub titles: usize,
    pub description: bool,
    pub tags: usize,
    pub thumbnails: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub video_type: VideoType,
    pub keywords: String,
    pub generated: GeneratedSummary,
}
