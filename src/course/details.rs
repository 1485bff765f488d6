use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
    AllLevels,
}

impl CourseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::AllLevels => "all-levels",
        }
    }

    /// Lenient parse for persisted values; anything unknown is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            "all-levels" => Some(Self::AllLevels),
            _ => None,
        }
    }
}

impl std::fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Course metadata as edited by the instructor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseDetails {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub level: Option<CourseLevel>,
    pub featured_image: Option<String>,
    pub published: bool,
}

/// One typed field of [`CourseDetails`], used for field-by-field edits.
#[derive(Debug, Clone, PartialEq)]
pub enum CourseField {
    Title(String),
    Description(Option<String>),
    Category(String),
    Level(Option<CourseLevel>),
    FeaturedImage(Option<String>),
    Published(bool),
}

impl CourseDetails {
    pub fn apply(&mut self, field: CourseField) {
        match field {
            CourseField::Title(title) => self.title = title,
            CourseField::Description(description) => self.description = description,
            CourseField::Category(category) => self.category = category,
            CourseField::Level(level) => self.level = level,
            CourseField::FeaturedImage(image) => self.featured_image = image,
            CourseField::Published(published) => self.published = published,
        }
    }

    /// Status column value derived from the publish flag.
    pub fn status(&self) -> &'static str {
        if self.published { "published" } else { "draft" }
    }
}
