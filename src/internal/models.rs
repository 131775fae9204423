use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::utils::title::normalize_title;

/// Description shown on cards for entries that do not carry one. Display
/// only; search never sees it.
pub const DEFAULT_DESCRIPTION: &str = "Open the guide";
/// Category used for entries that do not carry one.
pub const DEFAULT_CATEGORY: &str = "general";
/// Date assumed for entries with a missing or unparsable `dateAdded`.
pub const DEFAULT_DATE: Date = jiff::civil::date(2024, 1, 1);

/// One catalog entry as it appears in `pages.json`.
///
/// Everything but `file` is optional; the `effective_*` accessors apply the
/// display defaults without touching the stored fields.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct PageDescriptor {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "dateAdded")]
    pub date_added: Option<String>,
}

impl PageDescriptor {
    pub fn new(
        file: &str,
        title: &str,
        description: &str,
        category: &str,
        date_added: &str,
    ) -> Self {
        Self {
            file: file.to_string(),
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            category: Some(category.to_string()),
            date_added: Some(date_added.to_string()),
        }
    }

    /// A bare entry with only a file name, everything else defaulted.
    pub fn from_file(file: &str) -> Self {
        Self {
            file: file.to_string(),
            ..Default::default()
        }
    }

    /// Explicit title if present and non-blank, otherwise one derived from `file`.
    pub fn effective_title(&self) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => normalize_title(&self.file),
        }
    }

    pub fn effective_description(&self) -> &str {
        match self.description.as_deref() {
            Some(desc) if !desc.trim().is_empty() => desc,
            _ => DEFAULT_DESCRIPTION,
        }
    }

    pub fn effective_category(&self) -> &str {
        match self.category.as_deref() {
            Some(cat) if !cat.trim().is_empty() => cat,
            _ => DEFAULT_CATEGORY,
        }
    }

    /// `dateAdded` parsed strictly as `YYYY-MM-DD`; anything else is the default date.
    pub fn effective_date(&self) -> Date {
        self.date_added
            .as_deref()
            .and_then(|raw| raw.trim().parse::<Date>().ok())
            .unwrap_or(DEFAULT_DATE)
    }
}

/// The manifest compiled into the binary, used whenever the remote copy
/// cannot be fetched or parsed.
pub fn fallback_manifest() -> Vec<PageDescriptor> {
    vec![
        PageDescriptor::new(
            "EthicalHacking.html",
            "Ethical Hacking",
            "Start here for a practical security testing roadmap.",
            "security",
            "2024-01-15",
        ),
        PageDescriptor::new(
            "InformationSecurityCareerRoadmap.html",
            "Information Security Career Roadmap",
            "Roles, skills, and steps from beginner to architect.",
            "security",
            "2024-01-20",
        ),
        PageDescriptor::new(
            "InteractiveDIKWHierarchyExplorer.html",
            "Interactive DIKW Hierarchy Explorer",
            "From data to wisdom with hands-on examples.",
            "general",
            "2024-02-01",
        ),
        PageDescriptor::new(
            "InteractiveGuidetoLearningMethods.html",
            "Interactive Guide to Learning Methods",
            "Techniques that help you learn faster and better.",
            "general",
            "2024-02-05",
        ),
        PageDescriptor::new(
            "InteractiveGuidetoMachineLearning.html",
            "Interactive Guide to Machine Learning",
            "A guided tour of core ML ideas.",
            "ml",
            "2024-02-10",
        ),
        PageDescriptor::new(
            "ML.html",
            "Machine Learning Roadmap",
            "Pathways, tools, and projects.",
            "ml",
            "2024-02-15",
        ),
        PageDescriptor::new(
            "knowledge-webpage.html",
            "Knowledge Webpage",
            "A general knowledge hub and notes.",
            "general",
            "2024-02-20",
        ),
    ]
}
