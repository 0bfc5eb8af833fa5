//! Built-in prompt set and prompt file loading
//!
//! The default run submits a fixed set of 57 questions grouped into five categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::config::ConfigError;

/// Prompt categories of the built-in set
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptCategory {
    MythologyScripture,
    PhilosophyTeachings,
    RelationshipsDevotion,
    CulturalImpact,
    ModernContext,
}

impl PromptCategory {
    /// Get category name
    pub fn name(&self) -> &'static str {
        match self {
            PromptCategory::MythologyScripture => "Mythology & Scripture",
            PromptCategory::PhilosophyTeachings => "Philosophy & Teachings",
            PromptCategory::RelationshipsDevotion => "Relationships & Devotion",
            PromptCategory::CulturalImpact => "Cultural Impact & Arts",
            PromptCategory::ModernContext => "Modern Context & Social Teachings",
        }
    }

    /// Short description used in reports
    pub fn description(&self) -> &'static str {
        match self {
            PromptCategory::MythologyScripture => {
                "Ancient texts, birth stories, divine interventions"
            }
            PromptCategory::PhilosophyTeachings => {
                "Bhagavad Gita wisdom, spiritual concepts, liberation"
            }
            PromptCategory::RelationshipsDevotion => "Gopis, Arjuna, family, devotees",
            PromptCategory::CulturalImpact => "Festivals, classical arts, literature, modern culture",
            PromptCategory::ModernContext => "Contemporary relevance, ethics, social justice",
        }
    }

    /// Inclusive range of 1-based prompt numbers in this category
    pub fn range(&self) -> (usize, usize) {
        match self {
            PromptCategory::MythologyScripture => (1, 15),
            PromptCategory::PhilosophyTeachings => (16, 30),
            PromptCategory::RelationshipsDevotion => (31, 40),
            PromptCategory::CulturalImpact => (41, 50),
            PromptCategory::ModernContext => (51, 57),
        }
    }

    /// Get all categories
    pub fn all() -> Vec<PromptCategory> {
        vec![
            PromptCategory::MythologyScripture,
            PromptCategory::PhilosophyTeachings,
            PromptCategory::RelationshipsDevotion,
            PromptCategory::CulturalImpact,
            PromptCategory::ModernContext,
        ]
    }
}

impl fmt::Display for PromptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = self.range();
        write!(f, "{} (Q{start}-{end})", self.name())
    }
}

/// Default prompts submitted when no prompts file is given
pub const BUILTIN_PROMPTS: &[&str] = &[
    // Mythology & Scripture (1-15)
    "What are the main differences between Krishna's role in the Bhagavad Gita versus his depiction in the stories of his childhood and youth in the Puranas?",
    "How does Krishna's relationship with Arjuna exemplify the concepts of duty (dharma) and devotion (bhakti) in Hindu philosophy?",
    "Can you explain the significance of Krishna's role in the Mahabharata war, particularly his decision to become Arjuna's charioteer?",
    "What is the story behind Krishna's birth and how does it relate to the prophecy about Kamsa's death?",
    "How did Krishna's childhood adventures, such as lifting the Govardhan hill, demonstrate his divine nature?",
    "What role does Krishna play in the Vishnu Sahasranama, and how is he described there?",
    "How does Krishna's interaction with the serpent Kaliya illustrate themes of protection and divine intervention?",
    "What is the significance of Krishna's friendship with Sudama in Hindu devotional literature?",
    "How does Krishna's role as a king of Dwarka differ from his pastoral life in Vrindavan?",
    "What are the key events in Krishna's life according to the Vishnu Purana?",
    "How does Krishna's marriage to Rukmini exemplify the concept of divine love in Hindu tradition?",
    "What is the story of Krishna and the Syamantaka jewel, and what does it teach about trust and suspicion?",
    "How did Krishna's teachings influence the development of the concept of avatar in Hindu philosophy?",
    "What role does Krishna play in the Kurukshetra war according to different Hindu texts?",
    "How does Krishna's departure from the world (mahaprasthana) symbolize spiritual liberation?",

    // Philosophy & Teachings (16-30)
    "What philosophical teachings does Krishna impart about the nature of reality, the self, and liberation (moksha) in the Bhagavad Gita?",
    "How does Krishna's concept of time and the cycle of creation and destruction relate to Hindu cosmology?",
    "What does Krishna teach about the three gunas (sattva, rajas, tamas) and their influence on human behavior?",
    "How does Krishna explain the relationship between karma, dharma, and reincarnation?",
    "What is Krishna's teaching about detachment (vairagya) and its importance in spiritual practice?",
    "How does Krishna describe the path of knowledge (jnana yoga) versus the path of action (karma yoga)?",
    "What does Krishna teach about the nature of the soul (atman) and its relationship to Brahman?",
    "How does Krishna's universal form (Vishvarupa) revelation teach about divine omnipresence?",
    "What is Krishna's perspective on caste and social duty according to the Bhagavad Gita?",
    "How does Krishna explain the concept of divine grace (prasada) in spiritual development?",
    "What teachings does Krishna give about meditation and concentration of mind?",
    "How does Krishna describe the qualities of a true devotee (bhakta)?",
    "What is Krishna's teaching about the impermanence of the material world?",
    "How does Krishna explain the relationship between individual soul and universal consciousness?",
    "What does Krishna teach about overcoming desires and attachments?",

    // Relationships & Devotion (31-40)
    "How do Krishna's relationships with the gopis in the Ras Lila stories symbolize spiritual love and divine union?",
    "What is the significance of Radha's relationship with Krishna in Hindu mysticism?",
    "How does Krishna's relationship with his parents, Devaki and Vasudeva, illustrate divine protection?",
    "What role does Krishna play in the stories of the Pandavas' exile and their relationship with him?",
    "How does Krishna's friendship with Arjuna transcend the boundaries of ordinary human relationships?",
    "What is the story of Krishna and Draupadi, and what does it teach about divine justice?",
    "How does Krishna's relationship with Balarama exemplify sibling love and divine companionship?",
    "What is the significance of Krishna's various marriages in Hindu tradition?",
    "How does Krishna's relationship with the Yadava clan reflect themes of loyalty and destiny?",
    "What role does Krishna play in the lives of his devotees according to various Hindu saints?",

    // Cultural Impact & Arts (41-50)
    "In what ways has Krishna's character influenced Indian classical arts, including dance, music, and literature?",
    "How has Krishna Janmashtami evolved as a festival celebrating his birth?",
    "What is the significance of Krishna in Indian classical music traditions like Carnatic and Hindustani?",
    "How has Krishna been depicted in Indian painting and sculpture throughout history?",
    "What role does Krishna play in Indian folk traditions and regional festivals?",
    "How has Krishna influenced modern Indian literature and poetry?",
    "What is the significance of Krishna in Indian cinema and popular culture?",
    "How does Krishna appear in various Indian languages and regional literatures?",
    "What role does Krishna play in Indian performing arts like Kathakali and Bharatanatyam?",
    "How has Krishna's image been adapted in modern Hindu iconography and temple worship?",

    // Modern Context & Social Teachings (51-57)
    "What role does Krishna play in modern Hindu social and ethical teachings regarding caste and equality?",
    "How do Krishna's teachings apply to contemporary issues of gender equality and women's rights?",
    "What is Krishna's relevance to modern environmental and ecological concerns?",
    "How do Krishna's teachings about duty apply to modern professional and work ethics?",
    "What lessons from Krishna's life are relevant to modern leadership and governance?",
    "How does Krishna's philosophy address modern mental health and psychological well-being?",
    "What is Krishna's significance in interfaith dialogue and universal spiritual teachings?",
];

/// Load prompts from a file.
///
/// A `.json` file (or any file whose content starts with `[`) must hold an array
/// of strings. Anything else is read as one prompt per line; blank lines and
/// lines starting with `#` are ignored.
pub fn load_prompts_file(path: impl AsRef<Path>) -> Result<Vec<String>, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PromptsFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let is_json = path.extension().map(|e| e == "json").unwrap_or(false)
        || content.trim_start().starts_with('[');

    if is_json {
        return serde_json::from_str::<Vec<String>>(&content).map_err(|e| {
            ConfigError::PromptsFile {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        });
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
