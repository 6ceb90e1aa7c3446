use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Output language for generated text and user-facing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }

    /// English name, used inside prompts.
    pub fn english_name(self) -> &'static str {
        match self {
            Language::Fr => "French",
            Language::En => "English",
        }
    }

    pub fn translations(self) -> &'static Translations {
        match self {
            Language::Fr => &FRENCH,
            Language::En => &ENGLISH,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Language::Fr),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

#[derive(Debug)]
pub struct Translations {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub new_story: &'static str,
    pub try_another: &'static str,
    pub footer: &'static str,
    pub error_load: &'static str,
    pub error_generate: &'static str,
    pub loading: &'static str,
    pub proclamation: &'static str,
    pub gazette: &'static str,
}

static FRENCH: Translations = Translations {
    title: "Chroniques du Passé",
    subtitle: "Où les esprits d'antan commentent les nouvelles d'aujourd'hui",
    new_story: "Autre Gazette",
    try_another: "Consulter un autre esprit :",
    footer: "Transcrit par Ye Olde Oracle Mécanique • Nouvelles du Royaume",
    error_load: "Hélas ! Les pigeons voyageurs se sont égarés.",
    error_generate: "Les esprits refusent de se manifester. Réessayez.",
    loading: "Invocation des esprits d'antan...",
    proclamation: "PROCLAMATION",
    gazette: "LA GAZETTE DES SIÈCLES",
};

static ENGLISH: Translations = Translations {
    title: "Chronicles of Yore",
    subtitle: "Where spirits of old opine upon today's tidings",
    new_story: "New Gazette",
    try_another: "Consult another spirit:",
    footer: "Transcribed by Ye Mechanical Oracle • Tidings from the Realm",
    error_load: "Alas! The carrier pigeons have gone astray.",
    error_generate: "The spirits refuse to manifest. Pray try again.",
    loading: "Summoning spirits of old...",
    proclamation: "PROCLAMATION",
    gazette: "THE GAZETTE OF AGES",
};
