use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Avatar used when the model invents a figure without one.
pub const DEFAULT_AVATAR: &str = "🎭";

/// A figure from the fixed catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFigure {
    pub id: String,
    pub name: String,
    pub title: String,
    pub era: String,
    pub avatar: String,
    pub personality: String,
    pub funniest_rank: u8,
}

/// A figure the model made up for one headline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedFigure {
    pub name: String,
    pub title: String,
    pub era: String,
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Figure {
    Catalog(CatalogFigure),
    Generated(GeneratedFigure),
}

impl Figure {
    pub fn name(&self) -> &str {
        match self {
            Figure::Catalog(f) => &f.name,
            Figure::Generated(f) => &f.name,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Figure::Catalog(f) => &f.title,
            Figure::Generated(f) => &f.title,
        }
    }

    pub fn era(&self) -> &str {
        match self {
            Figure::Catalog(f) => &f.era,
            Figure::Generated(f) => &f.era,
        }
    }

    pub fn avatar(&self) -> &str {
        match self {
            Figure::Catalog(f) => &f.avatar,
            Figure::Generated(f) => &f.avatar,
        }
    }

    /// Catalog id, if this figure came from the catalog.
    pub fn catalog_id(&self) -> Option<&str> {
        match self {
            Figure::Catalog(f) => Some(&f.id),
            Figure::Generated(_) => None,
        }
    }
}

/// Wire shape of a catalog figure offered to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateFigure {
    pub id: String,
    pub name: String,
    pub title: String,
    pub era: String,
    pub personality: String,
}

/// Wire shape of the figure voicing a single in-character take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub title: String,
    pub era: String,
    pub personality: String,
}

impl CatalogFigure {
    pub fn as_candidate(&self) -> CandidateFigure {
        CandidateFigure {
            id: self.id.clone(),
            name: self.name.clone(),
            title: self.title.clone(),
            era: self.era.clone(),
            personality: self.personality.clone(),
        }
    }

    pub fn as_persona(&self) -> Persona {
        Persona {
            name: self.name.clone(),
            title: self.title.clone(),
            era: self.era.clone(),
            personality: self.personality.clone(),
        }
    }
}

fn entry(id: &str, name: &str, era: &str, title: &str, avatar: &str, personality: &str, rank: u8) -> CatalogFigure {
    CatalogFigure {
        id: id.to_string(),
        name: name.to_string(),
        title: title.to_string(),
        era: era.to_string(),
        avatar: avatar.to_string(),
        personality: personality.to_string(),
        funniest_rank: rank,
    }
}

static CATALOG: Lazy<Vec<CatalogFigure>> = Lazy::new(|| {
    vec![
        entry(
            "shakespeare", "William Shakespeare", "1564-1616", "The Bard of Avon", "🎭",
            "Poetic, dramatic, prone to wordplay and puns, sees the human condition in everything. Often quotes himself or speaks in iambic pentameter.",
            1,
        ),
        entry(
            "socrates", "Socrates", "470-399 BC", "Greek Philosopher", "🧔",
            "Questioning everything, answers questions with more questions, philosophical, loves irony and exposing contradictions. Often says 'I know that I know nothing.'",
            2,
        ),
        entry(
            "napoleon", "Napoleon Bonaparte", "1769-1821", "Emperor of the French", "👑",
            "Ambitious, strategic, dramatic, prone to grand declarations about conquest and destiny. Speaks with confidence and military metaphors.",
            3,
        ),
        entry(
            "marie-antoinette", "Marie Antoinette", "1755-1793", "Queen of France", "🎀",
            "Extravagant, fashionable, somewhat out of touch with common concerns, loves luxury and parties. Often misunderstood but genuinely cares about her image.",
            4,
        ),
        entry(
            "caesar", "Julius Caesar", "100-44 BC", "Roman Dictator", "🏛️",
            "Bold, decisive, speaks in third person occasionally, references Rome's glory, military campaigns, and the Senate. Confident to the point of arrogance.",
            5,
        ),
        entry(
            "genghis", "Genghis Khan", "1162-1227", "Founder of the Mongol Empire", "🐎",
            "Direct, pragmatic, values loyalty and strength above all. Sees problems in terms of conquest and unity. References the steppes and horseback riding.",
            6,
        ),
        entry(
            "leonardo", "Leonardo da Vinci", "1452-1519", "Renaissance Polymath", "🎨",
            "Endlessly curious, inventor, artist, scientist. Sees connections between art and science everywhere. Often gets distracted by new ideas mid-sentence.",
            7,
        ),
        entry(
            "cleopatra", "Cleopatra VII", "69-30 BC", "Queen of Egypt", "👸",
            "Cunning, sophisticated, politically astute, charming. References the Nile, pyramids, and the glory of Egypt. Master of diplomacy and intrigue.",
            8,
        ),
    ]
});

/// The full read-only catalog, in declaration order.
pub fn catalog() -> &'static [CatalogFigure] {
    &CATALOG
}

pub fn find(id: &str) -> Option<&'static CatalogFigure> {
    CATALOG.iter().find(|f| f.id == id)
}

/// Resolves an id against the catalog, falling back to the first entry.
pub fn find_or_first(id: &str) -> &'static CatalogFigure {
    find(id).unwrap_or(&CATALOG[0])
}

/// The figures offered for switching: the `limit` funniest by rank.
pub fn switcher_figures(limit: usize) -> Vec<&'static CatalogFigure> {
    let mut ranked: Vec<&'static CatalogFigure> = CATALOG.iter().collect();
    ranked.sort_by_key(|f| f.funniest_rank);
    ranked.truncate(limit);
    ranked
}

pub fn catalog_candidates() -> Vec<CandidateFigure> {
    CATALOG.iter().map(CatalogFigure::as_candidate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let ids: HashSet<&str> = catalog().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids.len(), catalog().len());
        assert_eq!(catalog().len(), 8);
    }

    #[test]
    fn test_find_or_first_falls_back() {
        assert_eq!(find_or_first("napoleon").name, "Napoleon Bonaparte");
        assert_eq!(find_or_first("unknown-id").id, "shakespeare");
    }

    #[test]
    fn test_switcher_takes_top_five_by_rank() {
        let ids: Vec<&str> = switcher_figures(5).iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["shakespeare", "socrates", "napoleon", "marie-antoinette", "caesar"]);
    }

    #[test]
    fn test_figure_union_is_tagged() {
        let figure = Figure::Generated(GeneratedFigure {
            name: "Ada Lovelace".into(),
            title: "Countess".into(),
            era: "1815-1852".into(),
            avatar: "🧮".into(),
        });
        let value = serde_json::to_value(&figure).unwrap();
        assert_eq!(value["kind"], "generated");
        assert_eq!(figure.catalog_id(), None);
        let catalog_figure = Figure::Catalog(find_or_first("caesar").clone());
        assert_eq!(catalog_figure.catalog_id(), Some("caesar"));
    }
}
