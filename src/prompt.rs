use crate::figures::{CandidateFigure, Persona};
use crate::i18n::Language;

/// Prompt for a single figure reacting in character. Plain text output.
pub fn in_character(persona: &Persona, headline: &str, language: Language) -> String {
    format!(
        "You are {name}, the famous {title} from {era}.\n\
         You have just been told about this modern news headline: \"{headline}\"\n\n\
         Your personality: {personality}\n\n\
         React to this news as if you were really {name}. Be:\n\
         - Anachronistic (interpret through your historical lens)\n\
         - Funny and witty\n\
         - In character (use speech patterns fitting your era)\n\
         - Brief (2-3 sentences max)\n\n\
         IMPORTANT: You MUST respond in {language}.\n\n\
         Your hot take:",
        name = persona.name,
        title = persona.title,
        era = persona.era,
        personality = persona.personality,
        headline = headline,
        language = language.english_name(),
    )
}

/// Prompt asking the model to pick the funniest candidate and react as them.
pub fn best_of_catalog(headline: &str, candidates: &[CandidateFigure], language: Language) -> String {
    let mut result = String::with_capacity(headline.len() + candidates.len() * 240 + 900);
    result.push_str(
        "You are a comedy writer. Given this news headline and a list of historical figures, \
         pick the ONE figure who would give the FUNNIEST reaction to this news.\n\n",
    );
    result.push_str(&format!("NEWS HEADLINE: \"{}\"\n\n", headline));
    result.push_str("AVAILABLE FIGURES:\n");
    for figure in candidates {
        result.push_str(&format!(
            "- ID: \"{}\" | {} ({}, {}): {}\n",
            figure.id, figure.name, figure.title, figure.era, figure.personality
        ));
    }
    result.push_str(
        "\nYour task:\n\
         1. Pick the figure whose personality/era creates the funniest contrast with this modern news\n\
         2. Write their reaction as that character (2-3 sentences, in their voice, anachronistic and witty)\n\n",
    );
    result.push_str(&format!(
        "IMPORTANT: The hot_take MUST be written in {}.\n\n",
        language.english_name()
    ));
    result.push_str(
        "Respond with ONLY this exact single-line JSON object, with no surrounding text, no markdown and no code blocks:\n\
         {\"figure_id\": \"the-id-here\", \"hot_take\": \"The funny reaction here\"}",
    );
    result
}

/// Prompt asking the model to invent any historical figure and react as them.
pub fn open_catalog(headline: &str, language: Language) -> String {
    format!(
        "You are a comedy writer. Given this news headline, think of the FUNNIEST historical figure who could react to it.\n\n\
         NEWS HEADLINE: \"{headline}\"\n\n\
         Your task:\n\
         1. Think of ANY historical figure from history whose personality/era would create the funniest contrast with this modern news\n\
         2. Be creative! Consider politicians, artists, scientists, warriors, philosophers, royalty, inventors, etc.\n\
         3. Write their reaction as that character (2-3 sentences, in their voice, anachronistic and witty)\n\
         4. Pick an appropriate emoji that represents this figure\n\n\
         IMPORTANT: All text fields (name, title, hot_take) MUST be written in {language}.\n\n\
         Respond with ONLY this exact single-line JSON object, with no surrounding text, no markdown and no code blocks:\n\
         {{\"name\": \"Full Name\", \"title\": \"Their historical title\", \"era\": \"Birth-Death years\", \"avatar\": \"single emoji\", \"hot_take\": \"The funny reaction here\"}}",
        headline = headline,
        language = language.english_name(),
    )
}
