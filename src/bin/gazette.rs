use clap::Parser;
use chronicles_of_yore::{
    client::HttpGazetteClient,
    figures::{self, Figure},
    i18n::Language,
    logging::configure_logging,
    session::{Orchestrator, Phase, Session, Variant},
};

/// Prints a historical figure's reaction to a random headline.
#[derive(Parser, Debug)]
#[command(name = "gazette", version, about)]
struct Cli {
    /// Base URL of the running gazette server
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Output language (fr or en)
    #[arg(long, default_value = "fr")]
    language: Language,

    /// After the first take, ask this catalog figure to react instead
    #[arg(long)]
    figure: Option<String>,

    /// Let the model invent a figure instead of choosing from the catalog
    #[arg(long, conflicts_with = "figure")]
    invent: bool,

    /// Number of extra stories to print after the first one
    #[arg(long, default_value_t = 0)]
    more: u32,

    /// List the catalog figures and exit
    #[arg(long)]
    list_figures: bool,
}

#[tokio::main]
async fn main() {
    configure_logging("warn");
    let cli = Cli::parse();

    if cli.list_figures {
        for figure in figures::catalog() {
            println!("{:<18} {} {} ({}, {})", figure.id, figure.avatar, figure.name, figure.title, figure.era);
        }
        return;
    }

    let variant = if cli.invent { Variant::Open } else { Variant::Catalog };
    let orchestrator = Orchestrator::with_variant(HttpGazetteClient::new(cli.server), cli.language, variant);
    let t = cli.language.translations();
    println!("{}", t.loading);

    orchestrator.initial_load().await;
    render(&orchestrator.snapshot());

    if let Some(id) = cli.figure {
        if orchestrator.switch_figure(&id).await {
            render(&orchestrator.snapshot());
        } else {
            eprintln!("{} (--figure {})", t.try_another, id);
            for figure in figures::switcher_figures(5) {
                eprintln!("  {} {}", figure.avatar, figure.id);
            }
        }
    }

    for _ in 0..cli.more {
        println!("{}", t.new_story);
        orchestrator.new_story().await;
        render(&orchestrator.snapshot());
    }
}

fn render(session: &Session) {
    let t = session.language().translations();

    if session.phase() == Phase::Failed {
        eprintln!("{}", session.error().unwrap_or(t.error_generate));
        return;
    }

    println!();
    println!("{} | {}", t.gazette, t.title);
    println!("{}", t.subtitle);
    println!();

    if let Some(article) = session.article() {
        let date = article
            .published_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!("{}  [{} {}]", article.title, article.source.name, date);
        println!("{}", article.url);
        println!();
    }

    if let (Some(figure), Some(hot_take)) = (session.figure(), session.hot_take()) {
        let kind = match figure {
            Figure::Catalog(_) => "",
            Figure::Generated(_) => " *",
        };
        println!("{} {}{}, {} ({})", figure.avatar(), figure.name(), kind, figure.title(), figure.era());
        println!("{}: «{}»", t.proclamation, hot_take);
    }

    println!();
    println!("{}", t.footer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_more_defaults_to_zero() {
        let cli = Cli::try_parse_from(["gazette"]).unwrap();
        assert_eq!(cli.more, 0);
        assert_eq!(cli.language, Language::Fr);
    }

    #[test]
    fn test_more_requests_extra_stories() {
        let cli = Cli::try_parse_from(["gazette", "--language", "en", "--more", "2"]).unwrap();
        assert_eq!(cli.more, 2);
        assert_eq!(cli.language.translations().new_story, "New Gazette");
    }

    #[test]
    fn test_invent_conflicts_with_figure() {
        assert!(Cli::try_parse_from(["gazette", "--invent", "--figure", "napoleon"]).is_err());
    }
}
