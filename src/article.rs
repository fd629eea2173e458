use std::path::Path;
use std::sync::LazyLock;

use anyhow::Context as _;
use regex::Regex;

use crate::cast::extract_cast;
use crate::cli::ExtractArgs;
use crate::field::{extract_field, extract_list, extract_runtime};
use crate::formats::{RawArticle, ScrapedMovie};
use crate::markup;
use crate::money::extract_money;
use crate::normalize::normalize_non_blank;
use crate::ott::extract_ott_release;

pub const DEFAULT_LANGUAGE: &str = "Telugu";

static FILMING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[Ff]ilming took place in ([^.]+)").expect("valid filming location regex")
});
static LOCATION_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*").expect("valid location split regex"));

/// Runs every extractor over one article. Infobox-only fields fall back to
/// the whole source when the article has no `{{Infobox film}}`.
pub fn scrape_article(article: &RawArticle, source_url: String) -> ScrapedMovie {
    let source = article.source.as_str();
    let infobox = markup::infobox(source).unwrap_or(source);

    ScrapedMovie {
        title: extract_field(infobox, "name").unwrap_or_else(|| article.title.clone()),
        language: extract_field(infobox, "language")
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
        runtime: extract_runtime(infobox),
        budget: extract_money(source, "budget"),
        box_office: extract_money(source, "gross"),
        director: extract_field(infobox, "director"),
        producer: extract_field(infobox, "producer"),
        production_company: extract_field(source, "studio"),
        music: extract_field(source, "music").or_else(|| extract_field(source, "composer")),
        cinematography: extract_field(source, "cinematography"),
        editing: extract_field(source, "editing"),
        writer: extract_list(source, "writer"),
        cast: extract_cast(source),
        filming_locations: extract_filming_locations(source),
        plot: markup::section(source, "Plot").and_then(normalize_non_blank),
        ott_release: extract_ott_release(source),
        source_url,
    }
}

/// Offline pipeline over a markup file; prints the scraped movie as JSON.
pub fn run(args: ExtractArgs) -> anyhow::Result<()> {
    let path = Path::new(&args.source);
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("read markup: {}", path.display()))?;
    let title = args.title.unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().replace('_', " "))
            .unwrap_or_default()
    });

    let article = RawArticle { title, source };
    let movie = scrape_article(&article, String::new());
    crate::print_json(&movie)
}

/// Places named in the first "Filming took place in A, B, C." sentence.
pub fn extract_filming_locations(source: &str) -> Vec<String> {
    let Some(caps) = FILMING_RE.captures(source) else {
        return Vec::new();
    };
    LOCATION_SPLIT_RE
        .split(&caps[1])
        .filter_map(normalize_non_blank)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::{CastEntry, Knowable};

    fn article(title: &str, source: &str) -> RawArticle {
        RawArticle {
            title: title.to_owned(),
            source: source.to_owned(),
        }
    }

    const SOURCE: &str = r#"{{Short description|2022 film}}
{{Infobox film
| name = RRR
| director = [[S. S. Rajamouli]]
| producer = [[D. V. V. Danayya]]
| writer = [[K. V. Vijayendra Prasad]]<br />[[S. S. Rajamouli]]
| music = [[M. M. Keeravani]]
| cinematography = [[K. K. Senthil Kumar]]
| editing = [[A. Sreekar Prasad]]
| studio = [[DVV Entertainment]]
| runtime = 182 minutes<ref>{{cite web|title=RRR}}</ref>
| language = Telugu
| budget = {{INR|550 crore}}<ref>x</ref>
| gross = {{INR|1,258 crore}}
}}
'''''RRR''''' is a 2022 Indian [[Telugu language|Telugu]]-language epic action drama film.

== Plot ==
In 1920, two revolutionaries meet in [[Delhi]].

== Cast ==
* [[N. T. Rama Rao Jr.]] as Komaram Bheem
* [[Ram Charan]] as Alluri Sitarama Raju

== Production ==
Filming took place in [[Hyderabad]], [[Ukraine]]<ref>u</ref>, and Pune. Later scenes were reshot.

== Release ==
The post-theatrical digital streaming rights were acquired by [[ZEE5]] and [[Netflix]].
"#;

    #[test]
    fn scrapes_full_article() {
        let movie = scrape_article(&article("RRR (film)", SOURCE), "u".to_owned());

        assert_eq!(movie.title, "RRR");
        assert_eq!(movie.language, "Telugu");
        assert_eq!(movie.runtime.as_deref(), Some("182 minutes"));
        assert_eq!(movie.budget.as_deref(), Some("₹550 crore"));
        assert_eq!(movie.box_office.as_deref(), Some("₹1,258 crore"));
        assert_eq!(movie.director.as_deref(), Some("S. S. Rajamouli"));
        assert_eq!(movie.producer.as_deref(), Some("D. V. V. Danayya"));
        assert_eq!(movie.production_company.as_deref(), Some("DVV Entertainment"));
        assert_eq!(movie.music.as_deref(), Some("M. M. Keeravani"));
        assert_eq!(movie.cinematography.as_deref(), Some("K. K. Senthil Kumar"));
        assert_eq!(movie.editing.as_deref(), Some("A. Sreekar Prasad"));
        assert_eq!(movie.writer, vec!["K. V. Vijayendra Prasad", "S. S. Rajamouli"]);
        assert_eq!(
            movie.cast,
            vec![
                CastEntry {
                    name: "N. T. Rama Rao Jr.".to_owned(),
                    role: Some("Komaram Bheem".to_owned()),
                },
                CastEntry {
                    name: "Ram Charan".to_owned(),
                    role: Some("Alluri Sitarama Raju".to_owned()),
                },
            ]
        );
        assert_eq!(
            movie.filming_locations,
            vec!["Hyderabad", "Ukraine", "and Pune"]
        );
        assert_eq!(
            movie.plot.as_deref(),
            Some("In 1920, two revolutionaries meet in Delhi.")
        );
        let ott = movie.ott_release.expect("ott release");
        assert_eq!(ott.platform, Knowable::Known("ZEE5".to_owned()));
        assert_eq!(ott.date, Knowable::Unknown);
        assert_eq!(movie.source_url, "u");
    }

    #[test]
    fn minimal_infobox_yields_defaults() {
        let movie = scrape_article(
            &article(
                "Test Movie",
                "{{Infobox film|name=Test Movie|language=Telugu}}",
            ),
            String::new(),
        );

        assert_eq!(movie.title, "Test Movie");
        assert_eq!(movie.language, "Telugu");
        assert!(movie.cast.is_empty());
        assert_eq!(movie.plot, None);
        assert_eq!(movie.ott_release, None);
        assert_eq!(movie.runtime, None);
    }

    #[test]
    fn article_without_infobox_falls_back_to_title_and_default_language() {
        let movie = scrape_article(&article("Plain", "Just prose."), String::new());
        assert_eq!(movie.title, "Plain");
        assert_eq!(movie.language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn composer_fills_in_for_missing_music() {
        let movie = scrape_article(
            &article("X", "{{Infobox film\n| composer = [[Thaman S]]\n}}"),
            String::new(),
        );
        assert_eq!(movie.music.as_deref(), Some("Thaman S"));
    }
}
