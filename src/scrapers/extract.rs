//! Best-effort field extraction from listing pages.
//!
//! Nothing here fails: a field without a signal is left out. Numeric fields
//! are driven by ordered rule lists, where the first rule whose pattern
//! matches and whose value parses wins.

use crate::models::PropertyType;
use crate::scrapers::types::ExtractedFields;
use regex::Regex;
use scraper::{Html, Selector};
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::debug;

/// A pattern whose first capture group is handed to a normalizer
pub struct Rule<T> {
    pattern: Regex,
    normalize: fn(&str) -> Option<T>,
}

impl<T> Rule<T> {
    fn new(pattern: &str, normalize: fn(&str) -> Option<T>) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            normalize,
        }
    }
}

/// Run `rules` in order and return the first value that normalizes
pub fn first_match<T>(rules: &[Rule<T>], text: &str) -> Option<T> {
    rules.iter().find_map(|rule| {
        let captures = rule.pattern.captures(text)?;
        (rule.normalize)(captures.get(1)?.as_str())
    })
}

static PRICE_RULES: LazyLock<Vec<Rule<i64>>> = LazyLock::new(|| {
    vec![
        Rule::new(r"(\d[\d\s.]{2,10})\s*€", parse_int::<i64>),
        Rule::new(r"(?i)prix[^:]*:\s*(\d[\d\s.]{2,10})", parse_int::<i64>),
        Rule::new(r"(?i)(\d{3,}[\s.]?\d{3})\s*(?:euros|EUR)", parse_int::<i64>),
    ]
});

static AREA_RULES: LazyLock<Vec<Rule<f64>>> = LazyLock::new(|| {
    vec![
        Rule::new(r"(\d{2,4}(?:[.,]\d+)?)\s*m(?:²|2\b)", parse_decimal),
        Rule::new(r"(?i)surface[^:]*:\s*(\d{2,4}(?:[.,]\d+)?)", parse_decimal),
    ]
});

static ROOM_RULES: LazyLock<Vec<Rule<u32>>> = LazyLock::new(|| {
    vec![
        Rule::new(r"(?i)(\d+)\s*pièce", parse_int::<u32>),
        Rule::new(r"(?i)\bT(\d{1,2})\b", parse_int::<u32>),
        Rule::new(r"(?i)\bF(\d{1,2})\b", parse_int::<u32>),
    ]
});

static BEDROOM_RULES: LazyLock<Vec<Rule<u32>>> =
    LazyLock::new(|| vec![Rule::new(r"(?i)(\d+)\s*chambre", parse_int::<u32>)]);

static BOROUGH_RULES: LazyLock<Vec<Rule<String>>> = LazyLock::new(|| {
    vec![
        Rule::new(
            r"(?i)\b(\d{1,2})(?:e|è|ème|eme|er)\s*arrondissement",
            borough_label,
        ),
        Rule::new(r"(?i)marseille\s+(\d{1,2})(?:e|è|ème|eme|er)?\b", borough_label),
        Rule::new(r"\b130(\d{2})\b", postal_borough),
    ]
});

static ENERGY_RULES: LazyLock<Vec<Rule<String>>> = LazyLock::new(|| {
    vec![Rule::new(
        r"(?i)(?:dpe|diagnostic|énergie|energy)[^a-z]*([A-G])\b",
        |raw| Some(raw.to_uppercase()),
    )]
});

const TERRACE: &[&str] = &["terrasse"];
const BALCONY: &[&str] = &["balcon"];
const CELLAR: &[&str] = &["cave"];
const PARKING: &[&str] = &["parking", "garage", "stationnement"];
const ELEVATOR: &[&str] = &["ascenseur"];
const DUAL_EXPOSURE: &[&str] = &["traversant"];
const GARDEN: &[&str] = &["jardin"];
const BIKE_STORAGE: &[&str] = &["local vélo", "local à vélo", "local velo", "local a velo"];

/// Checked in priority order; no match means apartment
const PROPERTY_TYPES: &[(&str, PropertyType)] = &[
    ("maison", PropertyType::House),
    ("duplex", PropertyType::Duplex),
    ("loft", PropertyType::Loft),
];

/// Image URLs containing one of these are assumed to be listing photos
const PHOTO_HINTS: &[&str] = &["photo", "image", "img", "cdn"];

/// Meta selectors in priority order; the first level with content wins
/// wherever it sits in the document.
static OG_TITLE: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [r#"meta[property="og:title"]"#, r#"meta[property="og-title"]"#]
        .into_iter()
        .map(|css| Selector::parse(css).unwrap())
        .collect()
});
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static DESCRIPTION: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [r#"meta[property="og:description"]"#, r#"meta[name="description"]"#]
        .into_iter()
        .map(|css| Selector::parse(css).unwrap())
        .collect()
});
static IMG: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

/// The parts of a fetched page the extractor looks at
#[derive(Debug, Default)]
pub struct PageDocument {
    /// Visible text, whitespace-joined
    pub text: String,
    pub og_title: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_sources: Vec<String>,
}

impl PageDocument {
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);

        let mut chunks = Vec::new();
        for node in document.root_element().descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|el| el.name()))
                .is_some_and(|name| matches!(name, "script" | "style" | "noscript"));
            let text = text.trim();
            if !hidden && !text.is_empty() {
                chunks.push(text);
            }
        }

        let meta_content = |selectors: &[Selector]| {
            selectors.iter().find_map(|selector| {
                document
                    .select(selector)
                    .filter_map(|el| el.value().attr("content"))
                    .map(str::trim)
                    .find(|content| !content.is_empty())
                    .map(str::to_string)
            })
        };

        let title = document
            .select(&TITLE)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty());

        let image_sources = document
            .select(&IMG)
            .filter_map(|img| {
                let attrs = img.value();
                attrs
                    .attr("src")
                    .filter(|src| !src.is_empty())
                    .or_else(|| attrs.attr("data-src"))
                    .filter(|src| !src.is_empty())
                    .map(str::to_string)
            })
            .collect();

        Self {
            text: chunks.join(" "),
            og_title: meta_content(OG_TITLE.as_slice()),
            title,
            description: meta_content(DESCRIPTION.as_slice()),
            image_sources,
        }
    }
}

/// Extract every field we know how to guess from raw page markup
pub fn extract(html: &str) -> ExtractedFields {
    extract_document(&PageDocument::parse(html))
}

pub fn extract_document(page: &PageDocument) -> ExtractedFields {
    let text = page.text.as_str();
    let lower = text.to_lowercase();

    let photo_urls: Vec<String> = page
        .image_sources
        .iter()
        .filter(|src| PHOTO_HINTS.iter().any(|hint| src.contains(hint)))
        .cloned()
        .collect();

    let fields = ExtractedFields {
        title: page.og_title.clone().or_else(|| page.title.clone()),
        description: page.description.clone(),
        price: first_match(PRICE_RULES.as_slice(), text),
        area: first_match(AREA_RULES.as_slice(), text),
        room_count: first_match(ROOM_RULES.as_slice(), text),
        bedroom_count: first_match(BEDROOM_RULES.as_slice(), text),
        property_type: Some(property_type(&lower)),
        borough: first_match(BOROUGH_RULES.as_slice(), text),
        energy_rating: first_match(ENERGY_RULES.as_slice(), text),
        terrace: has_keyword(&lower, TERRACE),
        balcony: has_keyword(&lower, BALCONY),
        cellar: has_keyword(&lower, CELLAR),
        parking: has_keyword(&lower, PARKING),
        elevator: has_keyword(&lower, ELEVATOR),
        dual_exposure: has_keyword(&lower, DUAL_EXPOSURE),
        garden: has_keyword(&lower, GARDEN),
        bike_storage: has_keyword(&lower, BIKE_STORAGE),
        photo_count: (!photo_urls.is_empty()).then_some(photo_urls.len() as u32),
        photo_urls: (!photo_urls.is_empty()).then_some(photo_urls),
        ..ExtractedFields::default()
    };

    debug!(
        price = ?fields.price,
        area = ?fields.area,
        rooms = ?fields.room_count,
        borough = ?fields.borough,
        "Extracted fields from {} chars of text",
        text.len()
    );
    fields
}

/// `Some(true)` when a keyword is present. Absence of the word is not
/// absence of the amenity, so there is no `Some(false)`.
fn has_keyword(lower: &str, keywords: &[&str]) -> Option<bool> {
    keywords.iter().any(|kw| lower.contains(kw)).then_some(true)
}

fn property_type(lower: &str) -> PropertyType {
    PROPERTY_TYPES
        .iter()
        .find(|(kw, _)| lower.contains(kw))
        .map(|(_, kind)| *kind)
        .unwrap_or(PropertyType::Apartment)
}

/// "1 250 000", "1.250.000" -> 1250000
fn parse_int<T: FromStr>(raw: &str) -> Option<T> {
    let digits: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != ',')
        .collect();
    digits.parse().ok()
}

/// "102,5" -> 102.5
fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse().ok()
}

fn borough_label(raw: &str) -> Option<String> {
    match raw.parse::<u8>().ok()? {
        0 => None,
        1 => Some("1er".to_string()),
        n => Some(format!("{n}e")),
    }
}

/// Last two digits of a 130xx postal code, when they name a borough
fn postal_borough(raw: &str) -> Option<String> {
    let n = raw.parse::<u8>().ok()?;
    if (1..=16).contains(&n) {
        borough_label(raw)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Vente appartement 3 pièces 75 m² Marseille 6e</title>
  <meta property="og:description" content="Bel appartement au coeur du 6e.">
  <script>var tracking = "1 000 000 €";</script>
</head>
<body>
  <h1>Appartement 3 pièces</h1>
  <ul>
    <li>75 m²</li>
    <li>2 chambres</li>
    <li>Ascenseur</li>
    <li>Terrasse plein sud</li>
  </ul>
  <p class="price">950&nbsp;000 €</p>
  <img src="https://cdn.example.com/listing/1.jpg">
  <img src="/static/logo.svg">
  <img data-src="https://photos.example.com/listing/2.jpg">
</body>
</html>"#;

    #[test]
    fn extracts_a_typical_listing_page() {
        let fields = extract(LISTING_PAGE);

        assert_eq!(fields.room_count, Some(3));
        assert_eq!(fields.area, Some(75.0));
        assert_eq!(fields.elevator, Some(true));
        assert_eq!(fields.terrace, Some(true));
        assert_eq!(fields.price, Some(950_000));
        assert_eq!(fields.bedroom_count, Some(2));
        assert_eq!(fields.borough.as_deref(), Some("6e"));
        assert_eq!(fields.property_type, Some(PropertyType::Apartment));
    }

    #[test]
    fn absent_signals_are_omitted() {
        let fields = extract(LISTING_PAGE);

        assert_eq!(fields.cellar, None);
        assert_eq!(fields.parking, None);
        assert_eq!(fields.garden, None);
        assert_eq!(fields.bike_storage, None);
        assert_eq!(fields.energy_rating, None);

        let json = serde_json::to_value(&fields).unwrap();
        assert!(json.get("cellar").is_none());
        assert!(json.get("energy_rating").is_none());
    }

    #[test]
    fn title_falls_back_to_title_tag_and_description_uses_og() {
        let fields = extract(LISTING_PAGE);
        assert_eq!(
            fields.title.as_deref(),
            Some("Vente appartement 3 pièces 75 m² Marseille 6e")
        );
        assert_eq!(
            fields.description.as_deref(),
            Some("Bel appartement au coeur du 6e.")
        );
    }

    #[test]
    fn og_title_wins_over_title_tag() {
        let html = r#"<html><head><title>Fallback</title>
            <meta property="og:title" content="Duplex Vauban"></head><body></body></html>"#;
        assert_eq!(extract(html).title.as_deref(), Some("Duplex Vauban"));
    }

    #[test]
    fn og_description_wins_wherever_it_appears() {
        let html = r#"<html><head>
            <meta name="description" content="generic site blurb">
            <meta property="og:description" content="T3 traversant avec vue mer">
            <meta property="og-title" content="Legacy title">
            <meta property="og:title" content="Appartement Endoume">
            </head><body></body></html>"#;
        let fields = extract(html);
        assert_eq!(fields.description.as_deref(), Some("T3 traversant avec vue mer"));
        assert_eq!(fields.title.as_deref(), Some("Appartement Endoume"));
    }

    #[test]
    fn plain_description_is_the_fallback() {
        let html = r#"<html><head>
            <meta property="og:description" content="  ">
            <meta name="description" content="Studio Cours Julien">
            </head><body></body></html>"#;
        assert_eq!(extract(html).description.as_deref(), Some("Studio Cours Julien"));
    }

    #[test]
    fn script_text_is_not_page_text() {
        let page = PageDocument::parse(LISTING_PAGE);
        assert!(!page.text.contains("tracking"));
        assert!(page.text.contains("950"));
    }

    #[test]
    fn photo_count_is_a_url_heuristic() {
        let fields = extract(LISTING_PAGE);
        assert_eq!(fields.photo_count, Some(2));
        assert_eq!(
            fields.photo_urls,
            Some(vec![
                "https://cdn.example.com/listing/1.jpg".to_string(),
                "https://photos.example.com/listing/2.jpg".to_string(),
            ])
        );

        let bare = extract("<html><body><img src=\"/logo.svg\"></body></html>");
        assert_eq!(bare.photo_count, None);
        assert_eq!(bare.photo_urls, None);
    }

    #[test]
    fn empty_or_broken_markup_yields_nothing() {
        for html in ["", "<<<>>>", "<html><body><p>Bonjour</p>"] {
            let fields = extract(html);
            assert_eq!(fields.price, None);
            assert_eq!(fields.area, None);
            assert_eq!(fields.room_count, None);
            assert_eq!(fields.title, None);
            assert_eq!(fields.property_type, Some(PropertyType::Apartment));
        }
    }

    #[test]
    fn price_rules_in_order() {
        assert_eq!(first_match(PRICE_RULES.as_slice(), "Prix 485\u{a0}000\u{a0}€"), Some(485_000));
        assert_eq!(first_match(PRICE_RULES.as_slice(), "1.250.000 € FAI"), Some(1_250_000));
        assert_eq!(
            first_match(PRICE_RULES.as_slice(), "Prix de vente : 1.250.000 euros"),
            Some(1_250_000)
        );
        assert_eq!(first_match(PRICE_RULES.as_slice(), "Vendu 780000 EUR"), Some(780_000));
        assert_eq!(first_match(PRICE_RULES.as_slice(), "Prix sur demande"), None);
    }

    #[test]
    fn first_rule_wins_even_if_a_later_one_would_match_earlier_text() {
        // "prix : 500 000" appears first, but the "€" rule is tried first
        let text = "prix : 500 000 puis 650 000 €";
        assert_eq!(first_match(PRICE_RULES.as_slice(), text), Some(650_000));
    }

    #[test]
    fn surface_accepts_decimal_comma_and_m2() {
        assert_eq!(first_match(AREA_RULES.as_slice(), "Surface habitable 102,5 m²"), Some(102.5));
        assert_eq!(first_match(AREA_RULES.as_slice(), "88 m2 Carrez"), Some(88.0));
        assert_eq!(first_match(AREA_RULES.as_slice(), "Surface : 64"), Some(64.0));
        assert_eq!(first_match(AREA_RULES.as_slice(), "Pas de surface"), None);
    }

    #[test]
    fn room_count_from_pieces_or_t_notation() {
        assert_eq!(first_match(ROOM_RULES.as_slice(), "Appartement 4 pièces"), Some(4));
        assert_eq!(first_match(ROOM_RULES.as_slice(), "Bel appartement T3 lumineux"), Some(3));
        assert_eq!(first_match(ROOM_RULES.as_slice(), "F2 refait à neuf"), Some(2));
        assert_eq!(first_match(ROOM_RULES.as_slice(), "Studio"), None);
    }

    #[test]
    fn borough_precedence() {
        assert_eq!(
            first_match(BOROUGH_RULES.as_slice(), "Situé dans le 8ème arrondissement").as_deref(),
            Some("8e")
        );
        assert_eq!(
            first_match(BOROUGH_RULES.as_slice(), "1er arrondissement, Marseille 6").as_deref(),
            Some("1er")
        );
        assert_eq!(
            first_match(BOROUGH_RULES.as_slice(), "Marseille 7e, 13006").as_deref(),
            Some("7e")
        );
        assert_eq!(
            first_match(BOROUGH_RULES.as_slice(), "13008 Marseille 13008").as_deref(),
            Some("8e")
        );
        assert_eq!(first_match(BOROUGH_RULES.as_slice(), "Code postal 13090"), None);
        assert_eq!(first_match(BOROUGH_RULES.as_slice(), "Aix-en-Provence"), None);
    }

    #[test]
    fn energy_rating_needs_a_keyword() {
        assert_eq!(
            first_match(ENERGY_RULES.as_slice(), "DPE : c, GES : D").as_deref(),
            Some("C")
        );
        assert_eq!(
            first_match(ENERGY_RULES.as_slice(), "Classe énergie B").as_deref(),
            Some("B")
        );
        assert_eq!(first_match(ENERGY_RULES.as_slice(), "Catégorie A"), None);
    }

    #[test]
    fn property_type_priority() {
        assert_eq!(property_type("loft en duplex"), PropertyType::Duplex);
        assert_eq!(property_type("maison avec duplex"), PropertyType::House);
        assert_eq!(property_type("loft industriel"), PropertyType::Loft);
        assert_eq!(property_type("t3 lumineux"), PropertyType::Apartment);
    }

    #[test]
    fn amenity_keywords() {
        let lower = "garage fermé, local vélo, jardin arboré, appartement traversant";
        assert_eq!(has_keyword(lower, PARKING), Some(true));
        assert_eq!(has_keyword(lower, BIKE_STORAGE), Some(true));
        assert_eq!(has_keyword(lower, GARDEN), Some(true));
        assert_eq!(has_keyword(lower, DUAL_EXPOSURE), Some(true));
        assert_eq!(has_keyword(lower, BALCONY), None);
    }

    #[test]
    fn bike_storage_spellings() {
        for lower in [
            "local vélo au rez-de-chaussée",
            "local à vélos sécurisé",
            "local velos",
            "local a velo dans la cour",
        ] {
            assert_eq!(has_keyword(lower, BIKE_STORAGE), Some(true), "{lower}");
        }
        assert_eq!(has_keyword("vélo électrique non inclus", BIKE_STORAGE), None);
    }
}
