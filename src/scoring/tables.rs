//! Static lookup data for the scorer.
//!
//! Both location tables are scanned in declaration order and the first key
//! that is a substring of the listing's text wins, so order matters.

/// Neighborhood name, borough, curated score
pub const NEIGHBORHOODS: &[(&str, &str, u8)] = &[
    // 6e
    ("vauban", "6e", 95),
    ("castellane", "6e", 90),
    ("palais de justice", "6e", 88),
    ("notre-dame-du-mont", "6e", 75),
    ("préfecture", "6e", 85),
    ("lodi", "6e", 80),
    // 7e
    ("saint-victor", "7e", 90),
    ("le pharo", "7e", 85),
    ("endoume", "7e", 82),
    ("bompard", "7e", 80),
    ("roucas blanc", "7e", 78),
    ("saint-lambert", "7e", 75),
    // 4e
    ("cinq avenues", "4e", 88),
    ("longchamp", "4e", 85),
    ("les chartreux", "4e", 80),
    ("la blancarde", "4e", 75),
    // 5e
    ("la plaine", "5e", 78),
    ("le camas", "5e", 75),
    ("baille", "5e", 72),
    // 8e
    ("perier", "8e", 82),
    ("prado", "8e", 80),
    ("saint-giniez", "8e", 78),
    ("bonneveine", "8e", 72),
    ("la plage", "8e", 75),
    ("pointe rouge", "8e", 70),
    ("montredon", "8e", 65),
    // Dealbreakers
    ("belsunce", "1er", 20),
    ("noailles", "1er", 25),
    ("la joliette", "2e", 40),
    ("le panier", "2e", 45),
    ("belle de mai", "3e", 15),
    ("saint-mauront", "3e", 10),
];

/// Borough label and score, used when no district is known.
///
/// Two-digit boroughs come first: "16e" contains "6e".
pub const BOROUGHS: &[(&str, u8)] = &[
    ("10e", 30),
    ("11e", 35),
    ("12e", 55),
    ("13e", 15),
    ("14e", 10),
    ("15e", 10),
    ("16e", 10),
    ("6e", 85),
    ("7e", 80),
    ("4e", 78),
    ("5e", 72),
    ("8e", 75),
    ("1er", 50),
    ("2e", 40),
    ("3e", 15),
    ("9e", 55),
];

pub const ENERGY_RATINGS: &[(&str, f64)] = &[
    ("A", 10.0),
    ("B", 9.0),
    ("C", 7.0),
    ("D", 5.0),
    ("E", 3.0),
    ("F", 1.0),
    ("G", 0.0),
];

pub const DEFAULT_LOCATION_SCORE: u8 = 50;

/// First entry of `table` whose key occurs in `text`
pub fn first_substring_match<'a, T: Copy>(
    table: impl IntoIterator<Item = (&'a str, T)>,
    text: &str,
) -> Option<T> {
    table
        .into_iter()
        .find(|(key, _)| text.contains(key))
        .map(|(_, value)| value)
}

pub fn neighborhood_score(district: &str) -> Option<u8> {
    first_substring_match(
        NEIGHBORHOODS.iter().map(|(name, _, score)| (*name, *score)),
        district,
    )
}

pub fn borough_score(borough: &str) -> Option<u8> {
    first_substring_match(BOROUGHS.iter().copied(), borough)
}

pub fn energy_score(rating: &str) -> Option<f64> {
    let rating = rating.trim().to_uppercase();
    ENERGY_RATINGS
        .iter()
        .find(|(letter, _)| *letter == rating)
        .map(|(_, points)| *points)
}
