//! Desirability score of a listing, from 0 to 100.
//!
//! The score is the sum of six additive rules. A rule is not capped at its
//! nominal weight: bonuses stack, and the comfort rule can go negative. The
//! total is clamped once, then truncated.

pub mod tables;

use crate::models::{Listing, PropertyType};
use serde::Serialize;

/// One scoring criterion and the signed delta it adds to the total
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&Listing) -> f64,
}

pub const RULES: &[Rule] = &[
    Rule { name: "location", apply: location },
    Rule { name: "surface", apply: surface },
    Rule { name: "price", apply: price },
    Rule { name: "comfort", apply: comfort },
    Rule { name: "extras", apply: extras },
    Rule { name: "energy", apply: energy },
];

#[derive(Debug, Clone, Serialize)]
pub struct Contribution {
    pub criterion: &'static str,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub score: u8,
    pub raw_total: f64,
    pub contributions: Vec<Contribution>,
}

pub fn score(listing: &Listing) -> u8 {
    let total: f64 = RULES.iter().map(|rule| (rule.apply)(listing)).sum();
    finalize(total)
}

/// Same computation as [`score`], keeping each rule's delta
pub fn breakdown(listing: &Listing) -> ScoreBreakdown {
    let contributions: Vec<Contribution> = RULES
        .iter()
        .map(|rule| Contribution {
            criterion: rule.name,
            points: (rule.apply)(listing),
        })
        .collect();
    let raw_total = contributions.iter().map(|c| c.points).sum();

    ScoreBreakdown {
        score: finalize(raw_total),
        raw_total,
        contributions,
    }
}

fn finalize(total: f64) -> u8 {
    if total.is_nan() {
        return 0;
    }
    total.clamp(0.0, 100.0) as u8
}

fn is_set(flag: Option<bool>) -> bool {
    flag == Some(true)
}

/// Blank strings count as unset
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

/// Nominal weight 30.
///
/// An unknown district does not fall back to the borough table, but a blank
/// one does.
fn location(listing: &Listing) -> f64 {
    let known = if let Some(district) = non_blank(listing.district.as_deref()) {
        tables::neighborhood_score(&district)
    } else if let Some(borough) = non_blank(listing.borough.as_deref()) {
        tables::borough_score(&borough)
    } else {
        None
    };
    let loc = known.unwrap_or(tables::DEFAULT_LOCATION_SCORE);

    f64::from(loc) / 100.0 * 30.0
}

/// Nominal weight 20, up to 26 with layout bonuses.
fn surface(listing: &Listing) -> f64 {
    let area = listing.area;
    let mut points = if (95.0..=120.0).contains(&area) {
        20.0
    } else if (80.0..95.0).contains(&area) {
        15.0
    } else if area > 120.0 && area <= 140.0 {
        17.0
    } else if area > 140.0 {
        10.0
    } else {
        5.0
    };

    if is_set(listing.dual_exposure) {
        points += 3.0;
    }
    let bedrooms = listing.bedroom_count.unwrap_or(0);
    if bedrooms >= 2 {
        points += 2.0;
    }
    if bedrooms >= 3 {
        points += 1.0;
    }
    points
}

/// Nominal weight 18.
fn price(listing: &Listing) -> f64 {
    let price = listing.price;
    let mut points = match price {
        p if p <= 900_000 => 15.0,
        p if p <= 1_000_000 => 13.0,
        p if p <= 1_200_000 => 10.0,
        p if p <= 1_500_000 => 7.0,
        _ => 0.0,
    };

    let per_area = match listing.price_per_area {
        Some(stored) if stored != 0 => stored as f64,
        _ if listing.area > 0.0 => price as f64 / listing.area,
        _ => 0.0,
    };
    if per_area <= 7000.0 {
        points += 3.0;
    } else if per_area <= 8500.0 {
        points += 2.0;
    } else if per_area <= 10000.0 {
        points += 1.0;
    }
    points
}

/// Nominal weight 15; a north-facing unit loses points.
fn comfort(listing: &Listing) -> f64 {
    let mut points = 0.0;
    if is_set(listing.elevator) {
        points += 3.0;
    }

    if let Some(exposure) = &listing.exposure {
        let exposure = exposure.to_lowercase();
        // South first, then west/east, then north: only one branch applies.
        if exposure.contains("sud") {
            points += 4.0;
        } else if exposure.contains("ouest") || exposure.contains("est") {
            points += 2.0;
        } else if exposure.contains("nord") {
            points -= 5.0;
        }
    }

    if matches!(listing.property_type, PropertyType::Duplex | PropertyType::House) {
        points += 3.0;
    }
    points
}

/// Nominal weight 10.
fn extras(listing: &Listing) -> f64 {
    let mut points = 0.0;
    if is_set(listing.terrace) || is_set(listing.balcony) {
        points += 3.0;
    }
    if listing.terrace_area.is_some_and(|a| a >= 20.0) {
        points += 2.0;
    }
    if is_set(listing.cellar) {
        points += 2.0;
    }
    if is_set(listing.parking) {
        points += 1.0;
    }
    if is_set(listing.bike_storage) {
        points += 3.0;
    } else if is_set(listing.cellar) {
        // a cellar can hold bikes when there is no bike room
        points += 1.0;
    }
    points
}

/// Nominal weight 10.
fn energy(listing: &Listing) -> f64 {
    listing
        .energy_rating
        .as_deref()
        .and_then(tables::energy_score)
        .unwrap_or(0.0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{Source, Status};
    use chrono::{TimeZone, Utc};

    /// A plain listing that scores only baseline points
    pub(crate) fn bare_listing() -> Listing {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        Listing {
            id: 1,
            url: "https://www.seloger.com/annonces/achat/appartement/marseille-6eme-13/1.htm"
                .to_string(),
            source: Source::Seloger,
            title: "Appartement".to_string(),
            description: None,
            price: 2_000_000,
            price_per_area: None,
            price_history: Vec::new(),
            area: 50.0,
            room_count: 2,
            bedroom_count: None,
            property_type: PropertyType::Apartment,
            floor: None,
            total_floors: None,
            elevator: None,
            dual_exposure: None,
            exposure: None,
            terrace: None,
            terrace_area: None,
            balcony: None,
            garden: None,
            cellar: None,
            parking: None,
            bike_storage: None,
            energy_rating: None,
            ghg_rating: None,
            district: None,
            borough: None,
            address: None,
            agency: None,
            phone: None,
            photo_urls: Vec::new(),
            photo_count: None,
            score: 0,
            status: Status::New,
            notes: None,
            discard_reason: None,
            first_seen_at: ts,
            last_seen_at: ts,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn points_for(listing: &Listing, criterion: &str) -> f64 {
        breakdown(listing)
            .contributions
            .into_iter()
            .find(|c| c.criterion == criterion)
            .map(|c| c.points)
            .unwrap()
    }

    #[test]
    fn bare_listing_gets_baseline() {
        // location 15 + surface 5 + price 0 (40000/m²) = 20
        let listing = bare_listing();
        assert_eq!(score(&listing), 20);
    }

    #[test]
    fn score_is_deterministic() {
        let mut listing = bare_listing();
        listing.district = Some("Castellane".to_string());
        listing.energy_rating = Some("c".to_string());
        listing.exposure = Some("Sud-Ouest".to_string());
        assert_eq!(score(&listing), score(&listing));
    }

    #[test]
    fn district_lookup_uses_table_order() {
        let mut listing = bare_listing();
        listing.district = Some("  Vauban Castellane ".to_string());
        assert_eq!(points_for(&listing, "location"), 95.0 / 100.0 * 30.0);
    }

    #[test]
    fn unknown_district_does_not_fall_back_to_borough() {
        let mut listing = bare_listing();
        listing.district = Some("Quartier inconnu".to_string());
        listing.borough = Some("6e".to_string());
        assert_eq!(points_for(&listing, "location"), 15.0);

        listing.district = None;
        assert_eq!(points_for(&listing, "location"), 85.0 / 100.0 * 30.0);
    }

    #[test]
    fn blank_district_falls_through_to_borough() {
        let mut listing = bare_listing();
        listing.borough = Some("6e".to_string());

        listing.district = Some(String::new());
        assert_eq!(points_for(&listing, "location"), 85.0 / 100.0 * 30.0);

        listing.district = Some("   ".to_string());
        assert_eq!(points_for(&listing, "location"), 85.0 / 100.0 * 30.0);

        listing.borough = Some(" ".to_string());
        assert_eq!(points_for(&listing, "location"), 15.0);
    }

    #[test]
    fn surface_tiers_and_boundaries() {
        let mut listing = bare_listing();
        for (area, expected) in [
            (120.0, 20.0),
            (120.01, 17.0),
            (95.0, 20.0),
            (94.99, 15.0),
            (80.0, 15.0),
            (79.9, 5.0),
            (140.0, 17.0),
            (140.5, 10.0),
            (0.0, 5.0),
        ] {
            listing.area = area;
            assert_eq!(points_for(&listing, "surface"), expected, "area {area}");
        }
    }

    #[test]
    fn layout_bonuses_stack_beyond_nominal_weight() {
        let mut listing = bare_listing();
        listing.area = 100.0;
        listing.dual_exposure = Some(true);
        listing.bedroom_count = Some(3);
        assert_eq!(points_for(&listing, "surface"), 26.0);

        listing.bedroom_count = Some(2);
        assert_eq!(points_for(&listing, "surface"), 25.0);
    }

    #[test]
    fn price_tiers_with_per_area_bonus() {
        let mut listing = bare_listing();
        listing.area = 100.0;

        listing.price = 650_000; // 6500/m²
        assert_eq!(points_for(&listing, "price"), 18.0);
        listing.price = 950_000; // 9500/m²
        assert_eq!(points_for(&listing, "price"), 14.0);
        listing.price = 1_100_000; // 11000/m²
        assert_eq!(points_for(&listing, "price"), 10.0);
        listing.price = 1_500_000;
        assert_eq!(points_for(&listing, "price"), 7.0);
    }

    #[test]
    fn stored_price_per_area_takes_precedence() {
        let mut listing = bare_listing();
        listing.price = 800_000;
        listing.area = 100.0;
        listing.price_per_area = Some(8_200);
        assert_eq!(points_for(&listing, "price"), 17.0);
    }

    #[test]
    fn unknown_area_counts_as_cheap_per_area() {
        let mut listing = bare_listing();
        listing.price = 1_600_000;
        listing.area = 0.0;
        assert_eq!(points_for(&listing, "price"), 3.0);
    }

    #[test]
    fn exposure_precedence_south_then_east_west_then_north() {
        let mut listing = bare_listing();
        for (exposure, expected) in [
            ("Sud", 4.0),
            ("nord / sud", 4.0),
            ("Ouest", 2.0),
            ("Est", 2.0),
            ("Nord-Est", 2.0),
            ("Nord", -5.0),
            ("plein ciel", 0.0),
        ] {
            listing.exposure = Some(exposure.to_string());
            assert_eq!(points_for(&listing, "comfort"), expected, "{exposure}");
        }
    }

    #[test]
    fn comfort_elevator_and_character() {
        let mut listing = bare_listing();
        listing.elevator = Some(true);
        listing.property_type = PropertyType::Duplex;
        assert_eq!(points_for(&listing, "comfort"), 6.0);

        listing.elevator = Some(false);
        listing.property_type = PropertyType::Loft;
        assert_eq!(points_for(&listing, "comfort"), 0.0);
    }

    #[test]
    fn bike_storage_and_cellar_are_not_double_counted() {
        let mut listing = bare_listing();
        listing.bike_storage = Some(true);
        listing.cellar = Some(true);
        assert_eq!(points_for(&listing, "extras"), 5.0);

        listing.bike_storage = Some(false);
        assert_eq!(points_for(&listing, "extras"), 3.0);

        listing.cellar = None;
        assert_eq!(points_for(&listing, "extras"), 0.0);
    }

    #[test]
    fn outdoor_space_bonuses() {
        let mut listing = bare_listing();
        listing.balcony = Some(true);
        assert_eq!(points_for(&listing, "extras"), 3.0);

        listing.terrace = Some(true);
        listing.terrace_area = Some(20.0);
        listing.parking = Some(true);
        assert_eq!(points_for(&listing, "extras"), 6.0);
    }

    #[test]
    fn energy_rating_table() {
        let mut listing = bare_listing();
        assert_eq!(points_for(&listing, "energy"), 0.0);
        listing.energy_rating = Some("B".to_string());
        assert_eq!(points_for(&listing, "energy"), 9.0);
        listing.energy_rating = Some("Z".to_string());
        assert_eq!(points_for(&listing, "energy"), 0.0);
    }

    #[test]
    fn better_energy_rating_never_lowers_score() {
        let mut listing = bare_listing();
        listing.energy_rating = Some("G".to_string());
        let worst = score(&listing);
        listing.energy_rating = Some("A".to_string());
        assert!(score(&listing) >= worst);
    }

    #[test]
    fn higher_price_never_raises_score() {
        let mut listing = bare_listing();
        listing.area = 100.0;
        listing.price = 800_000;
        let cheap = score(&listing);
        listing.price = 2_000_000;
        assert!(score(&listing) <= cheap);
    }

    #[test]
    fn everything_at_once_is_clamped_to_100() {
        let mut listing = bare_listing();
        listing.district = Some("Vauban".to_string());
        listing.area = 110.0;
        listing.dual_exposure = Some(true);
        listing.bedroom_count = Some(3);
        listing.price = 700_000;
        listing.elevator = Some(true);
        listing.exposure = Some("Sud".to_string());
        listing.property_type = PropertyType::House;
        listing.terrace = Some(true);
        listing.terrace_area = Some(40.0);
        listing.cellar = Some(true);
        listing.parking = Some(true);
        listing.bike_storage = Some(true);
        listing.energy_rating = Some("A".to_string());

        let result = breakdown(&listing);
        assert!(result.raw_total > 100.0);
        assert_eq!(result.score, 100);
        assert_eq!(score(&listing), 100);
    }

    #[test]
    fn worst_case_stays_non_negative() {
        let mut listing = bare_listing();
        listing.district = Some("Saint-Mauront".to_string());
        listing.exposure = Some("Nord".to_string());
        // 3 + 5 + 0 - 5 = 3
        assert_eq!(score(&listing), 3);
        assert!(breakdown(&listing).raw_total >= 0.0);
    }

    #[test]
    fn score_truncates_toward_zero() {
        let mut listing = bare_listing();
        listing.district = Some("Lodi".to_string()); // 24
        listing.borough = None;
        listing.energy_rating = Some("D".to_string()); // 5
        // 24 + 5 + 0 + 5 = 34
        assert_eq!(score(&listing), 34);

        listing.district = Some("Baille".to_string()); // 21.6
        assert_eq!(score(&listing), 31);
    }
}
