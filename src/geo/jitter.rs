// src/geo/jitter.rs
//
// Fallback Jitter Generator. Display-only: a country centroid plus uniform
// noise so markers from the same country don't stack. Nothing produced here
// is ever written back as a resolved coordinate.

use rand::Rng;

use crate::config::consts::{DEFAULT_CENTROID, JITTER_DEFAULT_LAT_DEG, JITTER_DEFAULT_LON_DEG, JITTER_KNOWN_DEG};
use crate::entity::Coordinates;

/// (country as spelled in the ranking table, lat, lon)
static CENTROIDS: &[(&str, f64, f64)] = &[
    ("USA", 39.8, -98.6),
    ("United States", 39.8, -98.6),
    ("China", 35.0, 103.0),
    ("Japan", 36.2, 138.3),
    ("UK", 54.0, -2.0),
    ("United Kingdom", 54.0, -2.0),
    ("Germany", 51.2, 10.4),
    ("France", 46.6, 2.2),
    ("Italy", 42.8, 12.6),
    ("Spain", 40.4, -3.7),
    ("South Korea", 36.5, 127.9),
    ("Korea", 36.5, 127.9),
    ("Canada", 56.1, -106.3),
    ("Australia", -25.3, 133.8),
    ("India", 20.6, 78.9),
    ("Brazil", -14.2, -51.9),
    ("Iran", 32.4, 53.7),
    ("Turkey", 39.0, 35.2),
    ("Taiwan", 23.7, 121.0),
    ("Netherlands", 52.1, 5.3),
    ("Russia", 61.5, 105.3),
    ("Poland", 51.9, 19.1),
    ("Sweden", 60.1, 18.6),
    ("Switzerland", 46.8, 8.2),
    ("Belgium", 50.5, 4.5),
    ("Austria", 47.5, 14.6),
    ("Portugal", 39.4, -8.2),
    ("Egypt", 26.8, 30.8),
    ("Pakistan", 30.4, 69.3),
    ("Mexico", 23.6, -102.6),
    ("Argentina", -38.4, -63.6),
    ("Chile", -35.7, -71.5),
    ("Colombia", 4.6, -74.3),
    ("Peru", -9.2, -75.0),
    ("Venezuela", 6.4, -66.6),
    ("Uruguay", -32.5, -55.8),
    ("Cuba", 21.5, -77.8),
    ("Puerto Rico", 18.2, -66.6),
    ("South Africa", -30.6, 22.9),
    ("Nigeria", 9.1, 8.7),
    ("Ghana", 7.9, -1.0),
    ("Kenya", 0.0, 37.9),
    ("Ethiopia", 9.1, 40.5),
    ("Uganda", 1.4, 32.3),
    ("Tunisia", 33.9, 9.5),
    ("Morocco", 31.8, -7.1),
    ("Algeria", 28.0, 1.7),
    ("Saudi Arabia", 23.9, 45.1),
    ("United Arab Emirates", 23.4, 53.8),
    ("Qatar", 25.4, 51.2),
    ("Kuwait", 29.3, 47.5),
    ("Oman", 21.5, 55.9),
    ("Iraq", 33.2, 43.7),
    ("Jordan", 30.6, 36.2),
    ("Lebanon", 33.9, 35.9),
    ("Israel", 31.0, 34.9),
    ("Cyprus", 35.1, 33.4),
    ("Malaysia", 4.2, 101.9),
    ("Thailand", 15.9, 101.0),
    ("Indonesia", -0.8, 113.9),
    ("Singapore", 1.35, 103.8),
    ("Hong Kong", 22.3, 114.2),
    ("Macau", 22.2, 113.5),
    ("Vietnam", 14.1, 108.3),
    ("Philippines", 12.9, 121.8),
    ("Bangladesh", 23.7, 90.4),
    ("Sri Lanka", 7.9, 80.8),
    ("Nepal", 28.4, 84.1),
    ("Kazakhstan", 48.0, 66.9),
    ("Greece", 39.1, 21.8),
    ("Czech Republic", 49.8, 15.5),
    ("Slovakia", 48.7, 19.7),
    ("Hungary", 47.2, 19.5),
    ("Romania", 45.9, 25.0),
    ("Bulgaria", 42.7, 25.5),
    ("Serbia", 44.0, 21.0),
    ("Croatia", 45.1, 15.2),
    ("Slovenia", 46.2, 15.0),
    ("Bosnia and Herzegovina", 43.9, 17.7),
    ("Ukraine", 48.4, 31.2),
    ("Belarus", 53.7, 28.0),
    ("Estonia", 58.6, 25.0),
    ("Latvia", 56.9, 24.6),
    ("Lithuania", 55.2, 23.9),
    ("Denmark", 56.3, 9.5),
    ("Norway", 60.5, 8.5),
    ("Finland", 61.9, 25.7),
    ("Iceland", 65.0, -19.0),
    ("Ireland", 53.4, -8.2),
    ("Luxembourg", 49.8, 6.1),
    ("New Zealand", -40.9, 174.9),
];

/// Table centroid for `country`, matched case-insensitively.
pub fn centroid(country: &str) -> Option<Coordinates> {
    let wanted = country.trim();
    CENTROIDS
        .iter()
        .find(|(name, _, _)| name.eq_ignore_ascii_case(wanted))
        .map(|&(_, lat, lon)| Coordinates::new(lat, lon))
}

/// Centroid + uniform noise. Known countries get ±3° on both axes; unknown
/// ones land around the default centroid with ±3° lat and ±5° lon.
pub fn approximate<R: Rng + ?Sized>(country: &str, rng: &mut R) -> Coordinates {
    let (base, lat_span, lon_span) = match centroid(country) {
        Some(c) => (c, JITTER_KNOWN_DEG, JITTER_KNOWN_DEG),
        None => (
            Coordinates::new(DEFAULT_CENTROID.0, DEFAULT_CENTROID.1),
            JITTER_DEFAULT_LAT_DEG,
            JITTER_DEFAULT_LON_DEG,
        ),
    };
    Coordinates::new(
        base.lat + rng.gen_range(-lat_span..=lat_span),
        base.lon + rng.gen_range(-lon_span..=lon_span),
    )
}
