//! 住所から地域を推定する
//!
//! 住所文字列に都市名が含まれていれば、その都市の座標を返す。
//! ギリシャ文字の住所はラテン文字に変換してから探す。

use costo_match_common::transliterate;

/// 地域と代表座標
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

/// 都市名（大文字ラテン表記）と座標。先に一致したものを採用する
const CITIES: &[(&str, &str, f64, f64)] = &[
    ("MELISSIA", "Melissia", 38.05, 23.83),
    ("RETHYMNO", "Rethymno", 35.36, 24.47),
    ("THESSALONIKI", "Thessaloniki", 40.64, 22.94),
    ("ATHINA", "Athina", 37.98, 23.72),
    ("CHANIA", "Chania", 35.51, 24.02),
    ("KOS", "Kos", 36.89, 27.28),
];

pub const UNKNOWN_REGION: &str = "Unknown";

/// 住所から地域を探す
pub fn locate(address: &str) -> Option<Region> {
    let upper = address.to_uppercase();
    find_city(&upper).or_else(|| find_city(&transliterate(address)))
}

fn find_city(haystack: &str) -> Option<Region> {
    CITIES
        .iter()
        .find(|(key, _, _, _)| haystack.contains(key))
        .map(|&(_, name, lat, lon)| Region { name, lat, lon })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_address() {
        let region = locate("Leoforos Lykourgou 12, Melissia 151 27").unwrap();
        assert_eq!(region.name, "Melissia");
        assert_eq!(region.lat, 38.05);
        assert_eq!(region.lon, 23.83);
    }

    #[test]
    fn test_greek_address() {
        // ΧΑΝΙΑ → XANIA なので一致しない、ΑΘΗΝΑ → ATHINA は一致する
        assert_eq!(locate("Ερμού 5, Αθήνα").map(|r| r.name), Some("Athina"));
        assert_eq!(locate("Ρέθυμνο").map(|r| r.name), Some("Rethymno"));
    }

    #[test]
    fn test_first_listed_city_wins() {
        assert_eq!(locate("Thessaloniki / Athina").map(|r| r.name), Some("Thessaloniki"));
    }

    #[test]
    fn test_unknown_address() {
        assert_eq!(locate("Unknown Address"), None);
        assert_eq!(locate(""), None);
    }
}
