//! Hand-authored point datasets: notable historical earthquakes and active
//! volcanoes around the Philippine Sea Plate.
//!
//! Coordinates follow the ISC-GEM / USGS catalogue epicentres and the
//! Smithsonian GVP summit positions, rounded to two decimals.

/// A notable historical earthquake.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistoricalEvent {
    pub longitude: f64,
    pub latitude: f64,
    pub label: &'static str,
}

/// An active volcano.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Volcano {
    pub longitude: f64,
    pub latitude: f64,
    pub name: &'static str,
}

pub const HISTORICAL_EVENTS: [HistoricalEvent; 3] = [
    HistoricalEvent { longitude: 139.3, latitude: 35.3, label: "1923 Kanto (M7.9)" },
    HistoricalEvent { longitude: 120.98, latitude: 23.85, label: "1999 Chi-Chi (M7.7)" },
    HistoricalEvent { longitude: 121.35, latitude: 15.7, label: "1990 Luzon (M7.7)" },
];

pub const VOLCANOES: [Volcano; 5] = [
    Volcano { longitude: 138.72, latitude: 35.36, name: "Mt. Fuji" },
    Volcano { longitude: 120.35, latitude: 15.14, name: "Pinatubo" },
    Volcano { longitude: 123.68, latitude: 13.25, name: "Mayon" },
    Volcano { longitude: 130.65, latitude: 31.59, name: "Sakurajima" },
    Volcano { longitude: 140.0, latitude: 30.0, name: "Izu-Oshima" },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::BoundingRegion;

    #[test]
    fn test_catalogue_sizes_and_order() {
        assert_eq!(HISTORICAL_EVENTS.len(), 3);
        assert_eq!(HISTORICAL_EVENTS[0].label, "1923 Kanto (M7.9)");
        assert_eq!(VOLCANOES.len(), 5);
        assert_eq!(VOLCANOES[4].name, "Izu-Oshima");
    }

    #[test]
    fn test_all_points_fall_inside_default_region() {
        let region = BoundingRegion::philippine_sea();
        for e in &HISTORICAL_EVENTS {
            assert!(region.contains(e.longitude, e.latitude), "{} outside region", e.label);
        }
        for v in &VOLCANOES {
            assert!(region.contains(v.longitude, v.latitude), "{} outside region", v.name);
        }
    }
}
