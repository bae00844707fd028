use proptest::prelude::*;
use tectonic_map::region::BoundingRegion;
use tectonic_map::seismicity::{filter_to_region, RecentEarthquakeRecord};

fn region_strategy() -> impl Strategy<Value = BoundingRegion> {
    (-180.0f64..170.0, 0.5f64..40.0, -80.0f64..40.0, 0.5f64..40.0).prop_map(|(west, lon_span, south, lat_span)| {
        BoundingRegion::new(west, west + lon_span, south, (south + lat_span).min(84.0)).expect("ordered region")
    })
}

fn records_strategy() -> impl Strategy<Value = Vec<RecentEarthquakeRecord>> {
    prop::collection::vec(
        (-180.0f64..180.0, -85.0f64..85.0, 0.0f64..700.0).prop_map(|(longitude, latitude, depth)| {
            RecentEarthquakeRecord { longitude, latitude, depth }
        }),
        0..64,
    )
}

proptest! {
    #[test]
    fn filter_keeps_exactly_the_records_inside(
        region in region_strategy(),
        records in records_strategy()
    ) {
        let kept = filter_to_region(records.clone(), &region);
        let expected: Vec<RecentEarthquakeRecord> = records
            .iter()
            .copied()
            .filter(|r| {
                r.longitude >= region.min_lon()
                    && r.longitude <= region.max_lon()
                    && r.latitude >= region.min_lat()
                    && r.latitude <= region.max_lat()
            })
            .collect();

        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn filter_is_idempotent(region in region_strategy(), records in records_strategy()) {
        let once = filter_to_region(records, &region);
        let twice = filter_to_region(once.clone(), &region);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn region_edges_are_inside(
        region in region_strategy(),
        along_lon in 0.0f64..=1.0,
        along_lat in 0.0f64..=1.0,
        depth in 0.0f64..700.0
    ) {
        let lon = (region.min_lon() + along_lon * region.lon_span()).min(region.max_lon());
        let lat = (region.min_lat() + along_lat * region.lat_span()).min(region.max_lat());
        let edges = vec![
            RecentEarthquakeRecord { longitude: region.min_lon(), latitude: lat, depth },
            RecentEarthquakeRecord { longitude: region.max_lon(), latitude: lat, depth },
            RecentEarthquakeRecord { longitude: lon, latitude: region.min_lat(), depth },
            RecentEarthquakeRecord { longitude: lon, latitude: region.max_lat(), depth },
        ];

        prop_assert_eq!(filter_to_region(edges.clone(), &region), edges);
    }
}
