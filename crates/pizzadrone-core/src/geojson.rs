//! GeoJSON rendering of a planned route and the regions it was planned around.

use serde_json::{json, Value};

use crate::models::{LngLat, NamedRegion};

fn position(point: LngLat) -> [f64; 2] {
    [point.lng, point.lat]
}

fn closed_ring(vertices: &[LngLat]) -> Vec<[f64; 2]> {
    let mut ring: Vec<[f64; 2]> = vertices.iter().copied().map(position).collect();
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if first != last {
            ring.push(first);
        }
    }
    ring
}

fn region_feature(region: &NamedRegion, fill: &str) -> Value {
    json!({
        "type": "Feature",
        "properties": {
            "name": region.name,
            "fill": fill
        },
        "geometry": {
            "type": "Polygon",
            "coordinates": [closed_ring(&region.vertices)]
        }
    })
}

/// Build a FeatureCollection with the flight path, the delivery point, the
/// central area and every no-fly zone.
pub fn route_feature_collection(
    path: &[LngLat],
    destination_name: &str,
    destination: LngLat,
    central_area: &NamedRegion,
    no_fly_zones: &[NamedRegion],
) -> Value {
    let line: Vec<[f64; 2]> = path.iter().copied().map(position).collect();

    let mut features = vec![
        json!({
            "type": "Feature",
            "properties": {
                "name": "Flight Path",
                "color": "#ff0000"
            },
            "geometry": {
                "type": "LineString",
                "coordinates": line
            }
        }),
        json!({
            "type": "Feature",
            "properties": {
                "name": destination_name,
                "marker-symbol": "building",
                "marker-color": "#ffff00"
            },
            "geometry": {
                "type": "Point",
                "coordinates": position(destination)
            }
        }),
        region_feature(central_area, "none"),
    ];
    features.extend(no_fly_zones.iter().map(|zone| region_feature(zone, "#ff0000")));

    json!({
        "type": "FeatureCollection",
        "features": features
    })
}
