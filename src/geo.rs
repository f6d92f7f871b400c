/// Mean Earth radius in meters, as used by the haversine computation.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// haversine_distance
///
/// Great-circle distance in meters between two (longitude, latitude) points,
/// both in degrees. Used by the nearby-places query, which scans every stored
/// coordinate and filters by this distance; there is deliberately no indexed
/// geospatial query behind it, which caps scalability at small collections.
pub fn haversine_distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
