// 16-point compass directions.

const POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Turn an azimuth around: (az + 180) wrapped into [0, 360).
pub fn reverse_azimuth(azimuth: f64) -> f64 {
    (azimuth + 180.0).rem_euclid(360.0)
}

/// Nearest of the 16 compass points for an azimuth in degrees.
pub fn compass_direction(azimuth: f64) -> &'static str {
    let az = azimuth.rem_euclid(360.0);
    let index = (az / 22.5).round() as usize % POINTS.len();
    POINTS[index]
}
