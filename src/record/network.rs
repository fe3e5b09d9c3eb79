// Contributing-network codes → names.
//
// ANSS regional networks and the NEIC. Codes not listed here come back
// as None and end up as an empty network name on the record.

const NETWORKS: &[(&str, &str)] = &[
    ("ak", "Alaska Earthquake Center"),
    ("at", "National Tsunami Warning Center"),
    ("ci", "California Integrated Seismic Network: Southern California Seismic Network"),
    ("hv", "Hawaiian Volcano Observatory"),
    ("ld", "Lamont-Doherty Cooperative Seismographic Network"),
    ("mb", "Montana Bureau of Mines and Geology"),
    ("nc", "California Integrated Seismic Network: Northern California Seismic System"),
    ("nm", "New Madrid Seismic Network"),
    ("nn", "Nevada Seismological Laboratory"),
    ("ok", "Oklahoma Geological Survey"),
    ("pr", "Puerto Rico Seismic Network"),
    ("pt", "Pacific Tsunami Warning Center"),
    ("se", "Center for Earthquake Research and Information"),
    ("tx", "Texas Seismological Network"),
    ("us", "USGS National Earthquake Information Center, PDE"),
    ("uu", "University of Utah Seismograph Stations"),
    ("uw", "Pacific Northwest Seismic Network"),
];

/// Look up a network's name by its code (case-insensitive).
pub fn network_name(code: &str) -> Option<&'static str> {
    let code = code.trim().to_ascii_lowercase();
    NETWORKS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_network() {
        assert_eq!(
            network_name("us"),
            Some("USGS National Earthquake Information Center, PDE")
        );
        assert_eq!(network_name("UW"), Some("Pacific Northwest Seismic Network"));
    }

    #[test]
    fn test_unknown_network() {
        assert_eq!(network_name("zz"), None);
        assert_eq!(network_name(""), None);
    }
}
