//! Region codes and the registry host serving each of them

use crate::error::{RegistryError, Result};

/// `(region codes, service URL)`; the first code of each row is canonical.
const REGIONS: &[(&[&str], &str)] = &[
    (&["global"], "https://icr.io"),
    (&["us-south"], "https://us.icr.io"),
    (&["uk-south", "eu-gb"], "https://uk.icr.io"),
    (&["eu-central", "eu-de"], "https://de.icr.io"),
    (&["ap-south", "au-syd"], "https://au.icr.io"),
    (&["ap-north", "jp-tok"], "https://jp.icr.io"),
    (&["jp-osa"], "https://jp2.icr.io"),
    (&["ca-tor"], "https://ca.icr.io"),
    (&["br-sao"], "https://br.icr.io"),
];

/// Service URL for a region code, case-insensitively.
pub fn service_url_for_region(region: &str) -> Result<&'static str> {
    let wanted = region.trim().to_ascii_lowercase();
    REGIONS
        .iter()
        .find(|(codes, _)| codes.contains(&wanted.as_str()))
        .map(|(_, url)| *url)
        .ok_or_else(|| {
            RegistryError::Configuration(format!(
                "Unknown region '{}'; expected one of: {}",
                region,
                region_codes().collect::<Vec<_>>().join(", ")
            ))
        })
}

/// Every accepted region code, aliases included.
pub fn region_codes() -> impl Iterator<Item = &'static str> {
    REGIONS.iter().flat_map(|(codes, _)| codes.iter().copied())
}
