use serde::{Deserialize, Serialize};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

pub const NUMBER_PLACEHOLDER: &str = "{number}";
pub const DEFAULT_CARRIER_NAME: &str = "USPS";
pub const DEFAULT_TRACKING_URL_TEMPLATE: &str =
    "https://tools.usps.com/go/TrackConfirmAction?tLabels={number}";

/// Maps a leading run of a normalized number to the carrier service that issues it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRule {
    pub prefix: String,
    pub service: String,
}

impl PrefixRule {
    pub fn new(prefix: &str, service: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            service: service.to_string(),
        }
    }
}

pub fn default_prefix_rules() -> Vec<PrefixRule> {
    vec![
        PrefixRule::new("9400", "USPS Tracking"),
        PrefixRule::new("9205", "Priority Mail"),
        PrefixRule::new("9270", "Priority Mail Express"),
        PrefixRule::new("9407", "Certified Mail"),
        PrefixRule::new("9303", "Collect On Delivery"),
        PrefixRule::new("9208", "Registered Mail"),
        PrefixRule::new("9202", "Signature Confirmation"),
    ]
}

/// Carrier used to build customer-facing lookup links.
///
/// The prefix table is informational. A number whose prefix is unknown is still
/// accepted as long as it passes the format rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierProfile {
    pub name: String,
    pub tracking_url_template: String,
    pub prefixes: Vec<PrefixRule>,
}

impl CarrierProfile {
    pub fn new(name: &str, tracking_url_template: &str, prefixes: Vec<PrefixRule>) -> Self {
        Self {
            name: name.to_string(),
            tracking_url_template: tracking_url_template.to_string(),
            prefixes,
        }
    }

    /// Lookup URL with the number percent-encoded into the template.
    pub fn tracking_url(&self, number: &str) -> String {
        let encoded = utf8_percent_encode(number, NON_ALPHANUMERIC).to_string();
        self.tracking_url_template.replace(NUMBER_PLACEHOLDER, &encoded)
    }

    /// Service name for a normalized number, if its prefix is known.
    /// Longest matching prefix wins.
    pub fn describe(&self, normalized: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .filter(|rule| normalized.starts_with(&rule.prefix))
            .max_by_key(|rule| rule.prefix.len())
            .map(|rule| rule.service.as_str())
    }
}

impl Default for CarrierProfile {
    fn default() -> Self {
        Self::new(
            DEFAULT_CARRIER_NAME,
            DEFAULT_TRACKING_URL_TEMPLATE,
            default_prefix_rules(),
        )
    }
}
