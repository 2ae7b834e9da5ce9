use serde::{Deserialize, Serialize};

/// Options for [`ValueEncoder`](crate::ValueEncoder) and
/// [`ValueDecoder`](crate::ValueDecoder).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodingConfig {
    /// Sort every object's keys after encoding. Without this, objects keep
    /// the order their fields were written in.
    pub sort_keys: bool,
    /// Pretty-print JSON output.
    pub pretty: bool,
    /// Let integral floats such as `1.0` decode as integers. When off, a
    /// float requested as an integer is a type mismatch.
    pub accept_integral_floats: bool,
}

impl CodingConfig {
    /// Stable output: sorted keys, compact JSON.
    pub fn canonical() -> Self {
        Self {
            sort_keys: true,
            ..Default::default()
        }
    }

    /// Accept integral floats where integers are expected, for input
    /// produced by tools that write every number as a double.
    pub fn lenient() -> Self {
        Self {
            accept_integral_floats: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: CodingConfig = serde_json::from_str(r#"{"pretty": true}"#).unwrap();
        assert!(config.pretty);
        assert!(!config.sort_keys);
        assert!(!config.accept_integral_floats);
    }

    #[test]
    fn default_is_all_off() {
        let config = CodingConfig::default();
        assert!(!config.sort_keys && !config.pretty && !config.accept_integral_floats);
        assert_eq!(serde_json::from_str::<CodingConfig>("{}").unwrap(), config);
    }

    #[test]
    fn presets_change_one_field() {
        let canonical = CodingConfig::canonical();
        assert!(canonical.sort_keys);
        assert!(!canonical.pretty);

        let lenient = CodingConfig::lenient();
        assert!(lenient.accept_integral_floats);
        assert!(!lenient.sort_keys);
    }
}
