use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where the inference backend runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Cpu,
    Gpu,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Gpu => write!(f, "gpu"),
        }
    }
}

impl FromStr for Device {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            "gpu" | "cuda" => Ok(Device::Gpu),
            other => Err(format!("Device must be 'cpu' or 'gpu', got '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("cpu", Device::Cpu)]
    #[case("GPU", Device::Gpu)]
    #[case("cuda", Device::Gpu)]
    fn test_parse(#[case] input: &str, #[case] expected: Device) {
        assert_eq!(input.parse::<Device>().unwrap(), expected);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("tpu".parse::<Device>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for d in [Device::Cpu, Device::Gpu] {
            assert_eq!(d.to_string().parse::<Device>().unwrap(), d);
        }
    }
}
