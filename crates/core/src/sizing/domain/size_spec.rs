use std::fmt;
use std::str::FromStr;

use crate::shared::constants::LATENT_ALIGNMENT;
use crate::shared::error::LoadError;

const DISABLED: &str = "Disabled";
const WILDCARD: &str = "?";

/// Requested output resolution, written `"<w>x<h>"` where at most one axis
/// may be `?`, or the literal `"Disabled"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SizeSpec {
    #[default]
    Disabled,
    Exact { width: u32, height: u32 },
    /// `"<w>x?"`: height follows the source aspect ratio.
    FixedWidth(u32),
    /// `"?x<h>"`: width follows the source aspect ratio.
    FixedHeight(u32),
}

impl SizeSpec {
    /// Resolves the output size for a `src_width x src_height` source.
    ///
    /// The derived axis is snapped to the nearest multiple of 8 (ties round
    /// up). Returns `None` for [`SizeSpec::Disabled`]. Callers must reject
    /// zero-area sources first.
    pub fn target_size(&self, src_width: u32, src_height: u32) -> Option<(u32, u32)> {
        let scaled = |value: u32, numerator: u32, denominator: u32| {
            let raw = u64::from(value) * u64::from(numerator) / u64::from(denominator);
            snap_to_alignment(raw.min(u64::from(u32::MAX - LATENT_ALIGNMENT)) as u32)
        };
        match *self {
            SizeSpec::Disabled => None,
            SizeSpec::Exact { width, height } => Some((width, height)),
            SizeSpec::FixedHeight(height) => Some((scaled(src_width, height, src_height), height)),
            SizeSpec::FixedWidth(width) => Some((width, scaled(src_height, width, src_width))),
        }
    }
}

/// `(value + 4) & !7`: nearest multiple of 8, halfway rounds up.
pub fn snap_to_alignment(value: u32) -> u32 {
    let half = LATENT_ALIGNMENT / 2;
    (value + half) & !(LATENT_ALIGNMENT - 1)
}

impl FromStr for SizeSpec {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == DISABLED {
            return Ok(SizeSpec::Disabled);
        }
        let invalid = || LoadError::InvalidSizeSpec(s.to_string());

        let (width, height) = s.split_once('x').ok_or_else(invalid)?;
        let axis = |text: &str| -> Result<Option<u32>, LoadError> {
            if text == WILDCARD {
                return Ok(None);
            }
            match text.parse::<u32>() {
                Ok(value) if value > 0 => Ok(Some(value)),
                _ => Err(invalid()),
            }
        };

        match (axis(width)?, axis(height)?) {
            (Some(width), Some(height)) => Ok(SizeSpec::Exact { width, height }),
            (Some(width), None) => Ok(SizeSpec::FixedWidth(width)),
            (None, Some(height)) => Ok(SizeSpec::FixedHeight(height)),
            (None, None) => Err(invalid()),
        }
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeSpec::Disabled => write!(f, "{DISABLED}"),
            SizeSpec::Exact { width, height } => write!(f, "{width}x{height}"),
            SizeSpec::FixedWidth(width) => write!(f, "{width}x{WILDCARD}"),
            SizeSpec::FixedHeight(height) => write!(f, "{WILDCARD}x{height}"),
        }
    }
}
