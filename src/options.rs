//! Encoding options and their validation.

use core::convert::TryFrom;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{QrError, Result};
use crate::segment::{find_minimum_version, find_version_in_range, segment_input};
use crate::version::{EccLevel, Mask, Version};

/// Version selection: the smallest fitting version, or a pinned one.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum VersionChoice {
    #[default]
    Auto,
    Fixed(u8),
}

impl VersionChoice {
    /// `None` for automatic selection; fails for numbers outside 1–40.
    pub fn resolve(self) -> Result<Option<Version>> {
        match self {
            VersionChoice::Auto => Ok(None),
            VersionChoice::Fixed(v) => Version::try_from(v).map(Some),
        }
    }
}

/// Mask selection: lowest penalty, or a pinned mask id.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum MaskChoice {
    #[default]
    Auto,
    Fixed(u8),
}

impl MaskChoice {
    /// `None` for automatic selection; fails for numbers outside 0–7.
    pub fn resolve(self) -> Result<Option<Mask>> {
        match self {
            MaskChoice::Auto => Ok(None),
            MaskChoice::Fixed(m) => Mask::try_from(m).map(Some),
        }
    }
}

fn parse_choice(s: &str, what: &str) -> Result<Option<u8>> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    s.parse::<u8>()
        .map(Some)
        .map_err(|_| QrError::InvalidOption(format!("{} {:?} is neither \"auto\" nor a number", what, s)))
}

impl FromStr for VersionChoice {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self> {
        match parse_choice(s, "version")? {
            None => Ok(VersionChoice::Auto),
            Some(v) => Version::try_from(v).map(|_| VersionChoice::Fixed(v)),
        }
    }
}

impl FromStr for MaskChoice {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self> {
        match parse_choice(s, "mask")? {
            None => Ok(MaskChoice::Auto),
            Some(m) => Mask::try_from(m).map(|_| MaskChoice::Fixed(m)),
        }
    }
}

impl fmt::Display for VersionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionChoice::Auto => f.write_str("auto"),
            VersionChoice::Fixed(v) => write!(f, "{}", v),
        }
    }
}

impl fmt::Display for MaskChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskChoice::Auto => f.write_str("auto"),
            MaskChoice::Fixed(m) => write!(f, "{}", m),
        }
    }
}

/// Options for [`generate`](crate::generate).
///
/// # Example
///
/// ```rust
/// use qrcraft::{EccLevel, EncodeOptions, MaskChoice, VersionChoice};
///
/// let options = EncodeOptions::default()
///     .ecc_level(EccLevel::Q)
///     .version(VersionChoice::Fixed(5))
///     .mask(MaskChoice::Auto)
///     .quiet_zone(2);
/// assert_eq!(options.ecc_level, EccLevel::Q);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct EncodeOptions {
    /// Error correction level, `M` by default.
    pub ecc_level: EccLevel,
    pub version: VersionChoice,
    pub mask: MaskChoice,
    /// Light border width in modules. Only read by renderers.
    pub quiet_zone: u32,
    /// Raise the ECC level while the data still fits the chosen version.
    pub boost_ecc: bool,
    /// On a capacity failure retry at the next lower ECC level (H, Q, M, L).
    pub ecc_fallback: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            ecc_level: EccLevel::M,
            version: VersionChoice::Auto,
            mask: MaskChoice::Auto,
            quiet_zone: 4,
            boost_ecc: false,
            ecc_fallback: false,
        }
    }
}

impl EncodeOptions {
    pub fn ecc_level(mut self, ecc_level: EccLevel) -> Self {
        self.ecc_level = ecc_level;
        self
    }

    pub fn version(mut self, version: VersionChoice) -> Self {
        self.version = version;
        self
    }

    pub fn mask(mut self, mask: MaskChoice) -> Self {
        self.mask = mask;
        self
    }

    pub fn quiet_zone(mut self, quiet_zone: u32) -> Self {
        self.quiet_zone = quiet_zone;
        self
    }

    pub fn boost_ecc(mut self, boost_ecc: bool) -> Self {
        self.boost_ecc = boost_ecc;
        self
    }

    pub fn ecc_fallback(mut self, ecc_fallback: bool) -> Self {
        self.ecc_fallback = ecc_fallback;
        self
    }
}

/// Lists every constraint `data` and `options` violate, without encoding.
/// An empty list means [`generate`](crate::generate) will succeed.
pub fn validate_input(data: &str, options: &EncodeOptions) -> Vec<String> {
    let mut problems = Vec::new();
    if data.is_empty() {
        problems.push("data must be a non-empty string".to_string());
    }
    let version = match options.version.resolve() {
        Ok(v) => v,
        Err(err) => {
            problems.push(err.to_string());
            None
        }
    };
    if let Err(err) = options.mask.resolve() {
        problems.push(err.to_string());
    }
    if !problems.is_empty() {
        return problems;
    }

    let Ok(segs) = segment_input(data) else {
        return problems;
    };
    let mut ecl = Some(options.ecc_level);
    let mut last_err = None;
    while let Some(level) = ecl {
        let fit = match version {
            Some(v) => find_version_in_range(&segs, level, v, v),
            None => find_minimum_version(&segs, level),
        };
        match fit {
            Ok(_) => return problems,
            Err(err) => last_err = Some(err),
        }
        ecl = if options.ecc_fallback { level.lower() } else { None };
    }
    if let Some(err) = last_err {
        problems.push(err.to_string());
    }
    problems
}
