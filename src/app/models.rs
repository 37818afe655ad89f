//! Data models for Sounding Catalog
//!
//! This module defines the closed set of data sources and models, the
//! validated [`Product`] pairing of the two, and the timestamp formats that
//! appear in the published listings.

use std::fmt;

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::errors::{DiscoveryError, DiscoveryResult};

/// Initialization or observation time of one published dataset (UTC, hourly)
pub type RunTime = NaiveDateTime;

/// Short code naming a sounding site
pub type StationId = String;

/// External provider of sounding data
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Source {
    /// Storm Prediction Center observed soundings
    Spc,
    /// Penn State BUFKIT mirror, standard cycles
    Psu,
    /// Penn State BUFKIT mirror, NAM off-hour cycles
    PsuOff,
    /// University of Oklahoma PECAN ensemble
    OuPecan,
    /// NCAR ensemble (OU mirror)
    NcarEns,
    /// NSSL WRF placeholder
    Nssl,
}

impl Source {
    /// Key used on the command line and in output
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Models published by this source
    pub fn models(&self) -> &'static [Model] {
        match self {
            Self::Spc => &[Model::Observed],
            Self::Psu => &[
                Model::Gfs,
                Model::Nam,
                Model::Rap,
                Model::Hrrr,
                Model::Nam4km,
                Model::Sref,
            ],
            Self::PsuOff => &[Model::Nam, Model::Nam4km],
            Self::OuPecan => &[Model::PecanEnsemble],
            Self::NcarEns => &[Model::NcarEnsemble],
            Self::Nssl => &[Model::NsslWrf, Model::NsslWrfEnsemble],
        }
    }
}

/// Forecast model or observation category within a source
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Model {
    /// Observed radiosonde launches
    Observed,
    /// Global Forecast System
    Gfs,
    /// North American Mesoscale model
    Nam,
    /// Rapid Refresh
    Rap,
    /// High-Resolution Rapid Refresh
    Hrrr,
    /// 4 km NAM nest
    #[strum(to_string = "4km nam", serialize = "nam4km")]
    Nam4km,
    /// Short-Range Ensemble Forecast
    Sref,
    /// PECAN field campaign ensemble
    #[strum(to_string = "pecan ensemble")]
    PecanEnsemble,
    /// NCAR convection-allowing ensemble
    #[strum(to_string = "ncar ensemble")]
    NcarEnsemble,
    /// NSSL WRF deterministic run
    #[strum(to_string = "nssl wrf")]
    NsslWrf,
    /// NSSL WRF ensemble
    #[strum(to_string = "nssl wrf ensemble")]
    NsslWrfEnsemble,
}

impl Model {
    /// Name used on the command line and in output
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Whether the NAM cycle-parity correction applies
    pub fn is_nam_family(&self) -> bool {
        matches!(self, Self::Nam | Self::Nam4km)
    }

    /// Name of the model in the PSU `.done` markers (e.g. `nam4km`)
    pub fn psu_listing_name(&self) -> Option<&'static str> {
        match self {
            Self::Gfs => Some("gfs"),
            Self::Nam => Some("nam"),
            Self::Rap => Some("rap"),
            Self::Hrrr => Some("hrrr"),
            Self::Nam4km => Some("nam4km"),
            Self::Sref => Some("sref"),
            _ => None,
        }
    }

    /// Per-model directory on the PSU mirror (e.g. `NAM4KM`)
    pub fn psu_directory(&self) -> Option<String> {
        self.psu_listing_name().map(str::to_uppercase)
    }

    /// Regex fragment matching the model prefix of PSU station files
    ///
    /// NAM files are published both as `nam_` and `namm_`, so the trailing
    /// letter is optional.
    pub fn psu_file_token(&self) -> Option<&'static str> {
        match self {
            Self::Gfs => Some("gfs3"),
            Self::Nam => Some("namm?"),
            Self::Rap => Some("rap"),
            Self::Hrrr => Some("hrrr"),
            Self::Nam4km => Some("nam4kmm?"),
            Self::Sref => Some("sref"),
            _ => None,
        }
    }
}

/// A published source/model pairing
///
/// Only pairs listed by [`Source::models`] can be constructed, so every
/// `Product` has a discovery routine (or an explicit "not implemented").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Product {
    source: Source,
    model: Model,
}

impl Product {
    /// Pair a source with a model
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::UnknownSource` if the source does not publish the model
    pub fn new(source: Source, model: Model) -> DiscoveryResult<Self> {
        if source.models().contains(&model) {
            Ok(Self { source, model })
        } else {
            Err(DiscoveryError::unknown(source.as_str(), model.as_str()))
        }
    }

    /// Pair a source and model given by name
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::UnknownSource` naming both keys if either key is
    /// unknown or the pairing is not published
    pub fn parse(source: &str, model: &str) -> DiscoveryResult<Self> {
        let unknown = || DiscoveryError::unknown(source, model);
        let source = source.parse::<Source>().map_err(|_| unknown())?;
        let model = model.parse::<Model>().map_err(|_| unknown())?;
        Self::new(source, model).map_err(|_| unknown())
    }

    /// Every published pairing, grouped by source
    pub fn all() -> Vec<Self> {
        Source::iter()
            .flat_map(|source| {
                source
                    .models()
                    .iter()
                    .map(move |&model| Self { source, model })
            })
            .collect()
    }

    /// The data source
    pub fn source(&self) -> Source {
        self.source
    }

    /// The model or category
    pub fn model(&self) -> Model {
        self.model
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.source, self.model)
    }
}

/// Timestamp layouts found in the listings
pub mod timestamps {
    use super::*;

    /// `YYMMDDHH`, used by SPC and PECAN directory names
    pub const YYMMDDHH: &str = "%y%m%d%H";

    /// `YYYYMMDDHH`, used in PECAN file names
    pub const YYYYMMDDHH: &str = "%Y%m%d%H";

    /// `YYYYMMDDHHMM`, used in PSU `.done` markers
    pub const YYYYMMDDHHMM: &str = "%Y%m%d%H%M";

    /// `YYYYMMDD_HH`, used by the NCAR ensemble directories
    pub const YYYYMMDD_HH: &str = "%Y%m%d_%H";

    /// Parse `YYMMDDHH`
    ///
    /// Two-digit years 69-99 are in the 1900s and 00-68 in the 2000s, as
    /// POSIX `strptime` reads them. chrono puts 69 in the 2000s, so that one
    /// year is moved back a century.
    pub fn parse_yymmddhh(token: &str) -> DiscoveryResult<RunTime> {
        let run = parse_hourly(token, YYMMDDHH, 8)?;
        if run.year() == 2069 {
            run.with_year(1969).ok_or_else(|| invalid(token))
        } else {
            Ok(run)
        }
    }

    /// Parse `YYYYMMDDHH`
    pub fn parse_yyyymmddhh(token: &str) -> DiscoveryResult<RunTime> {
        parse_hourly(token, YYYYMMDDHH, 10)
    }

    /// Parse `YYYYMMDDHHMM`
    pub fn parse_yyyymmddhhmm(token: &str) -> DiscoveryResult<RunTime> {
        if token.len() != 12 {
            return Err(invalid(token));
        }
        NaiveDateTime::parse_from_str(token, YYYYMMDDHHMM).map_err(|_| invalid(token))
    }

    /// Parse `YYYYMMDD_HH`
    pub fn parse_yyyymmdd_hh(token: &str) -> DiscoveryResult<RunTime> {
        parse_hourly(token, YYYYMMDD_HH, 11)
    }

    // chrono needs a minute to build a NaiveDateTime, and accepts single-digit
    // fields, so the token length is checked before parsing.
    fn parse_hourly(token: &str, layout: &str, len: usize) -> DiscoveryResult<RunTime> {
        if token.len() != len {
            return Err(invalid(token));
        }
        NaiveDateTime::parse_from_str(&format!("{}00", token), &format!("{}%M", layout))
            .map_err(|_| invalid(token))
    }

    fn invalid(token: &str) -> DiscoveryError {
        DiscoveryError::InvalidTimestamp {
            value: token.to_string(),
        }
    }
}
