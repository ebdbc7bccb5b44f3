//! Dispatch-responsibility classification
//!
//! The same three-tier precedence (retailer dispatch, platform logistics,
//! merchant logistics) classifies the main seller and every other-seller row.

use crate::extract::chain::{first_success, Strategy};
use regex::Regex;
use serde::Serialize;
use std::ops::{Add, AddAssign};
use std::sync::LazyLock;

/// Who sells and who ships an offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DispatchType {
    /// The platform itself is the seller of record
    #[serde(rename = "AMZ")]
    Amz,
    /// Third-party seller, platform-operated logistics
    #[serde(rename = "FBA")]
    Fba,
    /// Third-party seller, self-operated logistics
    #[serde(rename = "FBM")]
    Fbm,
    /// Not enough signal to decide
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl DispatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amz => "AMZ",
            Self::Fba => "FBA",
            Self::Fbm => "FBM",
            Self::Unknown => "UNKNOWN",
        }
    }
}

const AMZ_PHRASES: &[&str] = &[
    "sold by amazon",
    "ships from and sold by amazon",
    "dispatched from and sold by amazon",
];

const FBA_PHRASES: &[&str] = &[
    "fulfilled by amazon",
    "fba",
    "ships from amazon",
    "dispatched by amazon",
    "dispatched from amazon",
    "dispatches from amazon",
];

const FBM_PHRASES: &[&str] = &[
    "ships from",
    "sold by",
    "fulfilled by merchant",
    "fbm",
    "dispatched by",
    "dispatched from",
];

fn retailer_dispatch(folded: &str) -> Option<DispatchType> {
    AMZ_PHRASES
        .iter()
        .any(|phrase| folded.contains(phrase))
        .then_some(DispatchType::Amz)
}

fn platform_logistics(folded: &str) -> Option<DispatchType> {
    let phrase = FBA_PHRASES.iter().any(|phrase| folded.contains(phrase));
    let co_occurrence = folded.contains("amazon") && folded.contains("fulfil");
    (phrase || co_occurrence).then_some(DispatchType::Fba)
}

fn merchant_logistics(folded: &str) -> Option<DispatchType> {
    FBM_PHRASES
        .iter()
        .any(|phrase| folded.contains(phrase))
        .then_some(DispatchType::Fbm)
}

/// Classifies case-folded seller text, first matching tier wins
///
/// # Examples
///
/// ```
/// use listing_lens::extract::{classify_dispatch, DispatchType};
///
/// assert_eq!(classify_dispatch("dispatched from and sold by amazon.co.uk"), DispatchType::Amz);
/// assert_eq!(classify_dispatch("sold by acme and fulfilled by amazon"), DispatchType::Fba);
/// assert_eq!(classify_dispatch("ships from and sold by acme"), DispatchType::Fbm);
/// assert_eq!(classify_dispatch("in stock"), DispatchType::Unknown);
/// ```
pub fn classify_dispatch(folded: &str) -> DispatchType {
    first_success(
        folded,
        &[
            Strategy::new("retailer", retailer_dispatch),
            Strategy::new("platform-logistics", platform_logistics),
            Strategy::new("merchant-logistics", merchant_logistics),
        ],
    )
    .unwrap_or(DispatchType::Unknown)
}

/// Offer counts per dispatch type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchTally {
    pub amz: u32,
    pub fba: u32,
    pub fbm: u32,
}

impl DispatchTally {
    /// A tally holding one offer of the given type (nothing for Unknown)
    pub fn single(dispatch: DispatchType) -> Self {
        let mut tally = Self::default();
        tally.record(dispatch);
        tally
    }

    pub fn record(&mut self, dispatch: DispatchType) {
        match dispatch {
            DispatchType::Amz => self.amz += 1,
            DispatchType::Fba => self.fba += 1,
            DispatchType::Fbm => self.fbm += 1,
            DispatchType::Unknown => {}
        }
    }

    pub fn total(&self) -> u32 {
        self.amz + self.fba + self.fbm
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Removes one count from every non-zero type
    pub fn discount_one_each(self) -> Self {
        Self {
            amz: self.amz.saturating_sub(1),
            fba: self.fba.saturating_sub(1),
            fbm: self.fbm.saturating_sub(1),
        }
    }
}

impl Add for DispatchTally {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            amz: self.amz + other.amz,
            fba: self.fba + other.fba,
            fbm: self.fbm + other.fbm,
        }
    }
}

impl AddAssign for DispatchTally {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

static AMZ_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ships from and sold by amazon|dispatched from and sold by amazon|sold by amazon")
        .expect("valid regex")
});

static FBA_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"fulfilled by amazon|fba").expect("valid regex"));

static FBM_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ships from|sold by|fulfilled by merchant|fbm|dispatched by").expect("valid regex")
});

/// Counts dispatch phrase occurrences in case-folded text
///
/// Each type is counted independently, so one sentence may contribute to
/// more than one type.
pub fn count_mentions(folded: &str) -> DispatchTally {
    DispatchTally {
        amz: AMZ_MENTION.find_iter(folded).count() as u32,
        fba: FBA_MENTION.find_iter(folded).count() as u32,
        fbm: FBM_MENTION.find_iter(folded).count() as u32,
    }
}
