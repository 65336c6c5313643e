use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::{DistanceBand, HomeSize, IntakeRecord, JobType, JunkWeight};

/// Non-binding price range in whole dollars. `high >= low` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EstimateResult {
    pub low: u32,
    pub high: u32,
}

impl EstimateResult {
    pub const fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    /// Renders the range the way it is shown to visitors, e.g. `$2,500 – $5,000`.
    pub fn display_range(&self) -> String {
        format!("{} – {}", format_dollars(self.low), format_dollars(self.high))
    }

    const fn widen(self, surcharge: Self) -> Self {
        Self {
            low: self.low + surcharge.low,
            high: self.high + surcharge.high,
        }
    }
}

impl fmt::Display for EstimateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_range())
    }
}

const DEFAULT_MOVE_RANGE: EstimateResult = EstimateResult::new(2000, 6000);
const COMMERCIAL_RANGE: EstimateResult = EstimateResult::new(4000, 15000);
const DEFAULT_JUNK_RANGE: EstimateResult = EstimateResult::new(300, 900);
const NO_SURCHARGE: EstimateResult = EstimateResult::new(0, 0);

impl JunkWeight {
    pub const fn price_range(self) -> EstimateResult {
        match self {
            Self::Under500 => EstimateResult::new(200, 400),
            Self::From500To1500 => EstimateResult::new(350, 700),
            Self::From1500To3000 => EstimateResult::new(600, 1200),
            Self::Over3000 => EstimateResult::new(1000, 2000),
        }
    }
}

impl HomeSize {
    pub const fn base_range(self) -> EstimateResult {
        match self {
            Self::StudioOrOneBedroom => EstimateResult::new(2000, 4000),
            Self::TwoBedroom => EstimateResult::new(2500, 5000),
            Self::ThreeBedroom => EstimateResult::new(3500, 7000),
            Self::FourBedroom => EstimateResult::new(4500, 9000),
            Self::FivePlus => EstimateResult::new(6000, 12000),
        }
    }
}

impl DistanceBand {
    pub const fn surcharge(self) -> EstimateResult {
        match self {
            Self::Under25 | Self::From25To75 => NO_SURCHARGE,
            Self::From75To150 => EstimateResult::new(500, 1000),
            Self::Over150 => EstimateResult::new(1000, 2000),
        }
    }
}

/// Computes the baseline estimate for an intake record.
///
/// Total and deterministic: unanswered or unrecognized choices fall back to the
/// default ranges, and fields that belong to other job types are never read.
pub fn compute_estimate(record: &IntakeRecord) -> EstimateResult {
    match record.job_type {
        JobType::Junk => record
            .junk_weight
            .map_or(DEFAULT_JUNK_RANGE, JunkWeight::price_range),
        JobType::Residential => {
            let base = record.size.map_or(DEFAULT_MOVE_RANGE, HomeSize::base_range);
            base.widen(distance_surcharge(record))
        }
        JobType::Commercial => COMMERCIAL_RANGE.widen(distance_surcharge(record)),
    }
}

fn distance_surcharge(record: &IntakeRecord) -> EstimateResult {
    record.distance.map_or(NO_SURCHARGE, DistanceBand::surcharge)
}

/// Clamp-and-round refinement applied on top of the baseline move estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBand {
    pub floor: u32,
    pub ceiling: u32,
    pub step: u32,
}

impl PriceBand {
    pub const STANDARD: Self = Self {
        floor: 2000,
        ceiling: 12000,
        step: 50,
    };

    fn fit(&self, value: u32) -> u32 {
        let clamped = value.clamp(self.floor, self.ceiling);
        if self.step == 0 {
            return clamped;
        }
        let rounded = (clamped + self.step / 2) / self.step * self.step;
        rounded.clamp(self.floor, self.ceiling)
    }
}

/// Which pricing rule the wizard and the estimate endpoint apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum EstimatePolicy {
    /// Unclamped lookup tables.
    #[default]
    Baseline,
    /// Move estimates are clamped to the band and rounded to its step; junk
    /// removal ranges are left alone.
    Banded(PriceBand),
}

impl EstimatePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "baseline" => Some(Self::Baseline),
            "banded" | "clamped" => Some(Self::Banded(PriceBand::STANDARD)),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Banded(_) => "banded",
        }
    }

    pub fn estimate(self, record: &IntakeRecord) -> EstimateResult {
        let baseline = compute_estimate(record);
        match (self, record.job_type) {
            (Self::Banded(band), JobType::Residential | JobType::Commercial) => {
                EstimateResult::new(band.fit(baseline.low), band.fit(baseline.high))
            }
            _ => baseline,
        }
    }
}

fn format_dollars(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}")
}
