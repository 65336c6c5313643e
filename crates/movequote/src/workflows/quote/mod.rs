//! Intake record and the pricing tables behind the non-binding estimate.

pub mod domain;
mod engine;

pub use domain::{
    DistanceBand, ElevatorAccess, HomeSize, IntakeRecord, JobType, JunkWeight, PhotoAttachment,
    StairAccess,
};
pub use engine::{compute_estimate, EstimatePolicy, EstimateResult, PriceBand};
