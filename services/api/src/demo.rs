use crate::infra::{parse_distance, parse_home_size, parse_job_type, parse_junk_weight};
use async_trait::async_trait;
use chrono::Utc;
use clap::Args;
use movequote::error::AppError;
use movequote::workflows::prompt::{InMemoryPromptStore, PromptGate};
use movequote::workflows::quote::{
    DistanceBand, ElevatorAccess, EstimatePolicy, HomeSize, IntakeRecord, JobType, JunkWeight,
    PriceBand, StairAccess,
};
use movequote::workflows::wizard::{
    details_summary, DeliveryError, HttpQuoteSubmitter, QuotePayload, QuoteSubmitter,
    WizardController, WizardStep,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// residential, commercial, or junk
    #[arg(long, default_value = "residential", value_parser = parse_job_type)]
    pub(crate) job_type: JobType,
    /// Home size for residential moves (studio_1br, 2br, 3br, 4br, 5plus)
    #[arg(long, value_parser = parse_home_size)]
    pub(crate) size: Option<HomeSize>,
    /// Distance band for moves (under25, 25-75, 75-150, 150plus)
    #[arg(long, value_parser = parse_distance)]
    pub(crate) distance: Option<DistanceBand>,
    /// Load weight for junk removal (under500, 500-1500, 1500-3000, 3000plus)
    #[arg(long, value_parser = parse_junk_weight)]
    pub(crate) junk_weight: Option<JunkWeight>,
    /// Clamp and round move estimates to the standard price band
    #[arg(long)]
    pub(crate) banded: bool,
}

#[derive(Args, Debug)]
pub(crate) struct WizardDemoArgs {
    /// residential, commercial, or junk
    #[arg(long, default_value = "residential", value_parser = parse_job_type)]
    pub(crate) job_type: JobType,
    /// Post the finished quote to this URL instead of printing it
    #[arg(long)]
    pub(crate) endpoint: Option<String>,
    #[arg(long, default_value = "Sample Customer")]
    pub(crate) name: String,
    #[arg(long, default_value = "customer@example.com")]
    pub(crate) email: String,
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let EstimateArgs {
        job_type,
        size,
        distance,
        junk_weight,
        banded,
    } = args;

    let record = IntakeRecord {
        size,
        distance,
        junk_weight,
        ..IntakeRecord::for_job(job_type)
    };
    let policy = if banded {
        EstimatePolicy::Banded(PriceBand::STANDARD)
    } else {
        EstimatePolicy::Baseline
    };

    let estimate = policy.estimate(&record);
    println!("{} estimate ({} pricing)", job_type.label(), policy.label());
    println!("  Range: {}", estimate.display_range());
    println!();
    println!("{}", details_summary(&record, &estimate));
    Ok(())
}

/// Prints the payload instead of delivering it.
struct PrintingSubmitter;

#[async_trait]
impl QuoteSubmitter for PrintingSubmitter {
    async fn submit(&self, payload: QuotePayload) -> Result<(), DeliveryError> {
        let json = serde_json::to_string_pretty(&payload)
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;
        println!("\nQuote payload that would be posted:\n{json}");
        Ok(())
    }
}

pub(crate) async fn run_wizard_demo(args: WizardDemoArgs) -> Result<(), AppError> {
    let WizardDemoArgs {
        job_type,
        endpoint,
        name,
        email,
    } = args;

    let prompt = PromptGate::new(InMemoryPromptStore::default());
    let now = Utc::now();
    if prompt.should_open(now) {
        prompt.mark_seen();
        let until = prompt.dismiss(now);
        println!("Promo prompt shown once, then dismissed until {until}");
    }

    let mut wizard = WizardController::new();
    wizard.select_job_type(job_type)?;
    println!("Quote wizard: {}", job_type.label());

    loop {
        let step = wizard.current_step();
        println!(
            "  [{}/{}] {} ({}%)",
            wizard.step_index() + 1,
            wizard.total_steps(),
            step.label(),
            wizard.progress_percent()
        );
        answer_step(step, wizard.record_mut(), &name, &email);
        if wizard.is_last_step() {
            break;
        }
        wizard.next()?;
    }

    let receipt = match endpoint {
        Some(endpoint) => {
            println!("Submitting to {endpoint}");
            wizard
                .submit(Arc::new(HttpQuoteSubmitter::new(endpoint)))
                .await?
        }
        None => wizard.submit(Arc::new(PrintingSubmitter)).await?,
    };

    println!("\nYour rough estimate: {}", receipt.estimate.display_range());
    match receipt.delivery.await {
        Ok(status) => println!("Delivery status: {status:?}"),
        Err(err) => println!("Delivery task did not finish: {err}"),
    }
    Ok(())
}

fn answer_step(step: WizardStep, record: &mut IntakeRecord, name: &str, email: &str) {
    match step {
        WizardStep::JobType => {}
        WizardStep::HomeAndDistance => {
            record.size = Some(HomeSize::TwoBedroom);
            record.distance = Some(DistanceBand::From25To75);
            record.from_zip = "19104".to_string();
            record.to_zip = "19380".to_string();
        }
        WizardStep::ScopeAndDistance => {
            record.business_type = "Dental office".to_string();
            record.sqft = "2400".to_string();
            record.distance = Some(DistanceBand::Under25);
            record.from_zip = "19103".to_string();
            record.to_zip = "19107".to_string();
        }
        WizardStep::JunkDetails => {
            record.junk_weight = Some(JunkWeight::From500To1500);
            record.junk_description = "Old sectional and a treadmill".to_string();
            record.from_zip = "19125".to_string();
        }
        WizardStep::Logistics => {
            record.stairs = StairAccess::Some;
            record.has_elevator = ElevatorAccess::No;
            record.special_items = "Upright piano".to_string();
            record.move_date = "2026-11-21".to_string();
        }
        WizardStep::Contact => {
            record.name = name.to_string();
            record.email = email.to_string();
            record.phone = "215-555-0100".to_string();
        }
    }
}
