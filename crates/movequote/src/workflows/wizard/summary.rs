use crate::workflows::quote::{EstimateResult, IntakeRecord, JobType};

pub(crate) const ESTIMATE_DISCLAIMER: &str = "This is a rough starting range only. Final pricing will be provided after speaking with the crew and confirming details.";

/// Builds the multi-line summary e-mailed to the crew and echoed to the customer.
pub fn details_summary(record: &IntakeRecord, estimate: &EstimateResult) -> String {
    let mut lines = vec![format!("Job type: {}", record.job_type.label())];

    match record.job_type {
        JobType::Junk => {
            lines.push(format!(
                "Estimated junk weight: {}",
                record
                    .junk_weight
                    .map_or("not specified", |weight| weight.as_str())
            ));
            lines.push(format!(
                "Junk description: {}",
                or_default(&record.junk_description, "not specified")
            ));
        }
        JobType::Residential | JobType::Commercial => {
            if record.job_type == JobType::Commercial {
                lines.push(format!(
                    "Business/project: {}",
                    or_default(&record.business_type, "N/A")
                ));
                lines.push(format!(
                    "Approx. square footage: {}",
                    or_default(&record.sqft, "N/A")
                ));
            } else {
                lines.push(format!(
                    "Home size: {}, approx. square footage: {}",
                    record.size.map_or("not specified", |size| size.as_str()),
                    or_default(&record.sqft, "N/A")
                ));
            }
            lines.push(format!(
                "Approx. distance: {}",
                record.distance.map_or("N/A", |band| band.as_str())
            ));
            lines.push(format!("To ZIP: {}", or_default(&record.to_zip, "N/A")));
            lines.push(format!(
                "Stairs: {} | Elevator: {}",
                record.stairs.as_str(),
                record.has_elevator.as_str()
            ));
        }
    }

    lines.push(format!("From ZIP: {}", or_default(&record.from_zip, "N/A")));
    lines.push(format!(
        "Preferred date: {}",
        or_default(&record.move_date, "Not specified")
    ));
    lines.push(String::new());
    lines.push(format!(
        "ROUGH ESTIMATE (non-binding): {}",
        estimate.display_range()
    ));
    lines.push(ESTIMATE_DISCLAIMER.to_string());
    lines.push(String::new());
    lines.push(format!(
        "Special items / notes: {}",
        or_default(&record.special_items, "(none provided)")
    ));
    lines.push(format!(
        "Photo count (uploaded via quiz): {}",
        record.photos.len()
    ));

    lines.join("\n")
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}
