use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};

/// Top-level selection that decides which intake fields matter and which
/// wizard steps are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    Residential,
    Commercial,
    Junk,
}

impl JobType {
    pub const fn ordered() -> [Self; 3] {
        [Self::Residential, Self::Commercial, Self::Junk]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Junk => "junk",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Residential => "Residential move",
            Self::Commercial => "Commercial move",
            Self::Junk => "Junk removal",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        parse_wire(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HomeSize {
    #[serde(rename = "studio_1br")]
    StudioOrOneBedroom,
    #[serde(rename = "2br")]
    TwoBedroom,
    #[serde(rename = "3br")]
    ThreeBedroom,
    #[serde(rename = "4br")]
    FourBedroom,
    #[serde(rename = "5plus")]
    FivePlus,
}

impl HomeSize {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::StudioOrOneBedroom,
            Self::TwoBedroom,
            Self::ThreeBedroom,
            Self::FourBedroom,
            Self::FivePlus,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StudioOrOneBedroom => "studio_1br",
            Self::TwoBedroom => "2br",
            Self::ThreeBedroom => "3br",
            Self::FourBedroom => "4br",
            Self::FivePlus => "5plus",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        parse_wire(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceBand {
    #[serde(rename = "under25")]
    Under25,
    #[serde(rename = "25-75")]
    From25To75,
    #[serde(rename = "75-150")]
    From75To150,
    #[serde(rename = "150plus")]
    Over150,
}

impl DistanceBand {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Under25,
            Self::From25To75,
            Self::From75To150,
            Self::Over150,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Under25 => "under25",
            Self::From25To75 => "25-75",
            Self::From75To150 => "75-150",
            Self::Over150 => "150plus",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        parse_wire(raw)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StairAccess {
    #[default]
    None,
    Some,
    Heavy,
}

impl StairAccess {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Some => "some",
            Self::Heavy => "heavy",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevatorAccess {
    Yes,
    No,
    #[default]
    Unsure,
}

impl ElevatorAccess {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Unsure => "unsure",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JunkWeight {
    #[serde(rename = "under500")]
    Under500,
    #[serde(rename = "500-1500")]
    From500To1500,
    #[serde(rename = "1500-3000")]
    From1500To3000,
    #[serde(rename = "3000plus")]
    Over3000,
}

impl JunkWeight {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Under500,
            Self::From500To1500,
            Self::From1500To3000,
            Self::Over3000,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Under500 => "under500",
            Self::From500To1500 => "500-1500",
            Self::From1500To3000 => "1500-3000",
            Self::Over3000 => "3000plus",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        parse_wire(raw)
    }
}

/// Raw photo picked in the wizard, before transport encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoAttachment {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl PhotoAttachment {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes,
        }
    }

    /// Declared content type, falling back to a guess from the file extension.
    pub fn resolved_content_type(&self) -> String {
        match &self.content_type {
            Some(value) if !value.trim().is_empty() => value.clone(),
            _ => mime_guess::from_path(&self.filename)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        }
    }
}

/// Answers collected across the wizard for one quote attempt.
///
/// Enumerated answers arrive as free strings from the browser; anything that
/// is empty or unrecognized is treated as "not answered" instead of rejecting
/// the whole record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntakeRecord {
    #[serde(deserialize_with = "lenient_or_default")]
    pub job_type: JobType,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub size: Option<HomeSize>,
    pub sqft: String,
    pub from_zip: String,
    pub to_zip: String,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub distance: Option<DistanceBand>,
    #[serde(deserialize_with = "lenient_or_default")]
    pub stairs: StairAccess,
    #[serde(deserialize_with = "lenient_or_default")]
    pub has_elevator: ElevatorAccess,
    pub special_items: String,
    pub business_type: String,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub junk_weight: Option<JunkWeight>,
    pub junk_description: String,
    pub move_date: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip)]
    pub photos: Vec<PhotoAttachment>,
}

impl IntakeRecord {
    pub fn for_job(job_type: JobType) -> Self {
        Self {
            job_type,
            ..Self::default()
        }
    }

    pub fn has_contact_details(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

fn parse_wire<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let deserializer: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
        trimmed.into_deserializer();
    T::deserialize(deserializer).ok()
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_wire))
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    lenient(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_values_parse_back_to_variants() {
        for size in HomeSize::ordered() {
            assert_eq!(HomeSize::parse(size.as_str()), Some(size));
        }
        for band in DistanceBand::ordered() {
            assert_eq!(DistanceBand::parse(band.as_str()), Some(band));
        }
        for weight in JunkWeight::ordered() {
            assert_eq!(JunkWeight::parse(weight.as_str()), Some(weight));
        }
        assert_eq!(JobType::parse(" junk "), Some(JobType::Junk));
        assert_eq!(HomeSize::parse("6br"), None);
        assert_eq!(DistanceBand::parse(""), None);
    }

    #[test]
    fn browser_payload_deserializes_with_camel_case_keys() {
        let record: IntakeRecord = serde_json::from_value(json!({
            "jobType": "residential",
            "size": "3br",
            "sqft": "1800",
            "fromZip": "19103",
            "toZip": "19147",
            "distance": "25-75",
            "stairs": "some",
            "hasElevator": "no",
            "moveDate": "2025-11-01",
            "name": "Dana",
            "email": "dana@example.com"
        }))
        .expect("payload parses");

        assert_eq!(record.job_type, JobType::Residential);
        assert_eq!(record.size, Some(HomeSize::ThreeBedroom));
        assert_eq!(record.distance, Some(DistanceBand::From25To75));
        assert_eq!(record.stairs, StairAccess::Some);
        assert_eq!(record.has_elevator, ElevatorAccess::No);
        assert_eq!(record.from_zip, "19103");
        assert!(record.has_contact_details());
    }

    #[test]
    fn unknown_or_empty_choices_fall_back_instead_of_failing() {
        let record: IntakeRecord = serde_json::from_value(json!({
            "jobType": "moving-truck",
            "size": "",
            "distance": "far",
            "junkWeight": null,
            "hasElevator": "maybe"
        }))
        .expect("lenient payload parses");

        assert_eq!(record.job_type, JobType::Residential);
        assert_eq!(record.size, None);
        assert_eq!(record.distance, None);
        assert_eq!(record.junk_weight, None);
        assert_eq!(record.has_elevator, ElevatorAccess::Unsure);
    }

    #[test]
    fn photo_content_type_is_guessed_from_extension() {
        let photo = PhotoAttachment::new("couch.png", vec![1, 2, 3]);
        assert_eq!(photo.resolved_content_type(), "image/png");

        let declared = PhotoAttachment {
            content_type: Some("image/heic".to_string()),
            ..PhotoAttachment::new("IMG_0001", Vec::new())
        };
        assert_eq!(declared.resolved_content_type(), "image/heic");
    }
}
