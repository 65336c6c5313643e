/// How the quote endpoint answers when delivery could not happen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryFailurePolicy {
    /// Always answer 200 with `ok: true` and a warning code, so the visitor
    /// never sees an error screen.
    #[default]
    AlwaysOk,
    /// Answer with an error status and `ok: false`.
    Strict,
}

impl DeliveryFailurePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "always_ok" | "always-ok" | "lenient" => Some(Self::AlwaysOk),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessContact {
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteMailSettings {
    pub from: String,
    pub owner: String,
    pub forward: Option<String>,
    pub failure_policy: DeliveryFailurePolicy,
}

impl QuoteMailSettings {
    pub fn internal_recipients(&self) -> Vec<String> {
        std::iter::once(self.owner.clone())
            .chain(self.forward.clone())
            .filter(|address| !address.trim().is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromoCodeSource {
    Fixed(String),
    Generated { prefix: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoSettings {
    pub from: String,
    pub owner: String,
    pub manager: Option<String>,
    pub subject: String,
    pub code: PromoCodeSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositSettings {
    pub amount_cents: u32,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistSettings {
    pub url: String,
    pub from: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiringSettings {
    pub to: String,
    pub from: String,
}

/// Recipients, templates, and amounts for every lead handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSettings {
    pub business: BusinessContact,
    pub quote: QuoteMailSettings,
    pub promo: PromoSettings,
    pub deposit: DepositSettings,
    pub checklist: ChecklistSettings,
    pub hiring: HiringSettings,
}

impl Default for LeadSettings {
    fn default() -> Self {
        let business = BusinessContact {
            name: "Neighborhood Krew Inc".to_string(),
            phone: "(215) 531-0907".to_string(),
            email: "Neighborhoodkrew@gmail.com".to_string(),
        };
        let no_reply = "Neighborhood Krew <no-reply@neighborhoodkrew.com>".to_string();

        Self {
            quote: QuoteMailSettings {
                from: "Neighborhood Krew <quotes@neighborhoodkrew.com>".to_string(),
                owner: business.email.clone(),
                forward: None,
                failure_policy: DeliveryFailurePolicy::default(),
            },
            promo: PromoSettings {
                from: "Neighborhood Krew <promo@neighborhoodkrew.com>".to_string(),
                owner: business.email.clone(),
                manager: None,
                subject: "Your $25 Neighborhood Krew Discount (Code Inside)".to_string(),
                code: PromoCodeSource::Fixed("KREW25".to_string()),
            },
            deposit: DepositSettings {
                amount_cents: 7500,
                currency: "usd".to_string(),
            },
            checklist: ChecklistSettings {
                url: "https://neighborhoodkrew.com/NeighborhoodKrewMovingDayChecklist.pdf"
                    .to_string(),
                from: no_reply.clone(),
            },
            hiring: HiringSettings {
                to: business.email.clone(),
                from: no_reply,
            },
            business,
        }
    }
}
