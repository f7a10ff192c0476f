use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// How often a subscription is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BillingPeriod {
    Weekly,
    Monthly,
    Quarterly,
    HalfYearly,
    Yearly,
}

impl BillingPeriod {
    pub const ALL: [BillingPeriod; 5] = [
        BillingPeriod::Weekly,
        BillingPeriod::Monthly,
        BillingPeriod::Quarterly,
        BillingPeriod::HalfYearly,
        BillingPeriod::Yearly,
    ];

    /// Number of charges per year. Weekly assumes a 52-week year.
    pub fn multiplier(&self) -> f64 {
        match self {
            BillingPeriod::Weekly => 52.0,
            BillingPeriod::Monthly => 12.0,
            BillingPeriod::Quarterly => 4.0,
            BillingPeriod::HalfYearly => 2.0,
            BillingPeriod::Yearly => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BillingPeriod::Weekly => "Weekly",
            BillingPeriod::Monthly => "Monthly",
            BillingPeriod::Quarterly => "Quarterly",
            BillingPeriod::HalfYearly => "Half-yearly",
            BillingPeriod::Yearly => "Yearly",
        }
    }
}

impl Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for BillingPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "weekly" => Ok(BillingPeriod::Weekly),
            "monthly" => Ok(BillingPeriod::Monthly),
            "quarterly" => Ok(BillingPeriod::Quarterly),
            "half-yearly" | "halfyearly" => Ok(BillingPeriod::HalfYearly),
            "yearly" | "annual" => Ok(BillingPeriod::Yearly),
            _ => Err(anyhow!("Invalid billing period: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipliers() {
        let multipliers: Vec<f64> = BillingPeriod::ALL.iter().map(|p| p.multiplier()).collect();
        assert_eq!(multipliers, vec![52.0, 12.0, 4.0, 2.0, 1.0]);
    }

    #[test]
    fn test_parse_and_serde() {
        assert_eq!(
            "Half-Yearly".parse::<BillingPeriod>().unwrap(),
            BillingPeriod::HalfYearly
        );
        assert_eq!(
            "half_yearly".parse::<BillingPeriod>().unwrap(),
            BillingPeriod::HalfYearly
        );
        assert!("daily".parse::<BillingPeriod>().is_err());

        let json = serde_json::to_string(&BillingPeriod::HalfYearly).unwrap();
        assert_eq!(json, "\"half-yearly\"");
        let parsed: BillingPeriod = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(parsed, BillingPeriod::Weekly);
    }

    #[test]
    fn test_labels() {
        assert_eq!(BillingPeriod::HalfYearly.to_string(), "Half-yearly");
        assert_eq!(BillingPeriod::Monthly.label(), "Monthly");
    }
}
