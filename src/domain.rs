use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Channel {
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Net Banking")]
    NetBanking,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "ATM")]
    Atm,
    /// NEFT/RTGS interbank transfer.
    #[serde(rename = "NEFT/RTGS", alias = "Interbank Transfer")]
    InterbankTransfer,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Upi,
        Channel::NetBanking,
        Channel::DebitCard,
        Channel::CreditCard,
        Channel::Atm,
        Channel::InterbankTransfer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Channel::Upi => "UPI",
            Channel::NetBanking => "Net Banking",
            Channel::DebitCard => "Debit Card",
            Channel::CreditCard => "Credit Card",
            Channel::Atm => "ATM",
            Channel::InterbankTransfer => "NEFT/RTGS",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Channel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_lowercase();
        if needle == "interbank transfer" {
            return Ok(Channel::InterbankTransfer);
        }
        Channel::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == needle)
            .ok_or_else(|| anyhow!("unknown channel: {s}"))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        })
    }
}

/// A submitted transaction. Immutable once built by the form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub currency: String,
    pub merchant_category: String,
    pub channel: Channel,
    /// e.g. "Mumbai, MH"
    pub location: String,
    /// e.g. "New Device (iPhone 14)"
    pub device: String,
    /// HH:MM
    pub time: String,
    /// YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 0-100. Models sometimes emit whole numbers as `12.0`.
    #[serde(deserialize_with = "integral_number")]
    pub fraud_score: i64,
    pub risk_level: RiskLevel,
    pub reasons: Vec<String>,
    pub recommendation: String,
    pub geolocation_risk: bool,
}

fn integral_number<'de, D>(de: D) -> std::result::Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let n = serde_json::Number::deserialize(de)?;
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => Ok(f as i64),
        _ => Err(serde::de::Error::custom(format!("expected a whole number, got {n}"))),
    }
}

/// What the analyst chose when dismissing a high-risk alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Disposition {
    InvestigateLater,
    BlockPermanently,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub transaction: Transaction,
    pub analysis: Option<AnalysisResult>,
    #[serde(default)]
    pub disposition: Option<Disposition>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Analyst,
    Admin,
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "analyst" => Ok(Role::Analyst),
            "admin" => Ok(Role::Admin),
            _ => Err(anyhow!("unknown role: {s}")),
        }
    }
}

/// Display-only; nothing here is ever checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub role: Role,
    pub last_login: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_parses_labels_and_alias() {
        assert_eq!("upi".parse::<Channel>().unwrap(), Channel::Upi);
        assert_eq!(" Net Banking ".parse::<Channel>().unwrap(), Channel::NetBanking);
        assert_eq!("NEFT/RTGS".parse::<Channel>().unwrap(), Channel::InterbankTransfer);
        assert_eq!(
            "Interbank Transfer".parse::<Channel>().unwrap(),
            Channel::InterbankTransfer
        );
        assert!("cheque".parse::<Channel>().is_err());
    }

    #[test]
    fn analysis_result_uses_camel_case_wire_names() {
        let raw = r#"{"fraudScore":88,"riskLevel":"High","reasons":["a"],"recommendation":"Block","geolocationRisk":true}"#;
        let r: AnalysisResult = serde_json::from_str(raw).unwrap();
        assert_eq!(r.fraud_score, 88);
        assert_eq!(r.risk_level, RiskLevel::High);
        assert!(r.geolocation_risk);
    }

    #[test]
    fn whole_float_score_is_accepted_fractional_is_not() {
        let whole = r#"{"fraudScore":12.0,"riskLevel":"Low","reasons":["a"],"recommendation":"Approve","geolocationRisk":false}"#;
        assert_eq!(serde_json::from_str::<AnalysisResult>(whole).unwrap().fraud_score, 12);

        let frac = r#"{"fraudScore":12.5,"riskLevel":"Low","reasons":["a"],"recommendation":"Approve","geolocationRisk":false}"#;
        assert!(serde_json::from_str::<AnalysisResult>(frac).is_err());
    }

    #[test]
    fn unknown_risk_level_is_rejected() {
        let raw = r#"{"fraudScore":10,"riskLevel":"Severe","reasons":["a"],"recommendation":"x","geolocationRisk":false}"#;
        assert!(serde_json::from_str::<AnalysisResult>(raw).is_err());
    }
}
