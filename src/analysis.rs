//! Fraud analysis delegated to a hosted model.
//!
//! The client never fails: any transport, parse or validation problem is
//! logged and replaced by [`fallback_result`].

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::{AnalysisResult, RiskLevel, Transaction};
use crate::gemini::CompletionService;

/// Scores above this are meant to be classified High.
pub const HIGH_RISK_SCORE: i64 = 75;

pub const FALLBACK_REASON: &str = "AI Connectivity Error - Manual Review Advised";
pub const FALLBACK_RECOMMENDATION: &str = "Check network and retry.";

#[async_trait]
pub trait FraudAnalyzer: Send + Sync {
    async fn analyze(&self, tx: &Transaction) -> AnalysisResult;
}

pub fn fallback_result() -> AnalysisResult {
    AnalysisResult {
        fraud_score: 0,
        risk_level: RiskLevel::Low,
        reasons: vec![FALLBACK_REASON.to_string()],
        recommendation: FALLBACK_RECOMMENDATION.to_string(),
        geolocation_risk: false,
    }
}

fn currency_symbol(code: &str) -> String {
    match code {
        "INR" => "₹".to_string(),
        other => format!("{other} "),
    }
}

pub fn build_prompt(tx: &Transaction, home_city: &str) -> String {
    format!(
        r#"
Act as a senior Fraud Analyst for a top Indian Bank (like HDFC or SBI).
Analyze this transaction for fraud risk.

Transaction Data:
- Customer ID: {user_id}
- Amount: {symbol}{amount}
- Method: {channel}
- Merchant/Receiver: {merchant}
- Location: {location}
- Device: {device}
- Time: {time} ({date})

Specific Indian Banking Fraud Rules:
1. **UPI Scams**: High frequency small transactions or sudden large transfers to unknown VPAs.
2. **KYC Fraud**: Transactions related to "Account Update" or "KYC Renewal" via unofficial channels.
3. **Midnight Activity**: High value transfers between 11 PM - 5 AM are suspicious unless historic pattern exists.
4. **Location Mismatch**: Transaction from a city far from user's base (assume base is {home_city} if not specified) without travel flags.
5. **New Device**: High value + New Device is CRITICAL risk.
6. **Merchant Categories**: High risk -> Crypto P2P, Online Gaming, Offshore Forex, Jewelry.

Return JSON matching the schema.
"#,
        user_id = tx.user_id,
        symbol = currency_symbol(&tx.currency),
        amount = tx.amount,
        channel = tx.channel,
        merchant = tx.merchant_category,
        location = tx.location,
        device = tx.device,
        time = tx.time,
        date = tx.date,
    )
}

pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "fraudScore": {
                "type": "INTEGER",
                "description": "0-100 probability. >75 is High Risk."
            },
            "riskLevel": {
                "type": "STRING",
                "enum": ["Low", "Medium", "High"]
            },
            "reasons": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "3 bullet points explaining the score."
            },
            "recommendation": {
                "type": "STRING",
                "description": "Immediate action: Block, Call Customer, or Approve."
            },
            "geolocationRisk": {
                "type": "BOOLEAN",
                "description": "True if location looks suspicious."
            }
        },
        "required": ["fraudScore", "riskLevel", "reasons", "recommendation", "geolocationRisk"]
    })
}

/// Parse model output and check it against the declared schema.
///
/// Enum membership is enforced by deserialization. Score/level consistency is
/// not enforced, only reported.
pub fn parse_response(text: &str) -> Result<AnalysisResult> {
    let result: AnalysisResult = serde_json::from_str(text.trim())?;

    if !(0..=100).contains(&result.fraud_score) {
        return Err(anyhow!("fraudScore out of range: {}", result.fraud_score));
    }
    if result.reasons.is_empty() {
        return Err(anyhow!("reasons is empty"));
    }

    if (result.fraud_score > HIGH_RISK_SCORE) != (result.risk_level == RiskLevel::High) {
        warn!(
            fraud_score = result.fraud_score,
            risk_level = %result.risk_level,
            "analysis.inconsistent_level"
        );
    }

    Ok(result)
}

pub struct AnalysisClient<S> {
    service: S,
    home_city: String,
}

impl<S: CompletionService> AnalysisClient<S> {
    pub fn new(service: S, home_city: impl Into<String>) -> Self {
        Self {
            service,
            home_city: home_city.into(),
        }
    }

    async fn try_analyze(&self, tx: &Transaction) -> Result<AnalysisResult> {
        if !tx.amount.is_finite() {
            return Err(anyhow!("amount is not finite: {}", tx.amount));
        }

        let prompt = build_prompt(tx, &self.home_city);
        let text = self
            .service
            .generate_json(&prompt, &response_schema())
            .await?
            .ok_or_else(|| anyhow!("No response from AI"))?;

        parse_response(&text)
    }
}

#[async_trait]
impl<S: CompletionService> FraudAnalyzer for AnalysisClient<S> {
    async fn analyze(&self, tx: &Transaction) -> AnalysisResult {
        match self.try_analyze(tx).await {
            Ok(result) => {
                info!(
                    tx_id = %tx.id,
                    fraud_score = result.fraud_score,
                    risk_level = %result.risk_level,
                    "analysis.done"
                );
                result
            }
            Err(err) => {
                error!(tx_id = %tx.id, error = %err, "analysis.failed");
                fallback_result()
            }
        }
    }
}
