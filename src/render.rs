use std::fmt::Write as _;

use crate::domain::{AnalysisResult, HistoryRecord, RiskLevel, Transaction, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Safe,
    Elevated,
    Critical,
}

pub fn score_band(score: i64) -> ScoreBand {
    if score < 30 {
        ScoreBand::Safe
    } else if score < 75 {
        ScoreBand::Elevated
    } else {
        ScoreBand::Critical
    }
}

pub fn risk_badge(level: RiskLevel) -> String {
    format!("[{} RISK]", level.to_string().to_uppercase())
}

/// 1234567.5 -> "1,234,567.5"
pub fn format_amount(amount: f64) -> String {
    let raw = amount.to_string();
    let (int_part, frac) = match raw.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (raw, None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(d) => ("-", d.to_string()),
        None => ("", int_part),
    };
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

fn money(tx: &Transaction) -> String {
    match tx.currency.as_str() {
        "INR" => format!("₹{}", format_amount(tx.amount)),
        code => format!("{code} {}", format_amount(tx.amount)),
    }
}

pub fn render_idle() -> String {
    "System Ready\nWaiting for transaction data input.\n".to_string()
}

pub fn render_result(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "AI FORENSIC REPORT");
    let marker = match score_band(result.fraud_score) {
        ScoreBand::Safe => "",
        ScoreBand::Elevated => " (!)",
        ScoreBand::Critical => " (!!!)",
    };
    let _ = writeln!(out, "Fraud score: {}%{marker}  {}", result.fraud_score, risk_badge(result.risk_level));
    if result.geolocation_risk {
        let _ = writeln!(out, "Geolocation risk detected");
    }
    for (i, reason) in result.reasons.iter().enumerate() {
        let _ = writeln!(out, "  {}. {reason}", i + 1);
    }
    let _ = writeln!(out, "Recommended action: {}", result.recommendation);
    out
}

pub fn render_alert(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "!!! HIGH RISK TRANSACTION BLOCKED !!!");
    let _ = writeln!(out, "Fraud score: {}%", result.fraud_score);
    for reason in &result.reasons {
        let _ = writeln!(out, "  - {reason}");
    }
    let _ = writeln!(out, "System has auto-frozen this transaction ID. Analyst override required to proceed.");
    let _ = writeln!(out, "[i] Investigate Later   [b] BLOCK PERMANENTLY");
    out
}

pub fn render_history(history: &[HistoryRecord]) -> String {
    if history.is_empty() {
        return "Waiting for transaction stream...\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:<6} {:<28} {}", "TIME", "DETAILS", "STATUS");
    for rec in history {
        let tx = &rec.transaction;
        let status = rec
            .analysis
            .as_ref()
            .map(|a| risk_badge(a.risk_level))
            .unwrap_or_default();
        let details = format!("{} via {}", money(tx), tx.channel);
        let _ = writeln!(out, "{:<6} {:<28} {status}", tx.time, details);
    }
    out
}

pub fn render_header(user: &UserProfile) -> String {
    format!("FRAUDSHIELD | Logged in as {} ({:?}) | last login {}\n", user.name, user.role, user.last_login)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Channel;

    fn result(level: RiskLevel, score: i64, geo: bool) -> AnalysisResult {
        AnalysisResult {
            fraud_score: score,
            risk_level: level,
            reasons: vec!["Night transfer".into(), "New device".into()],
            recommendation: "Call Customer".into(),
            geolocation_risk: geo,
        }
    }

    #[test]
    fn bands_follow_gauge_thresholds() {
        assert_eq!(score_band(0), ScoreBand::Safe);
        assert_eq!(score_band(29), ScoreBand::Safe);
        assert_eq!(score_band(30), ScoreBand::Elevated);
        assert_eq!(score_band(74), ScoreBand::Elevated);
        assert_eq!(score_band(75), ScoreBand::Critical);
    }

    #[test]
    fn badge_text() {
        assert_eq!(risk_badge(RiskLevel::Low), "[LOW RISK]");
        assert_eq!(risk_badge(RiskLevel::High), "[HIGH RISK]");
    }

    #[test]
    fn amounts_are_grouped() {
        assert_eq!(format_amount(5000.0), "5,000");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(1234567.5), "1,234,567.5");
    }

    #[test]
    fn result_panel_lists_reasons_and_geo_flag() {
        let out = render_result(&result(RiskLevel::Medium, 55, true));
        assert!(out.contains("Fraud score: 55%"));
        assert!(out.contains("[MEDIUM RISK]"));
        assert!(out.contains("Geolocation risk detected"));
        assert!(out.contains("  1. Night transfer"));
        assert!(out.contains("  2. New device"));
        assert!(out.contains("Recommended action: Call Customer"));

        let calm = render_result(&result(RiskLevel::Low, 5, false));
        assert!(!calm.contains("Geolocation"));
    }

    #[test]
    fn empty_history_shows_waiting_line() {
        assert_eq!(render_history(&[]), "Waiting for transaction stream...\n");
    }

    #[test]
    fn history_rows_show_badge_when_analyzed() {
        let tx = Transaction {
            id: "x".into(),
            user_id: "CUST-1".into(),
            amount: 250000.0,
            currency: "INR".into(),
            merchant_category: "Jewelry".into(),
            channel: Channel::InterbankTransfer,
            location: "Delhi".into(),
            device: "New Device".into(),
            time: "23:40".into(),
            date: "2026-10-19".into(),
        };
        let rows = vec![
            HistoryRecord { transaction: tx.clone(), analysis: Some(result(RiskLevel::High, 88, true)), disposition: None },
            HistoryRecord { transaction: tx, analysis: None, disposition: None },
        ];
        let out = render_history(&rows);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("23:40"));
        assert!(lines[1].contains("₹250,000 via NEFT/RTGS"));
        assert!(lines[1].contains("[HIGH RISK]"));
        assert!(!lines[2].contains("RISK"));
    }
}
