use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::analysis::FraudAnalyzer;
use crate::config::Config;
use crate::domain::Disposition;
use crate::form::{TransactionForm, FIELDS};
use crate::render;
use crate::state::{Dashboard, SessionState};
use crate::time;

const HELP: &str = "\
commands:
  set <field> <value>   edit the transaction form
  form                  show the form
  scan                  analyze the current form
  history               show the live monitor
  logout                sign out
  quit                  exit
";

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Set(&'a str, &'a str),
    Form,
    Scan,
    History,
    Logout,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let line = line.trim();
    let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
    match head {
        "set" => {
            let (field, value) = rest.trim().split_once(' ').unwrap_or((rest.trim(), ""));
            Command::Set(field, value)
        }
        "form" => Command::Form,
        "scan" => Command::Scan,
        "history" => Command::History,
        "logout" => Command::Logout,
        "help" | "" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other),
    }
}

fn render_form(form: &TransactionForm) -> String {
    let amount = form.amount.map(|a| a.to_string()).unwrap_or_default();
    let channel = form.channel.to_string();
    let values = [
        form.user_id.as_str(),
        amount.as_str(),
        form.merchant_category.as_str(),
        channel.as_str(),
        form.location.as_str(),
        form.device.as_str(),
        form.time.as_str(),
        form.date.as_str(),
    ];
    FIELDS
        .iter()
        .zip(values)
        .map(|(k, v)| format!("  {k:<17} {v}\n"))
        .collect()
}

/// Drives the dashboard from line-oriented input until EOF or `quit`.
pub async fn run<A, R, W>(cfg: &Config, analyzer: &A, dash: &mut Dashboard, input: R, mut out: W) -> Result<()>
where
    A: FraudAnalyzer + ?Sized,
    R: tokio::io::AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (date, now) = time::today_and_now(&cfg.tz)?;
    let mut form = TransactionForm::new(date, now, cfg.currency.clone());
    let mut lines = BufReader::new(input).lines();

    info!(analyst = %dash.user().name, "console.start");

    loop {
        if dash.session() == SessionState::LoggedOut {
            out.write_all(b"FRAUDSHIELD Secure Access Portal\nEmployee ID: ").await?;
            out.flush().await?;
            // Any answer authenticates.
            if lines.next_line().await?.is_none() {
                break;
            }
            dash.login(time::login_stamp(&cfg.tz)?);
            out.write_all(render::render_header(dash.user()).as_bytes()).await?;
            out.write_all(render::render_idle().as_bytes()).await?;
            out.write_all(HELP.as_bytes()).await?;
            continue;
        }

        if let Some(shown) = dash.alert().shown().cloned() {
            out.write_all(render::render_alert(&shown).as_bytes()).await?;
            out.flush().await?;
            let Some(answer) = lines.next_line().await? else {
                break;
            };
            let action = match answer.trim() {
                "b" | "block" => Disposition::BlockPermanently,
                _ => Disposition::InvestigateLater,
            };
            dash.close_alert(action);
            continue;
        }

        out.write_all(b"> ").await?;
        out.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let cmd = parse_command(&line);
        debug!(?cmd, "console.command");

        match cmd {
            Command::Set(field, value) => {
                if let Err(err) = form.set_field(field, value) {
                    out.write_all(format!("error: {err}\n").as_bytes()).await?;
                }
            }
            Command::Form => out.write_all(render_form(&form).as_bytes()).await?,
            Command::Scan => {
                if !dash.submit_enabled() {
                    debug!(phase = ?dash.phase(), "console.scan_disabled");
                    continue;
                }
                // Missing amount or customer id: nothing happens.
                let Some(tx) = form.submit() else {
                    continue;
                };
                out.write_all(b"ANALYZING...\n").await?;
                out.flush().await?;
                dash.submit(analyzer, tx).await?;
                if let Some(result) = dash.current().and_then(|r| r.analysis.as_ref()) {
                    let panel = render::render_result(result);
                    out.write_all(panel.as_bytes()).await?;
                }
            }
            Command::History => out.write_all(render::render_history(dash.history()).as_bytes()).await?,
            Command::Logout => dash.logout(),
            Command::Help => out.write_all(HELP.as_bytes()).await?,
            Command::Quit => break,
            Command::Unknown(other) => {
                out.write_all(format!("unknown command: {other}\n").as_bytes()).await?
            }
        }
    }

    out.flush().await?;
    info!(history = dash.history().len(), "console.stop");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnalysisResult, RiskLevel, Role, Transaction, UserProfile};
    use async_trait::async_trait;

    struct Fixed(AnalysisResult);

    #[async_trait]
    impl FraudAnalyzer for Fixed {
        async fn analyze(&self, _tx: &Transaction) -> AnalysisResult {
            self.0.clone()
        }
    }

    fn cfg() -> Config {
        Config {
            api_key: None,
            gemini_base_url: "http://localhost".into(),
            gemini_model: "gemini-2.5-flash".into(),
            home_city: "Mumbai".into(),
            currency: "INR".into(),
            tz: "Asia/Kolkata".into(),
            log_json: false,
            analyst_name: "Admin User".into(),
            analyst_role: Role::Admin,
        }
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(UserProfile {
            name: "Admin User".into(),
            role: Role::Admin,
            last_login: String::new(),
        })
    }

    fn result(level: RiskLevel, score: i64) -> AnalysisResult {
        AnalysisResult {
            fraud_score: score,
            risk_level: level,
            reasons: vec!["one".into(), "two".into(), "three".into()],
            recommendation: "Approve".into(),
            geolocation_risk: false,
        }
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("set amount 250000"), Command::Set("amount", "250000"));
        assert_eq!(
            parse_command("set device New Device (iPhone 14)"),
            Command::Set("device", "New Device (iPhone 14)")
        );
        assert_eq!(parse_command("  scan "), Command::Scan);
        assert_eq!(parse_command(""), Command::Help);
        assert_eq!(parse_command("fly"), Command::Unknown("fly"));
    }

    #[tokio::test]
    async fn login_scan_and_history_session() {
        let analyzer = Fixed(result(RiskLevel::Low, 12));
        let mut dash = dashboard();
        let input: &[u8] = b"ADMIN_001\nset amount 7500\nscan\nhistory\nquit\n";
        let mut out = Vec::new();
        run(&cfg(), &analyzer, &mut dash, input, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Logged in as Admin User"));
        assert!(text.contains("Fraud score: 12%"));
        assert!(text.contains("₹7,500 via UPI"));
        assert_eq!(dash.history().len(), 1);
        assert!(!dash.alert().is_open());
    }

    #[tokio::test]
    async fn blank_amount_makes_scan_inert() {
        let analyzer = Fixed(result(RiskLevel::Low, 12));
        let mut dash = dashboard();
        let input: &[u8] = b"x\nset amount\nscan\nquit\n";
        let mut out = Vec::new();
        run(&cfg(), &analyzer, &mut dash, input, &mut out).await.unwrap();
        assert!(dash.history().is_empty());
        assert!(!String::from_utf8(out).unwrap().contains("ANALYZING"));
    }

    #[tokio::test]
    async fn high_risk_prompts_for_disposition() {
        let analyzer = Fixed(result(RiskLevel::High, 93));
        let mut dash = dashboard();
        let input: &[u8] = b"x\nscan\nb\nlogout\n";
        let mut out = Vec::new();
        run(&cfg(), &analyzer, &mut dash, input, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("HIGH RISK TRANSACTION BLOCKED"));
        let rec = &dash.history()[0];
        assert_eq!(rec.disposition, Some(Disposition::BlockPermanently));
        assert_eq!(rec.analysis.as_ref().unwrap().risk_level, RiskLevel::High);
        assert_eq!(dash.session(), SessionState::LoggedOut);
    }
}
