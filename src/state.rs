use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::alert::AlertModal;
use crate::analysis::FraudAnalyzer;
use crate::domain::{AnalysisResult, Disposition, HistoryRecord, Transaction, UserProfile};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisPhase {
    Idle,
    Pending(Transaction),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShellError {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("an analysis is already in flight")]
    AnalysisInFlight,
    #[error("no analysis is pending")]
    NothingPending,
}

/// All page-lifetime state. Mutated only through the methods below.
#[derive(Debug, Clone)]
pub struct Dashboard {
    session: SessionState,
    user: UserProfile,
    phase: AnalysisPhase,
    /// Newest first.
    history: Vec<HistoryRecord>,
    current: Option<HistoryRecord>,
    alert: AlertModal,
}

impl Dashboard {
    pub fn new(user: UserProfile) -> Self {
        Self {
            session: SessionState::LoggedOut,
            user,
            phase: AnalysisPhase::Idle,
            history: vec![],
            current: None,
            alert: AlertModal::default(),
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn phase(&self) -> &AnalysisPhase {
        &self.phase
    }

    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    pub fn current(&self) -> Option<&HistoryRecord> {
        self.current.as_ref()
    }

    pub fn alert(&self) -> &AlertModal {
        &self.alert
    }

    pub fn submit_enabled(&self) -> bool {
        self.session == SessionState::LoggedIn && self.phase == AnalysisPhase::Idle
    }

    /// No credential check; always succeeds.
    pub fn login(&mut self, last_login: String) {
        self.user.last_login = last_login;
        self.session = SessionState::LoggedIn;
        info!(user = %self.user.name, role = ?self.user.role, "session.login");
    }

    /// History survives sign-out for the rest of the process lifetime.
    pub fn logout(&mut self) {
        self.session = SessionState::LoggedOut;
        info!(user = %self.user.name, history = self.history.len(), "session.logout");
    }

    pub fn begin_submit(&mut self, tx: Transaction) -> Result<(), ShellError> {
        if self.session != SessionState::LoggedIn {
            return Err(ShellError::NotLoggedIn);
        }
        if self.phase != AnalysisPhase::Idle {
            return Err(ShellError::AnalysisInFlight);
        }
        info!(tx_id = %tx.id, amount = tx.amount, channel = %tx.channel, "analysis.pending");
        self.current = None;
        self.alert.notify(None);
        self.phase = AnalysisPhase::Pending(tx);
        Ok(())
    }

    pub fn resolve(&mut self, result: AnalysisResult) -> Result<&HistoryRecord, ShellError> {
        let tx = match std::mem::replace(&mut self.phase, AnalysisPhase::Idle) {
            AnalysisPhase::Pending(tx) => tx,
            AnalysisPhase::Idle => return Err(ShellError::NothingPending),
        };
        let record = HistoryRecord {
            transaction: tx,
            analysis: Some(result),
            disposition: None,
        };
        self.history.insert(0, record.clone());
        self.alert.notify(Some(&record));
        Ok(&*self.current.insert(record))
    }

    /// begin, await the analyzer, resolve. The analyzer never fails.
    pub async fn submit<A: FraudAnalyzer + ?Sized>(
        &mut self,
        analyzer: &A,
        tx: Transaction,
    ) -> Result<&HistoryRecord, ShellError> {
        self.begin_submit(tx.clone())?;
        let result = analyzer.analyze(&tx).await;
        self.resolve(result)
    }

    /// Closes the alert and records the analyst's choice on the record the
    /// alert was raised for. The verdict is kept.
    pub fn close_alert(&mut self, action: Disposition) -> Option<Disposition> {
        let (id, chosen) = self.alert.close(action)?;
        let records = self.current.iter_mut().chain(self.history.iter_mut());
        for rec in records.filter(|r| r.transaction.id == id) {
            rec.disposition = Some(chosen);
        }
        warn!(tx_id = %id, disposition = ?chosen, "alert.closed");
        Some(chosen)
    }
}
