use crate::domain::{AnalysisResult, Disposition, HistoryRecord, RiskLevel};

/// Blocking high-risk confirmation, tied to the transaction it was opened for.
#[derive(Debug, Clone, Default)]
pub struct AlertModal {
    shown: Option<(String, AnalysisResult)>,
}

impl AlertModal {
    /// Called whenever the current analysis changes. Open iff current is High.
    pub fn notify(&mut self, current: Option<&HistoryRecord>) {
        self.shown = current.and_then(|rec| match rec.analysis.as_ref() {
            Some(r) if r.risk_level == RiskLevel::High => {
                Some((rec.transaction.id.clone(), r.clone()))
            }
            _ => None,
        });
    }

    pub fn is_open(&self) -> bool {
        self.shown.is_some()
    }

    pub fn shown(&self) -> Option<&AnalysisResult> {
        self.shown.as_ref().map(|(_, r)| r)
    }

    /// Both dismissal actions simply close; the shown result is left untouched.
    /// Returns the id of the transaction the alert belonged to.
    pub fn close(&mut self, action: Disposition) -> Option<(String, Disposition)> {
        self.shown.take().map(|(id, _)| (id, action))
    }
}
