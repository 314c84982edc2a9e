use anyhow::{anyhow, Result};
use rand::Rng;

use crate::domain::{Channel, Transaction};

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;

/// Field names accepted by [`TransactionForm::set_field`].
pub const FIELDS: [&str; 8] = [
    "userId",
    "amount",
    "merchantCategory",
    "channel",
    "location",
    "device",
    "time",
    "date",
];

/// Editable draft of a transaction. Every field may be blank while editing.
#[derive(Debug, Clone)]
pub struct TransactionForm {
    pub user_id: String,
    pub amount: Option<f64>,
    pub merchant_category: String,
    pub channel: Channel,
    pub location: String,
    pub device: String,
    pub time: String,
    pub date: String,
    pub currency: String,
}

impl TransactionForm {
    pub fn new(date: String, time: String, currency: String) -> Self {
        Self {
            user_id: "CUST-884210".into(),
            amount: Some(5000.0),
            merchant_category: "Retail".into(),
            channel: Channel::Upi,
            location: "Mumbai, MH".into(),
            device: "Registered Device (OnePlus 9)".into(),
            time,
            date,
            currency,
        }
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match name {
            "userId" => self.user_id = value.to_string(),
            // Unparseable input blanks the amount, which makes submit inert.
            "amount" => self.amount = value.parse::<f64>().ok(),
            "merchantCategory" => self.merchant_category = value.to_string(),
            "channel" => self.channel = value.parse()?,
            "location" => self.location = value.to_string(),
            "device" => self.device = value.to_string(),
            "time" => self.time = value.to_string(),
            "date" => self.date = value.to_string(),
            other => return Err(anyhow!("unknown field: {other}")),
        }
        Ok(())
    }

    /// `None` when the customer id or a usable amount is missing.
    pub fn submit(&self) -> Option<Transaction> {
        let amount = self.amount.filter(|a| a.is_finite() && *a > 0.0)?;
        if self.user_id.is_empty() {
            return None;
        }
        Some(Transaction {
            id: new_transaction_id(),
            user_id: self.user_id.clone(),
            amount,
            currency: self.currency.clone(),
            merchant_category: self.merchant_category.clone(),
            channel: self.channel,
            location: self.location.clone(),
            device: self.device.clone(),
            time: self.time.clone(),
            date: self.date.clone(),
        })
    }
}

fn new_transaction_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> TransactionForm {
        TransactionForm::new("2026-10-19".into(), "14:00".into(), "INR".into())
    }

    #[test]
    fn defaults_produce_a_transaction() {
        let tx = form().submit().unwrap();
        assert_eq!(tx.user_id, "CUST-884210");
        assert_eq!(tx.amount, 5000.0);
        assert_eq!(tx.currency, "INR");
        assert_eq!(tx.channel, Channel::Upi);
        assert_eq!(tx.time, "14:00");
        assert_eq!(tx.id.len(), ID_LEN);
        assert!(tx.id.bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn each_submission_gets_a_fresh_id() {
        let f = form();
        let a = f.submit().unwrap();
        let b = f.submit().unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn missing_amount_or_customer_is_inert() {
        let mut f = form();
        f.set_field("amount", "").unwrap();
        assert!(f.submit().is_none());

        let mut f = form();
        f.set_field("amount", "0").unwrap();
        assert!(f.submit().is_none());

        let mut f = form();
        f.set_field("userId", "  ").unwrap();
        assert!(f.submit().is_none());
    }

    #[test]
    fn edits_are_applied() {
        let mut f = form();
        f.set_field("amount", "125000.50").unwrap();
        f.set_field("channel", "credit card").unwrap();
        f.set_field("device", "New Device (iPhone 14)").unwrap();
        f.set_field("time", "02:30").unwrap();
        let tx = f.submit().unwrap();
        assert_eq!(tx.amount, 125000.5);
        assert_eq!(tx.channel, Channel::CreditCard);
        assert_eq!(tx.device, "New Device (iPhone 14)");
        assert_eq!(tx.time, "02:30");
    }

    #[test]
    fn rejects_unknown_field_and_channel() {
        let mut f = form();
        assert!(f.set_field("pin", "1234").is_err());
        assert!(f.set_field("channel", "Cheque").is_err());
        assert_eq!(f.channel, Channel::Upi);
    }
}
