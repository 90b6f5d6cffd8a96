//! Payment-intent builder.
//!
//! Turns a week's debt into a peer-payment deep link plus a web fallback.
//! Opening the link is left to a [`LinkOpener`] so the ledger never
//! performs I/O.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::PaymentError;
use crate::ledger::{Money, WeeklyDebt};

/// Where payment links point and what they say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLinks {
    #[serde(default = "default_note")]
    pub note: String,
    #[serde(default = "default_scheme")]
    pub deep_link_scheme: String,
    #[serde(default = "default_web_base_url")]
    pub web_base_url: String,
}

fn default_note() -> String {
    "Snooze tax - worth it? 😴".into()
}
fn default_scheme() -> String {
    "venmo".into()
}
fn default_web_base_url() -> String {
    "https://venmo.com".into()
}

impl Default for PaymentLinks {
    fn default() -> Self {
        Self {
            note: default_note(),
            deep_link_scheme: default_scheme(),
            web_base_url: default_web_base_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentIntent {
    pub recipient: String,
    pub amount: Money,
    pub note: String,
    pub deep_link: Url,
    pub web_fallback: Url,
}

impl PaymentLinks {
    /// `None` when there is nobody to pay or nothing owed.
    pub fn intent(
        &self,
        recipient: &str,
        amount: Money,
    ) -> Result<Option<PaymentIntent>, PaymentError> {
        let recipient = recipient.trim();
        if recipient.is_empty() || amount.is_zero() {
            return Ok(None);
        }

        let amount_str = amount.to_decimal_string();
        let query = [
            ("txn", "pay"),
            ("recipients", recipient),
            ("amount", amount_str.as_str()),
            ("note", self.note.as_str()),
        ]
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
        let deep_link = Url::parse(&format!("{}://paycharge?{query}", self.deep_link_scheme))?;

        let web_fallback = Url::parse(&format!(
            "{}/{}",
            self.web_base_url.trim_end_matches('/'),
            urlencoding::encode(recipient)
        ))?;

        Ok(Some(PaymentIntent {
            recipient: recipient.to_string(),
            amount,
            note: self.note.clone(),
            deep_link,
            web_fallback,
        }))
    }

    pub fn for_week(
        &self,
        recipient: &str,
        week: &WeeklyDebt,
    ) -> Result<Option<PaymentIntent>, PaymentError> {
        self.intent(recipient, week.total_amount)
    }
}

/// Opens URLs on behalf of the host.
pub trait LinkOpener {
    fn open(&self, url: &Url) -> std::io::Result<()>;
}

/// Hands URLs to the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl LinkOpener for SystemOpener {
    fn open(&self, url: &Url) -> std::io::Result<()> {
        open::that(url.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenedLink {
    DeepLink,
    WebFallback,
}

/// Try the deep link, then the web page for the same recipient.
pub fn open_with_fallback(
    intent: &PaymentIntent,
    opener: &dyn LinkOpener,
) -> Result<OpenedLink, PaymentError> {
    match opener.open(&intent.deep_link) {
        Ok(()) => Ok(OpenedLink::DeepLink),
        Err(e) => {
            tracing::warn!(error = %e, "payment app unavailable, falling back to web");
            opener
                .open(&intent.web_fallback)
                .map(|()| OpenedLink::WebFallback)
                .map_err(|e| PaymentError::OpenFailed(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeOpener {
        accept_deep_links: bool,
        opened: RefCell<Vec<String>>,
    }

    impl FakeOpener {
        fn new(accept_deep_links: bool) -> Self {
            Self {
                accept_deep_links,
                opened: RefCell::new(Vec::new()),
            }
        }
    }

    impl LinkOpener for FakeOpener {
        fn open(&self, url: &Url) -> std::io::Result<()> {
            if url.scheme() != "https" && !self.accept_deep_links {
                return Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no handler"));
            }
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    fn intent() -> PaymentIntent {
        PaymentLinks::default()
            .intent("jordan-k", Money::from_cents(398))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn deep_link_carries_recipient_amount_and_note() {
        let intent = intent();
        assert_eq!(intent.deep_link.scheme(), "venmo");
        assert_eq!(intent.deep_link.host_str(), Some("paycharge"));

        let pairs: Vec<(String, String)> = intent
            .deep_link
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs[0], ("txn".into(), "pay".into()));
        assert_eq!(pairs[1], ("recipients".into(), "jordan-k".into()));
        assert_eq!(pairs[2], ("amount".into(), "3.98".into()));
        assert_eq!(pairs[3], ("note".into(), "Snooze tax - worth it? 😴".into()));
        assert!(intent.deep_link.as_str().contains("note=Snooze%20tax"));
    }

    #[test]
    fn web_fallback_uses_same_recipient() {
        assert_eq!(intent().web_fallback.as_str(), "https://venmo.com/jordan-k");
    }

    #[test]
    fn no_intent_without_recipient_or_debt() {
        let links = PaymentLinks::default();
        assert!(links.intent("  ", Money::from_cents(199)).unwrap().is_none());
        assert!(links.intent("jordan-k", Money::ZERO).unwrap().is_none());
    }

    #[test]
    fn opens_deep_link_when_possible() {
        let opener = FakeOpener::new(true);
        assert_eq!(open_with_fallback(&intent(), &opener).unwrap(), OpenedLink::DeepLink);
        assert!(opener.opened.borrow()[0].starts_with("venmo://"));
    }

    #[test]
    fn falls_back_to_web() {
        let opener = FakeOpener::new(false);
        assert_eq!(
            open_with_fallback(&intent(), &opener).unwrap(),
            OpenedLink::WebFallback
        );
        assert_eq!(opener.opened.borrow().as_slice(), ["https://venmo.com/jordan-k"]);
    }
}
