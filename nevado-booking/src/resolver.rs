use std::time::Duration;

use nevado_core::{CoreError, CoreResult, Navigator, ResumeSlot};
use reqwest::Url;

/// Transaction status flag set by the payment provider on its redirect
pub const TX_STATUS_PARAM: &str = "bold-tx-status";
/// Order reference set by the payment provider on its redirect
pub const ORDER_ID_PARAM: &str = "bold-order-id";
pub const PAYMENT_STATUS_PARAM: &str = "payment_status";
pub const REFERENCE_PARAM: &str = "ref";
/// Reference shown when the provider did not send one
pub const MISSING_REFERENCE: &str = "N/A";

const APPROVED: &str = "approved";
const FAILED: &str = "failed";

fn parse_query(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return Vec::new();
    };
    url.set_query(Some(query));
    url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
}

fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.clone())
}

/// Local, rooted path or `/`. Anything that could leave the site is dropped,
/// including dot segments that normalize into a protocol-relative `//host`.
pub fn safe_return_path(path: Option<&str>) -> &str {
    match path {
        Some(path) if is_local_path(path) => path,
        _ => "/",
    }
}

fn is_local_path(path: &str) -> bool {
    if !path.starts_with('/') || path.starts_with("//") {
        return false;
    }
    if path.chars().any(|c| c == '\\' || c.is_control() || c.is_whitespace()) {
        return false;
    }
    let end = path.find(['?', '#']).unwrap_or(path.len());
    !path[..end].split('/').any(is_dot_segment)
}

fn is_dot_segment(segment: &str) -> bool {
    let lowered = segment.to_ascii_lowercase();
    matches!(lowered.as_str(), "." | ".." | "%2e" | "%2e%2e" | ".%2e" | "%2e.")
}

/// Query parameters the payment provider appends to its redirect
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectParams {
    pub tx_status: Option<String>,
    pub order_id: Option<String>,
}

impl RedirectParams {
    pub fn from_query(query: &str) -> Self {
        let pairs = parse_query(query);
        Self {
            tx_status: first_value(&pairs, TX_STATUS_PARAM),
            order_id: first_value(&pairs, ORDER_ID_PARAM),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Approved,
    Failed,
}

impl PaymentOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentOutcome::Approved => APPROVED,
            PaymentOutcome::Failed => FAILED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverDelays {
    pub success: Duration,
    pub failure: Duration,
}

impl Default for ResolverDelays {
    fn default() -> Self {
        Self {
            success: Duration::from_secs(3),
            failure: Duration::from_secs(6),
        }
    }
}

/// What the result page shows and where it goes next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: PaymentOutcome,
    pub reference: String,
    pub return_url: String,
    pub delay: Duration,
    /// Failed payments offer a manual "try again" (history back)
    pub retry_available: bool,
}

/// Append `payment_status` and `ref` to an application path, replacing any earlier pair.
pub fn build_return_url(return_path: &str, outcome: PaymentOutcome, reference: &str) -> String {
    let return_path = safe_return_path(Some(return_path));
    let base = Url::parse("http://localhost/").and_then(|root| root.join(return_path));
    let mut url = match base {
        Ok(url) if !url.path().starts_with("//") => url,
        _ => match Url::parse("http://localhost/") {
            Ok(root) => root,
            Err(_) => {
                return format!("/?{}={}&{}={}", PAYMENT_STATUS_PARAM, outcome.as_str(), REFERENCE_PARAM, reference)
            }
        },
    };

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != PAYMENT_STATUS_PARAM && k != REFERENCE_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.set_query(None);
    url.query_pairs_mut()
        .extend_pairs(kept)
        .append_pair(PAYMENT_STATUS_PARAM, outcome.as_str())
        .append_pair(REFERENCE_PARAM, reference);

    let mut relative = url.path().to_string();
    if let Some(query) = url.query() {
        relative.push('?');
        relative.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        relative.push('#');
        relative.push_str(fragment);
    }
    relative
}

/// Runs once on the page the payment provider redirects to.
///
/// `Loading -> Success | Error`, both terminal. The resume entry is consumed on either
/// outcome; a missing or unreadable entry degrades to the site root.
pub struct PaymentReturnResolver {
    resume: ResumeSlot,
    delays: ResolverDelays,
    state: ResolverState,
}

impl PaymentReturnResolver {
    pub fn new(resume: ResumeSlot, delays: ResolverDelays) -> Self {
        Self {
            resume,
            delays,
            state: ResolverState::Loading,
        }
    }

    pub fn state(&self) -> ResolverState {
        self.state
    }

    pub fn resolve(&mut self, params: &RedirectParams) -> CoreResult<Resolution> {
        if self.state != ResolverState::Loading {
            return Err(CoreError::InvalidTransition {
                from: format!("{:?}", self.state),
                to: "RESOLVED".to_string(),
            });
        }

        let Some(tx_status) = params.tx_status.as_deref() else {
            self.state = ResolverState::Error;
            tracing::warn!("Payment return without {}", TX_STATUS_PARAM);
            return Err(CoreError::InvalidRedirect(format!("Missing {} parameter", TX_STATUS_PARAM)));
        };

        let outcome = if tx_status == APPROVED {
            PaymentOutcome::Approved
        } else {
            PaymentOutcome::Failed
        };
        let reference = params
            .order_id
            .clone()
            .unwrap_or_else(|| MISSING_REFERENCE.to_string());

        let resume = match self.resume.take() {
            Ok(resume) => resume,
            Err(e) => {
                tracing::warn!("Resume state unavailable, returning to site root: {}", e);
                None
            }
        };
        let return_path = resume.as_ref().map(|state| state.return_path.as_str());
        let return_url = build_return_url(safe_return_path(return_path), outcome, &reference);

        let resolution = match outcome {
            PaymentOutcome::Approved => {
                self.state = ResolverState::Success;
                Resolution {
                    outcome,
                    reference,
                    return_url,
                    delay: self.delays.success,
                    retry_available: false,
                }
            }
            PaymentOutcome::Failed => {
                self.state = ResolverState::Error;
                Resolution {
                    outcome,
                    reference,
                    return_url,
                    delay: self.delays.failure,
                    retry_available: true,
                }
            }
        };

        tracing::info!(
            "Payment {} for order {}, returning to {}",
            outcome.as_str(),
            resolution.reference,
            resolution.return_url
        );
        Ok(resolution)
    }

    /// Wait out the display delay, then leave with a full page load
    pub async fn finish(&self, resolution: &Resolution, navigator: &dyn Navigator) {
        tokio::time::sleep(resolution.delay).await;
        navigator.full_page_load(&resolution.return_url);
    }

    /// Manual "try again" after a failed payment
    pub fn retry(&self, resolution: &Resolution, navigator: &dyn Navigator) -> CoreResult<()> {
        if !resolution.retry_available {
            return Err(CoreError::InvalidTransition {
                from: format!("{:?}", self.state),
                to: "RETRY".to_string(),
            });
        }
        navigator.go_back();
        Ok(())
    }
}

/// `payment_status`/`ref` as read back by the application page after the redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnNotice {
    pub outcome: PaymentOutcome,
    pub reference: Option<String>,
}

impl ReturnNotice {
    pub fn from_query(query: &str) -> Option<Self> {
        let pairs = parse_query(query);
        let outcome = match first_value(&pairs, PAYMENT_STATUS_PARAM)?.as_str() {
            APPROVED => PaymentOutcome::Approved,
            FAILED => PaymentOutcome::Failed,
            _ => return None,
        };
        let reference = first_value(&pairs, REFERENCE_PARAM).filter(|r| r != MISSING_REFERENCE);
        Some(Self { outcome, reference })
    }
}
