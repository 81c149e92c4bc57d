use serde::{Deserialize, Serialize};

/// Parameters returned by `POST /payments/init`, consumed by the checkout widget.
/// Lives only for the current page; the widget owns the redirect that follows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    pub payment_reference: String,
    pub api_key: String,
    pub integrity_signature: String,
    pub amount: i64,
    pub currency: String,
    pub redirection_url: String,
    #[serde(default)]
    pub description: String,
}

/// Where to send the user once the external payment page is done
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResumeState {
    pub return_path: String,
}
