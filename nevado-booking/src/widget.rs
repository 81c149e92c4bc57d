use nevado_core::{CoreError, CoreResult, PaymentWidget, PaymentWidgetConfig, WidgetHandle};

/// Escape text for use inside HTML text nodes and double-quoted attributes
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Renders the provider's checkout button as a `<script>` element carrying the session
/// as `data-*` attributes. The provider's script reads them and performs the redirect.
#[derive(Debug, Clone)]
pub struct ScriptTagWidget {
    script_url: String,
}

impl ScriptTagWidget {
    pub fn new(script_url: impl Into<String>) -> Self {
        Self {
            script_url: script_url.into(),
        }
    }
}

impl PaymentWidget for ScriptTagWidget {
    fn render(&self, config: &PaymentWidgetConfig) -> CoreResult<WidgetHandle> {
        if config.api_key.is_empty() || config.order_id.is_empty() || config.integrity_signature.is_empty() {
            return Err(CoreError::PaymentInit(
                "Payment session is missing its key, reference or signature".to_string(),
            ));
        }

        let amount = config.amount.to_string();
        let attributes = [
            ("data-api-key", config.api_key.as_str()),
            ("data-amount", amount.as_str()),
            ("data-currency", config.currency.as_str()),
            ("data-order-id", config.order_id.as_str()),
            ("data-integrity-signature", config.integrity_signature.as_str()),
            ("data-description", config.description.as_str()),
            ("data-redirection-url", config.redirection_url.as_str()),
        ];

        let mut markup = format!(
            "<script src=\"{}\" data-bold-button=\"dark-L\"",
            escape_html(&self.script_url)
        );
        for (name, value) in attributes {
            markup.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
        }
        markup.push_str("></script>");

        Ok(WidgetHandle {
            order_id: config.order_id.clone(),
            markup,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaymentWidgetConfig {
        PaymentWidgetConfig {
            api_key: "pk_test".to_string(),
            amount: 2_400_000,
            currency: "COP".to_string(),
            order_id: "REF123".to_string(),
            integrity_signature: "sig-abc".to_string(),
            description: "Tolima \"4D\" <summit>".to_string(),
            redirection_url: "https://nevado.example/payment-result?a=1&b=2".to_string(),
        }
    }

    #[test]
    fn test_script_tag_carries_every_field() {
        let widget = ScriptTagWidget::new("https://checkout.bold.co/library/boldPaymentButton.js");
        let handle = widget.render(&config()).unwrap();

        assert_eq!(handle.order_id, "REF123");
        assert!(handle
            .markup
            .starts_with("<script src=\"https://checkout.bold.co/library/boldPaymentButton.js\" data-bold-button"));
        assert!(handle.markup.contains("data-api-key=\"pk_test\""));
        assert!(handle.markup.contains("data-amount=\"2400000\""));
        assert!(handle.markup.contains("data-currency=\"COP\""));
        assert!(handle.markup.contains("data-order-id=\"REF123\""));
        assert!(handle.markup.contains("data-integrity-signature=\"sig-abc\""));
        assert!(handle
            .markup
            .contains("data-redirection-url=\"https://nevado.example/payment-result?a=1&amp;b=2\""));
        assert!(handle.markup.ends_with("></script>"));
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let handle = ScriptTagWidget::new("x.js").render(&config()).unwrap();
        assert!(handle
            .markup
            .contains("data-description=\"Tolima &quot;4D&quot; &lt;summit&gt;\""));
    }

    #[test]
    fn test_incomplete_session_is_rejected() {
        let mut config = config();
        config.integrity_signature.clear();
        let err = ScriptTagWidget::new("x.js").render(&config).unwrap_err();
        assert!(matches!(err, CoreError::PaymentInit(_)));
    }
}
