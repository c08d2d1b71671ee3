// Scanned payload parsing
//
// A decode event delivers an opaque string. We keep that string verbatim
// (it is what gets handed off or recorded), and additionally try to parse
// UPI deep links (upi://pay?pa=...&pn=...&am=...&cu=...) so the confirmation
// view can show payee and amount instead of a raw URI. Parsing only enriches
// display; it never rejects a non-empty payload.

use std::fmt;

/// A captured payment request: the raw payload plus whatever display
/// fields we could extract from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// The decoded payload, byte-for-byte as scanned
    pub raw: String,
    /// Payee address (UPI `pa` parameter), if present
    pub payee: Option<String>,
    /// Payee display name (UPI `pn` parameter), if present
    pub payee_name: Option<String>,
    /// Amount as a string (UPI `am` parameter), if present
    pub amount: Option<String>,
    /// Currency code (UPI `cu` parameter), defaults to INR for UPI links
    pub currency: Option<String>,
}

/// Why a payload was rejected before capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    /// Decode event carried an empty or whitespace-only string
    Empty,
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::Empty => write!(f, "Scanned code was empty - try again"),
        }
    }
}

impl PaymentRequest {
    /// Parse a decoded payload. Only empty/whitespace payloads are rejected;
    /// anything else is captured, with UPI fields extracted when available.
    pub fn parse(raw: &str) -> Result<Self, PayloadError> {
        if raw.trim().is_empty() {
            return Err(PayloadError::Empty);
        }

        let mut request = Self {
            raw: raw.to_string(),
            payee: None,
            payee_name: None,
            amount: None,
            currency: None,
        };

        // UPI deep link: upi://pay?pa=merchant@bank&pn=Name&am=500&cu=INR
        if let Some(query) = raw
            .strip_prefix("upi://pay?")
            .or_else(|| raw.strip_prefix("upi://pay/?"))
        {
            for pair in query.split('&') {
                let mut parts = pair.splitn(2, '=');
                let key = parts.next().unwrap_or_default();
                let value = parts.next().unwrap_or_default();
                if value.is_empty() {
                    continue;
                }
                match key {
                    "pa" => request.payee = Some(decode_component(value)),
                    "pn" => request.payee_name = Some(decode_component(value)),
                    "am" => request.amount = Some(value.to_string()),
                    "cu" => request.currency = Some(value.to_string()),
                    _ => {}
                }
            }
            if request.currency.is_none() && request.payee.is_some() {
                request.currency = Some("INR".to_string());
            }
        }

        Ok(request)
    }

    /// Whether the payload looks like a URI we could hand off externally
    pub fn is_uri(&self) -> bool {
        self.raw.contains("://")
    }

    /// One-line summary for the confirmation view and payment records
    pub fn summary(&self) -> String {
        match (&self.payee, &self.amount) {
            (Some(payee), Some(amount)) => {
                let cu = self.currency.as_deref().unwrap_or("INR");
                match &self.payee_name {
                    Some(name) => format!("{} ({}) - {} {}", name, payee, cu, amount),
                    None => format!("{} - {} {}", payee, cu, amount),
                }
            }
            (Some(payee), None) => payee.clone(),
            _ => self.raw.clone(),
        }
    }
}

/// Minimal percent/plus decoding for UPI query components.
/// UPI links in the wild use %20 or + for spaces in payee names.
///
/// Decodes into a byte buffer: percent escapes can encode multi-byte UTF-8
/// sequences (%C3%A9 is one "é"), so bytes only become text at the end. A
/// `%` not followed by two hex digits is kept literally.
fn decode_component(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                // Both digits are ASCII, so the slice cannot split a character
                let byte = u8::from_str_radix(&value[i + 1..i + 3], 16).unwrap_or(b'%');
                out.push(byte);
                i += 3;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_rejected() {
        assert_eq!(PaymentRequest::parse(""), Err(PayloadError::Empty));
        assert_eq!(PaymentRequest::parse("   \t"), Err(PayloadError::Empty));
    }

    #[test]
    fn upi_link_is_parsed() {
        let req = PaymentRequest::parse("upi://pay?pa=merchant@bank&am=500").unwrap();
        assert_eq!(req.raw, "upi://pay?pa=merchant@bank&am=500");
        assert_eq!(req.payee.as_deref(), Some("merchant@bank"));
        assert_eq!(req.amount.as_deref(), Some("500"));
        // UPI defaults to INR when cu is absent
        assert_eq!(req.currency.as_deref(), Some("INR"));
        assert!(req.is_uri());
    }

    #[test]
    fn payee_name_is_decoded() {
        let req =
            PaymentRequest::parse("upi://pay?pa=shop@upi&pn=Corner%20Store&am=120&cu=INR").unwrap();
        assert_eq!(req.payee_name.as_deref(), Some("Corner Store"));
        assert_eq!(req.summary(), "Corner Store (shop@upi) - INR 120");
    }

    #[test]
    fn percent_encoded_utf8_is_decoded() {
        let req = PaymentRequest::parse("upi://pay?pa=shop@upi&pn=Caf%C3%A9+Nord").unwrap();
        assert_eq!(req.payee_name.as_deref(), Some("Café Nord"));
    }

    #[test]
    fn multibyte_text_after_a_bare_percent_is_kept() {
        // "%a" is not a complete escape; the "é" right behind it must not
        // trip the hex lookahead
        let req = PaymentRequest::parse("upi://pay?pa=x@y&pn=%aétore").unwrap();
        assert_eq!(req.payee_name.as_deref(), Some("%aétore"));
        assert_eq!(req.raw, "upi://pay?pa=x@y&pn=%aétore");
    }

    #[test]
    fn opaque_payload_is_kept_verbatim() {
        let req = PaymentRequest::parse("hello world").unwrap();
        assert_eq!(req.raw, "hello world");
        assert_eq!(req.payee, None);
        assert_eq!(req.summary(), "hello world");
        assert!(!req.is_uri());
    }
}
