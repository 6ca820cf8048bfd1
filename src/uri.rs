//! `otpauth://` provisioning URIs, as read by authenticator apps.

/// Endpoint that renders a QR image from its `data` query parameter.
pub const QR_SERVICE: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Default edge length of the QR image, in pixels.
pub const DEFAULT_QR_SIZE: u32 = 300;

/// `otpauth://totp/<label>?secret=<secret>`, with the label percent-encoded.
pub fn build_uri(label: &str, secret: &str) -> String {
    format!(
        "otpauth://totp/{}?secret={}",
        urlencoding::encode(label),
        secret
    )
}

/// URL of a QR image for the provisioning URI. Nothing is fetched here.
pub fn qr_code_url(label: &str, secret: &str, size: u32) -> String {
    let uri = build_uri(label, secret);
    format!(
        "{QR_SERVICE}?data={}&size={size}x{size}&ecc=M",
        urlencoding::encode(&uri)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    #[test]
    fn plain_label() {
        assert_eq!(
            build_uri("alice", SECRET),
            "otpauth://totp/alice?secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"
        );
    }

    #[test]
    fn label_is_percent_encoded() {
        assert_eq!(
            build_uri("Example Co:alice@example.com", SECRET),
            "otpauth://totp/Example%20Co%3Aalice%40example.com?secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"
        );
    }

    #[test]
    fn qr_url_wraps_encoded_uri() {
        assert_eq!(
            qr_code_url("alice", "JBSWY3DP", DEFAULT_QR_SIZE),
            "https://api.qrserver.com/v1/create-qr-code/\
             ?data=otpauth%3A%2F%2Ftotp%2Falice%3Fsecret%3DJBSWY3DP&size=300x300&ecc=M"
        );
    }

    #[test]
    fn qr_url_size() {
        assert!(qr_code_url("a", "JBSWY3DP", 150).contains("&size=150x150&"));
    }
}
