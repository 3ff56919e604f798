use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Proof-of-payment verifier for gateway callbacks.
///
/// The gateway signs `external_order_id|external_payment_id` with a shared
/// secret (HMAC-SHA256, hex encoded). The secret is injected so it can be
/// rotated and replaced in tests.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn mac(&self, external_order_id: &str, external_payment_id: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(external_order_id.as_bytes());
        mac.update(b"|");
        mac.update(external_payment_id.as_bytes());
        mac
    }

    /// Expected hex signature for the given order/payment pair
    pub fn sign(&self, external_order_id: &str, external_payment_id: &str) -> String {
        let mac = self.mac(external_order_id, external_payment_id);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Constant-time verification; a non-hex signature simply fails
    pub fn verify(
        &self,
        external_order_id: &str,
        external_payment_id: &str,
        signature: &str,
    ) -> bool {
        let Ok(provided) = hex::decode(signature) else {
            return false;
        };
        self.mac(external_order_id, external_payment_id)
            .verify_slice(&provided)
            .is_ok()
    }
}
