//! ECDSA key pair generation and key DER marshaling.

use p256::pkcs8::DecodePrivateKey;
use rcgen::{KeyPair, SignatureAlgorithm, PKCS_ECDSA_P256_SHA256, PKCS_ECDSA_P384_SHA384};
use x509_parser::nom::AsBytes;

use crate::error::{Error, Result};

/// Supported NIST elliptic curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EcCurve {
    /// NIST P-256, signed with ECDSA-SHA256.
    #[default]
    P256,
    /// NIST P-384, signed with ECDSA-SHA384.
    P384,
}

impl EcCurve {
    /// The rcgen signature algorithm matching this curve.
    pub fn sign_algo(&self) -> &'static SignatureAlgorithm {
        match self {
            EcCurve::P256 => &PKCS_ECDSA_P256_SHA256,
            EcCurve::P384 => &PKCS_ECDSA_P384_SHA384,
        }
    }
}

/// Generate a fresh ECDSA key pair on the given curve.
///
/// Key material comes from the system CSPRNG. A failing entropy source is
/// terminal: the error must abort the run, never fall back to a weaker
/// source.
pub fn generate_key_pair(curve: EcCurve) -> Result<KeyPair> {
    KeyPair::generate_for(curve.sign_algo()).map_err(Error::RandomSource)
}

/// Marshal the private half of a key pair as SEC1 `ECPrivateKey` DER.
///
/// rcgen serializes private keys as PKCS#8; the `EC PRIVATE KEY` envelope
/// carries the inner SEC1 structure, so the key is decoded and re-encoded
/// through the curve's secret key type.
pub fn private_key_der(curve: EcCurve, key: &KeyPair) -> Result<Vec<u8>> {
    let pkcs8 = key.serialized_der();
    let sec1 = match curve {
        EcCurve::P256 => p256::SecretKey::from_pkcs8_der(pkcs8)
            .map_err(|err| Error::Encoding(format!("not a P-256 private key: {err}")))?
            .to_sec1_der(),
        EcCurve::P384 => p384::SecretKey::from_pkcs8_der(pkcs8)
            .map_err(|err| Error::Encoding(format!("not a P-384 private key: {err}")))?
            .to_sec1_der(),
    }
    .map_err(|err| Error::Encoding(format!("failed to encode SEC1 private key: {err}")))?;
    Ok(sec1.as_bytes().to_vec())
}

/// Marshal the public half of a key pair as SubjectPublicKeyInfo DER.
pub fn public_key_der(key: &KeyPair) -> Vec<u8> {
    key.public_key_der()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ring::rand::SystemRandom;
    use ring::signature::{
        EcdsaKeyPair, UnparsedPublicKey, ECDSA_P256_SHA256_ASN1, ECDSA_P256_SHA256_ASN1_SIGNING,
        ECDSA_P384_SHA384_ASN1, ECDSA_P384_SHA384_ASN1_SIGNING,
    };
    use x509_parser::prelude::FromDer as _;
    use x509_parser::x509::SubjectPublicKeyInfo;

    fn sign_verify_round_trip(curve: EcCurve) {
        let (sign_algo, verify_algo) = match curve {
            EcCurve::P256 => (&ECDSA_P256_SHA256_ASN1_SIGNING, &ECDSA_P256_SHA256_ASN1),
            EcCurve::P384 => (&ECDSA_P384_SHA384_ASN1_SIGNING, &ECDSA_P384_SHA384_ASN1),
        };
        let key = generate_key_pair(curve).unwrap();
        let rng = SystemRandom::new();
        let signer = EcdsaKeyPair::from_pkcs8(sign_algo, key.serialized_der(), &rng).unwrap();
        let message = b"key pair round trip";
        let signature = signer.sign(&rng, message).unwrap();

        let public_der = public_key_der(&key);
        let (_, spki) = SubjectPublicKeyInfo::from_der(&public_der).unwrap();
        let public_key = UnparsedPublicKey::new(verify_algo, &spki.subject_public_key.data);
        public_key.verify(message, signature.as_ref()).unwrap();
    }

    #[test]
    fn test_sign_verify_p256() {
        sign_verify_round_trip(EcCurve::P256);
    }

    #[test]
    fn test_sign_verify_p384() {
        sign_verify_round_trip(EcCurve::P384);
    }

    #[test]
    fn test_private_key_sec1_round_trip() {
        let key = generate_key_pair(EcCurve::P256).unwrap();
        let sec1 = private_key_der(EcCurve::P256, &key).unwrap();
        let secret = p256::SecretKey::from_sec1_der(&sec1).unwrap();
        assert_eq!(secret.to_sec1_der().unwrap().as_bytes(), &sec1[..]);

        let from_pkcs8 = p256::SecretKey::from_pkcs8_der(key.serialized_der()).unwrap();
        assert_eq!(secret.to_bytes(), from_pkcs8.to_bytes());
    }

    #[test]
    fn test_private_key_der_rejects_wrong_curve() {
        let key = generate_key_pair(EcCurve::P256).unwrap();
        assert!(matches!(
            private_key_der(EcCurve::P384, &key),
            Err(Error::Encoding(_))
        ));
    }
}
