//! Certificate construction functions.

use rcgen::{
    Certificate, CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, IsCa,
    KeyPair, KeyUsagePurpose, PublicKeyData, SerialNumber,
};
use time::{Duration, OffsetDateTime};
use x509_parser::prelude::{FromDer, X509Certificate};

use crate::error::{Error, Result};

/// Information required to create a certificate.
///
/// The certified key is a distinct parameter from the signing key: for a
/// self-signed certificate they coincide, for a child certificate the
/// issuer's key signs while the child's public key is embedded. Both
/// certificates of the bootstrap carry a basic-constraints extension with
/// cA=false.
#[derive(bon::Builder)]
pub struct CertRequest<'a, Key> {
    key: &'a Key,
    subject: &'a str,
    org_name: Option<&'a str>,
    country: Option<&'a str>,
    serial: u64,
    not_before: Option<OffsetDateTime>,
    validity: Duration,
    #[builder(default)]
    key_usages: Vec<KeyUsagePurpose>,
    #[builder(default)]
    extended_key_usages: Vec<ExtendedKeyUsagePurpose>,
}

impl<Key> CertRequest<'_, Key> {
    fn into_cert_params(self) -> Result<CertificateParams> {
        let mut params = CertificateParams::new(vec![]).map_err(Error::Signing)?;
        let mut dn = DistinguishedName::new();
        if let Some(org_name) = self.org_name {
            dn.push(DnType::OrganizationName, org_name);
        }
        if let Some(country) = self.country {
            dn.push(DnType::CountryName, country);
        }
        dn.push(DnType::CommonName, self.subject);
        params.distinguished_name = dn;
        params.serial_number = Some(SerialNumber::from(self.serial));
        params.key_usages = self.key_usages;
        params.extended_key_usages = self.extended_key_usages;
        params.is_ca = IsCa::ExplicitNoCa;
        let not_before = self.not_before.unwrap_or_else(OffsetDateTime::now_utc);
        params.not_before = not_before;
        params.not_after = not_before + self.validity;
        Ok(params)
    }
}

impl CertRequest<'_, KeyPair> {
    /// Create a self-signed certificate.
    pub fn self_signed(self) -> Result<Certificate> {
        let key = self.key;
        let cert = self
            .into_cert_params()?
            .self_signed(key)
            .map_err(Error::Signing)?;
        parse_checked(cert)
    }
}

impl<Key: PublicKeyData> CertRequest<'_, Key> {
    /// Create a certificate signed by a given issuer.
    ///
    /// The issuer name of the result is taken from `issuer`'s subject;
    /// `issuer_key` signs while `self.key` is the certified key.
    pub fn signed_by(self, issuer: &Certificate, issuer_key: &KeyPair) -> Result<Certificate> {
        let key = self.key;
        let cert = self
            .into_cert_params()?
            .signed_by(key, issuer, issuer_key)
            .map_err(Error::Signing)?;
        parse_checked(cert)
    }
}

/// Parse freshly signed DER back so malformed output is caught at
/// construction time instead of at first use.
fn parse_checked(cert: Certificate) -> Result<Certificate> {
    X509Certificate::from_der(cert.der())
        .map_err(|err| Error::Encoding(format!("signed certificate does not parse: {err}")))?;
    Ok(cert)
}

/// Check that `child_der` names `parent_der`'s subject as its issuer and
/// that the parent's public key verifies the child's signature.
pub fn verify_issued_by(child_der: &[u8], parent_der: &[u8]) -> Result<()> {
    let (_, child) = X509Certificate::from_der(child_der)
        .map_err(|err| Error::Encoding(format!("failed to parse child certificate: {err}")))?;
    let (_, parent) = X509Certificate::from_der(parent_der)
        .map_err(|err| Error::Encoding(format!("failed to parse parent certificate: {err}")))?;
    if child.issuer() != parent.subject() {
        return Err(Error::Verification(format!(
            "issuer {} does not match subject {}",
            child.issuer(),
            parent.subject()
        )));
    }
    child
        .verify_signature(Some(parent.public_key()))
        .map_err(|err| Error::Verification(err.to_string()))
}

/// Check a self-signed certificate against its own embedded public key.
pub fn verify_self_signed(der: &[u8]) -> Result<()> {
    let (_, cert) = X509Certificate::from_der(der)
        .map_err(|err| Error::Encoding(format!("failed to parse certificate: {err}")))?;
    if cert.subject() != cert.issuer() {
        return Err(Error::Verification(format!(
            "subject {} does not match issuer {}",
            cert.subject(),
            cert.issuer()
        )));
    }
    cert.verify_signature(None)
        .map_err(|err| Error::Verification(err.to_string()))
}
