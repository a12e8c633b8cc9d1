use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use ec_pki::artifact::{self, CERTIFICATE, EC_PRIVATE_KEY, EC_PUBLIC_KEY};
use ec_pki::cert::CertRequest;
use ec_pki::keys::{self, EcCurve};
use ec_pki::rcgen::{Certificate, ExtendedKeyUsagePurpose, KeyPair, KeyUsagePurpose};
use fs_err as fs;
use time::Duration;
use tracing::info;

const CURVE: EcCurve = EcCurve::P256;

const ROOT_SUBJECT: &str = "Root Common Name";
const ROOT_ORG: &str = "Root Organisation Name";
const LEAF_SUBJECT: &str = "Leaf Common Name";
const LEAF_ORG: &str = "Leaf Organisation Name";
const COUNTRY: &str = "Country";

// Both certificates are issued with this fixed serial; proper CA practice
// requires a unique serial per certificate of an issuer.
const SERIAL: u64 = 1;

const ROOT_VALIDITY: Duration = Duration::days(5 * 365);
const LEAF_VALIDITY: Duration = Duration::days(2 * 365);

const ROOT_PRIVATE_KEY_FILE: &str = "root_private_ecdsa.pem";
const ROOT_PUBLIC_KEY_FILE: &str = "root_public_ecdsa.pem";
const ROOT_CERT_FILE: &str = "root_cert_ecdsa.pem";
const LEAF_PRIVATE_KEY_FILE: &str = "leaf_private_ecdsa.pem";
const LEAF_PUBLIC_KEY_FILE: &str = "leaf_public_ecdsa.pem";
const LEAF_CERT_FILE: &str = "leaf_cert_ecdsa.pem";

/// Bootstrap a two-tier ECDSA certificate hierarchy
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Output directory for the generated keys and certificates
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

fn root_request(key: &KeyPair) -> CertRequest<'_, KeyPair> {
    CertRequest::builder()
        .key(key)
        .subject(ROOT_SUBJECT)
        .org_name(ROOT_ORG)
        .country(COUNTRY)
        .serial(SERIAL)
        .validity(ROOT_VALIDITY)
        .key_usages(vec![KeyUsagePurpose::KeyEncipherment])
        .extended_key_usages(vec![ExtendedKeyUsagePurpose::Any])
        .build()
}

fn leaf_request(key: &KeyPair) -> CertRequest<'_, KeyPair> {
    CertRequest::builder()
        .key(key)
        .subject(LEAF_SUBJECT)
        .org_name(LEAF_ORG)
        .country(COUNTRY)
        .serial(SERIAL)
        .validity(LEAF_VALIDITY)
        .key_usages(vec![
            KeyUsagePurpose::DigitalSignature,
            KeyUsagePurpose::DataEncipherment,
            KeyUsagePurpose::KeyEncipherment,
        ])
        .extended_key_usages(vec![
            ExtendedKeyUsagePurpose::ServerAuth,
            ExtendedKeyUsagePurpose::ClientAuth,
            ExtendedKeyUsagePurpose::CodeSigning,
            ExtendedKeyUsagePurpose::EmailProtection,
        ])
        .build()
}

fn persist_key_pair(
    dir: &Path,
    private_file: &str,
    public_file: &str,
    key: &KeyPair,
) -> Result<()> {
    let private_path = dir.join(private_file);
    let private_der = keys::private_key_der(CURVE, key).context("failed to marshal private key")?;
    artifact::write_pem(&private_path, EC_PRIVATE_KEY, &private_der)
        .with_context(|| format!("failed to write {}", private_path.display()))?;
    info!("ECDSA private key saved to {private_path:?}");

    let public_path = dir.join(public_file);
    artifact::write_pem(&public_path, EC_PUBLIC_KEY, &keys::public_key_der(key))
        .with_context(|| format!("failed to write {}", public_path.display()))?;
    info!("ECDSA public key saved to {public_path:?}");
    Ok(())
}

fn persist_certificate(dir: &Path, file: &str, kind: &str, cert: &Certificate) -> Result<()> {
    let path = dir.join(file);
    artifact::write_pem(&path, CERTIFICATE, cert.der())
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("ECDSA {kind} certificate saved to {path:?}");
    Ok(())
}

/// Run the whole bootstrap. Any failing step aborts the remaining ones;
/// artifacts already written stay on disk.
fn bootstrap(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir).context("failed to create output directory")?;

    let root_key = keys::generate_key_pair(CURVE).context("failed to generate root key pair")?;
    let root_cert = root_request(&root_key)
        .self_signed()
        .context("failed to build root certificate")?;

    let leaf_key = keys::generate_key_pair(CURVE).context("failed to generate leaf key pair")?;
    let leaf_cert = leaf_request(&leaf_key)
        .signed_by(&root_cert, &root_key)
        .context("failed to build leaf certificate")?;

    persist_key_pair(
        output_dir,
        ROOT_PRIVATE_KEY_FILE,
        ROOT_PUBLIC_KEY_FILE,
        &root_key,
    )?;
    persist_certificate(output_dir, ROOT_CERT_FILE, "root", &root_cert)?;
    persist_key_pair(
        output_dir,
        LEAF_PRIVATE_KEY_FILE,
        LEAF_PUBLIC_KEY_FILE,
        &leaf_key,
    )?;
    persist_certificate(output_dir, LEAF_CERT_FILE, "leaf", &leaf_cert)?;
    Ok(())
}

fn main() -> Result<()> {
    {
        use tracing_subscriber::{fmt, EnvFilter};
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt().with_env_filter(filter).init();
    }
    let args = Args::parse();
    bootstrap(&args.output_dir)
}
