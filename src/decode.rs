use std::fmt::Write as _;
use std::net::{Ipv4Addr, Ipv6Addr};

use x509_parser::der_parser::num_bigint::BigUint;
use x509_parser::objects::{oid2sn, oid_registry};
use x509_parser::prelude::*;
use x509_parser::public_key::PublicKey;

use crate::validity::{evaluate, humanize};

const OID_AD_OCSP: &str = "1.3.6.1.5.5.7.48.1";
const OID_AD_CA_ISSUERS: &str = "1.3.6.1.5.5.7.48.2";
const OID_ED25519: &str = "1.3.101.112";
const OID_ED448: &str = "1.3.101.113";
const OID_ATTR_SERIALNUMBER: &str = "2.5.4.5";

/// One display field. Multi values render as indented continuation lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Single(String),
    Multi(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub name: &'static str,
    pub value: FieldValue,
}

impl FieldEntry {
    pub fn single(name: &'static str, value: impl Into<String>) -> Self {
        FieldEntry {
            name,
            value: FieldValue::Single(value.into()),
        }
    }

    pub fn multi(name: &'static str, values: Vec<String>) -> Self {
        FieldEntry {
            name,
            value: FieldValue::Multi(values),
        }
    }
}

/// Decoded view of one certificate: fields in display order plus any
/// non-fatal decoding warnings.
#[derive(Debug, Default)]
pub struct Decoded {
    pub fields: Vec<FieldEntry>,
    pub warnings: Vec<String>,
}

/// Walk the certificate and its extension set and produce the ordered field
/// list. Absent extensions simply omit their field; attribute anomalies
/// degrade the field and surface as a warning, never as an error. `now` is
/// the evaluation instant for the validity field (seconds since epoch, UTC).
pub fn decode(cert: &X509Certificate<'_>, now: i64, verbose: bool) -> Decoded {
    let mut out = Decoded::default();

    let subject = subject_field(cert, &mut out.warnings);
    out.fields.push(subject);
    if verbose {
        out.fields
            .push(FieldEntry::single("Type", validation_type(cert)));
    }

    let san = san_values(cert);
    if !san.is_empty() {
        out.fields.push(FieldEntry::multi("SAN", san));
    }

    out.fields
        .push(FieldEntry::single("Issuer", cert.issuer().to_string()));
    out.fields.push(validity_field(cert, now));
    if verbose {
        out.fields.push(FieldEntry::single(
            "Not before",
            cert.validity().not_before.to_string(),
        ));
        out.fields.push(FieldEntry::single(
            "Not after",
            cert.validity().not_after.to_string(),
        ));
    }

    if let Some(constraints) = constraints_field(cert) {
        out.fields.push(constraints);
    }
    out.fields
        .push(FieldEntry::single("Serial", cert.raw_serial_as_string()));

    let usage = usage_values(cert, &mut out.warnings);
    if !usage.is_empty() {
        out.fields
            .push(FieldEntry::single("Usage", usage.join(", ")));
    }

    let crl = crl_distribution_points(cert);
    if !crl.is_empty() {
        out.fields.push(FieldEntry::multi("CRL", crl));
    }
    let (ca_issuers, ocsp) = access_locations(cert);
    if !ca_issuers.is_empty() {
        out.fields.push(FieldEntry::multi("CA issuers", ca_issuers));
    }
    if !ocsp.is_empty() {
        out.fields.push(FieldEntry::multi("OCSP", ocsp));
    }

    out.fields
        .push(FieldEntry::single("Ciphers", cipher_summary(cert)));

    if let Some(skid) = skid_field(cert) {
        out.fields.push(skid);
    }
    if let Some(akid) = akid_field(cert) {
        out.fields.push(akid);
    }

    out
}

// A single CN attribute is the common case and becomes the CN field. Zero
// or duplicated CNs fall back to the full distinguished name under a
// "Subject" field, with a warning either way.
fn subject_field(cert: &X509Certificate<'_>, warnings: &mut Vec<String>) -> FieldEntry {
    let cns: Vec<&str> = cert
        .subject()
        .iter_common_name()
        .filter_map(|attr| attr.as_str().ok())
        .collect();
    match cns.as_slice() {
        [cn] => FieldEntry::single("CN", *cn),
        [] => {
            warnings.push("missing CN attribute".to_string());
            FieldEntry::single("Subject", cert.subject().to_string())
        }
        _ => {
            warnings.push("too many CN attributes".to_string());
            FieldEntry::single("Subject", cert.subject().to_string())
        }
    }
}

/// The closed set of general-name variants recognized in SAN entries, in
/// their fixed display order. Values of one kind are emitted before the
/// next kind, regardless of the order names appear in the certificate.
#[derive(Debug, Clone, Copy)]
enum SanKind {
    Other,
    Mail,
    Dns,
    Uri,
    Directory,
    RegisteredId,
    Ip,
}

const SAN_ORDER: [SanKind; 7] = [
    SanKind::Other,
    SanKind::Mail,
    SanKind::Dns,
    SanKind::Uri,
    SanKind::Directory,
    SanKind::RegisteredId,
    SanKind::Ip,
];

impl SanKind {
    fn prefix(self) -> &'static str {
        match self {
            SanKind::Other => "other",
            SanKind::Mail => "mail",
            SanKind::Dns => "dns",
            SanKind::Uri => "uri",
            SanKind::Directory => "dirname",
            SanKind::RegisteredId => "rid",
            SanKind::Ip => "ip",
        }
    }

    fn value_of(self, name: &GeneralName<'_>) -> Option<String> {
        match (self, name) {
            (SanKind::Other, GeneralName::OtherName(oid, _)) => Some(oid.to_id_string()),
            (SanKind::Mail, GeneralName::RFC822Name(v)) => Some((*v).to_string()),
            (SanKind::Dns, GeneralName::DNSName(v)) => Some((*v).to_string()),
            (SanKind::Uri, GeneralName::URI(v)) => Some((*v).to_string()),
            (SanKind::Directory, GeneralName::DirectoryName(n)) => Some(n.to_string()),
            (SanKind::RegisteredId, GeneralName::RegisteredID(oid)) => Some(oid.to_id_string()),
            (SanKind::Ip, GeneralName::IPAddress(bytes)) => Some(format_ip(bytes)),
            _ => None,
        }
    }
}

fn san_values(cert: &X509Certificate<'_>) -> Vec<String> {
    let san = match cert.subject_alternative_name() {
        Ok(Some(ext)) => ext.value,
        _ => return Vec::new(),
    };
    let mut out = Vec::new();
    for kind in SAN_ORDER {
        for name in &san.general_names {
            if let Some(value) = kind.value_of(name) {
                out.push(format!("{}:{}", kind.prefix(), value));
            }
        }
    }
    out
}

fn validity_field(cert: &X509Certificate<'_>, now: i64) -> FieldEntry {
    let not_before = cert.validity().not_before.timestamp();
    let not_after = cert.validity().not_after.timestamp();
    let (is_valid, remaining) = evaluate(not_before, not_after, now);
    let (magnitude, unit) = humanize(remaining);
    let value = if is_valid {
        format!("valid, expires in {} {}", magnitude, unit)
    } else if remaining < 0 {
        format!("expired {} {} ago", magnitude.abs(), unit)
    } else {
        format!("not yet valid, becomes valid in {} {}", magnitude, unit)
    };
    FieldEntry::single("Validity", value)
}

fn constraints_field(cert: &X509Certificate<'_>) -> Option<FieldEntry> {
    match cert.basic_constraints() {
        Ok(Some(ext)) => {
            let bc = ext.value;
            let path_len = bc
                .path_len_constraint
                .map(|n| n.to_string())
                .unwrap_or_else(|| "none".to_string());
            Some(FieldEntry::single(
                "Constraints",
                format!(
                    "critical = {}, is CA = {}, path length = {}",
                    ext.critical, bc.ca, path_len
                ),
            ))
        }
        _ => None,
    }
}

// The seven KeyUsage bits in their defined order, with the humanized labels
// the field displays.
const KEY_USAGE_BITS: [(fn(&KeyUsage) -> bool, &str); 7] = [
    (KeyUsage::digital_signature, "Digital signature"),
    (KeyUsage::non_repudiation, "Content commitment"),
    (KeyUsage::key_encipherment, "Encipherment"),
    (KeyUsage::data_encipherment, "Data encipherment"),
    (KeyUsage::key_agreement, "Agreement"),
    (KeyUsage::key_cert_sign, "Certificate signing"),
    (KeyUsage::crl_sign, "CRL signing"),
];

fn usage_values(cert: &X509Certificate<'_>, warnings: &mut Vec<String>) -> Vec<String> {
    let mut out = Vec::new();
    match cert.key_usage() {
        Ok(Some(ext)) => {
            for (bit, label) in KEY_USAGE_BITS {
                if bit(ext.value) {
                    out.push(label.to_string());
                }
            }
        }
        _ => warnings.push("no key usages found".to_string()),
    }
    if let Ok(Some(ext)) = cert.extended_key_usage() {
        let eku = ext.value;
        if eku.server_auth {
            out.push("Server authentication".to_string());
        }
        if eku.client_auth {
            out.push("Client authentication".to_string());
        }
        if eku.code_signing {
            out.push("Code signing".to_string());
        }
        if eku.email_protection {
            out.push("Email protection".to_string());
        }
        if eku.time_stamping {
            out.push("Time stamping".to_string());
        }
        if eku.ocsp_signing {
            out.push("OCSP signing".to_string());
        }
        if eku.any {
            out.push("Any extended key usage".to_string());
        }
        for oid in &eku.other {
            out.push(oid.to_id_string());
        }
    }
    out
}

// Every full-name general name across all distribution points, flattened in
// source order.
fn crl_distribution_points(cert: &X509Certificate<'_>) -> Vec<String> {
    for ext in cert.extensions() {
        if let ParsedExtension::CRLDistributionPoints(points) = ext.parsed_extension() {
            let mut out = Vec::new();
            for point in &points.points {
                if let Some(DistributionPointName::FullName(names)) = &point.distribution_point {
                    for name in names {
                        out.push(general_name_string(name));
                    }
                }
            }
            return out;
        }
    }
    Vec::new()
}

fn access_locations(cert: &X509Certificate<'_>) -> (Vec<String>, Vec<String>) {
    let mut ca_issuers = Vec::new();
    let mut ocsp = Vec::new();
    for ext in cert.extensions() {
        if let ParsedExtension::AuthorityInfoAccess(aia) = ext.parsed_extension() {
            for desc in &aia.accessdescs {
                match desc.access_method.to_id_string().as_str() {
                    OID_AD_CA_ISSUERS => ca_issuers.push(general_name_string(&desc.access_location)),
                    OID_AD_OCSP => ocsp.push(general_name_string(&desc.access_location)),
                    _ => {}
                }
            }
        }
    }
    (ca_issuers, ocsp)
}

fn skid_field(cert: &X509Certificate<'_>) -> Option<FieldEntry> {
    for ext in cert.extensions() {
        if let ParsedExtension::SubjectKeyIdentifier(kid) = ext.parsed_extension() {
            return Some(FieldEntry::single(
                "SKID",
                format!("keyid: {}", hex_lower(kid.0)),
            ));
        }
    }
    None
}

fn akid_field(cert: &X509Certificate<'_>) -> Option<FieldEntry> {
    for ext in cert.extensions() {
        if let ParsedExtension::AuthorityKeyIdentifier(aki) = ext.parsed_extension() {
            let mut parts = Vec::new();
            if let Some(kid) = &aki.key_identifier {
                parts.push(format!("keyid: {}", hex_lower(kid.0)));
            }
            if let Some(names) = &aki.authority_cert_issuer {
                let dirnames: Vec<String> = names.iter().map(general_name_string).collect();
                if !dirnames.is_empty() {
                    parts.push(format!("dirname:{}", dirnames.join(",")));
                }
            }
            if let Some(serial) = aki.authority_cert_serial {
                // Serials routinely exceed u128.
                parts.push(format!("serial:{}", BigUint::from_bytes_be(serial)));
            }
            if parts.is_empty() {
                return None;
            }
            return Some(FieldEntry::multi("AKID", parts));
        }
    }
    None
}

/// Summarize the public key (algorithm and size or curve), appending the
/// signature hash algorithm when it is a known one.
fn cipher_summary(cert: &X509Certificate<'_>) -> String {
    let spki = cert.public_key();
    let key = match spki.algorithm.algorithm.to_id_string().as_str() {
        OID_ED25519 => "ED25519".to_string(),
        OID_ED448 => "ED448".to_string(),
        _ => match spki.parsed() {
            Ok(key @ PublicKey::RSA(_)) => format!("RSA {}", key.key_size()),
            Ok(key @ PublicKey::DSA(_)) => format!("DSA {}", key.key_size()),
            Ok(PublicKey::EC(_)) => format!("EC {}", curve_name(spki)),
            _ => "unknown".to_string(),
        },
    };
    match signature_hash_name(cert) {
        Some(hash) => format!("{} / {}", key, hash),
        None => key,
    }
}

// The curve OID sits in the SPKI algorithm parameters; explicit (non-named)
// curve parameters fall through to the dotted OID or "unknown".
fn curve_name(spki: &SubjectPublicKeyInfo<'_>) -> String {
    let oid = match spki.algorithm.parameters.as_ref().and_then(|p| p.as_oid().ok()) {
        Some(oid) => oid,
        None => return "unknown".to_string(),
    };
    match oid2sn(&oid, oid_registry()) {
        Ok(name) => name.to_string(),
        Err(_) => oid.to_id_string(),
    }
}

fn signature_hash_name(cert: &X509Certificate<'_>) -> Option<&'static str> {
    match cert.signature_algorithm.algorithm.to_id_string().as_str() {
        "1.2.840.113549.1.1.4" => Some("MD5"),
        "1.2.840.113549.1.1.5" | "1.2.840.10040.4.3" | "1.2.840.10045.4.1" => Some("SHA1"),
        "1.2.840.113549.1.1.11" | "1.2.840.10045.4.3.2" | "2.16.840.1.101.3.4.3.2" => {
            Some("SHA256")
        }
        "1.2.840.113549.1.1.12" | "1.2.840.10045.4.3.3" => Some("SHA384"),
        "1.2.840.113549.1.1.13" | "1.2.840.10045.4.3.4" => Some("SHA512"),
        _ => None,
    }
}

/// Heuristic DV/OV/EV classification from subject attributes (no policy
/// OIDs): an organization plus a serialNumber attribute reads as EV, an
/// organization alone as OV, neither as DV.
fn validation_type(cert: &X509Certificate<'_>) -> &'static str {
    let subject = cert.subject();
    let has_org = subject.iter_organization().next().is_some();
    let mut has_serial_attr = false;
    for rdn in subject.iter() {
        for attr in rdn.iter() {
            if attr.attr_type().to_id_string() == OID_ATTR_SERIALNUMBER {
                has_serial_attr = true;
            }
        }
    }
    if has_org && has_serial_attr {
        "Extended Validation"
    } else if has_org {
        "Organization Validation"
    } else {
        "Domain Validation"
    }
}

fn general_name_string(name: &GeneralName<'_>) -> String {
    match name {
        GeneralName::RFC822Name(v) => (*v).to_string(),
        GeneralName::DNSName(v) => (*v).to_string(),
        GeneralName::URI(v) => (*v).to_string(),
        GeneralName::DirectoryName(n) => n.to_string(),
        GeneralName::IPAddress(bytes) => format_ip(bytes),
        GeneralName::RegisteredID(oid) | GeneralName::OtherName(oid, _) => oid.to_id_string(),
        _ => "<unsupported>".to_string(),
    }
}

fn format_ip(bytes: &[u8]) -> String {
    match bytes.len() {
        4 => Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]).to_string(),
        16 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(bytes);
            Ipv6Addr::from(octets).to_string()
        }
        _ => hex_lower(bytes),
    }
}

fn hex_lower(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}
