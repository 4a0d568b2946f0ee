//! SSH host key parsing

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

const ED25519_KEY_LENGTH: usize = 32;

/// Host key announced by a sandbox, used to pre-fill `known_hosts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshHostKey {
    pub algorithm: String,
    /// Base64 of the key in SSH wire format
    pub fingerprint: String,
}

/// Layout of the wire-format public key of each supported algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyLayout {
    /// `e`, `n`
    Rsa,
    /// `p`, `q`, `g`, `y`
    Dsa,
    /// Curve name, uncompressed point
    Ecdsa { curve: &'static str, point_length: usize },
    /// 32 byte key
    Ed25519,
    /// Curve name, uncompressed point, application
    SecurityKeyEcdsa,
    /// 32 byte key, application
    SecurityKeyEd25519,
}

fn key_layout(algorithm: &str) -> Option<KeyLayout> {
    let layout = match algorithm {
        "ssh-rsa" => KeyLayout::Rsa,
        "ssh-dss" => KeyLayout::Dsa,
        "ecdsa-sha2-nistp256" => KeyLayout::Ecdsa {
            curve: "nistp256",
            point_length: 65,
        },
        "ecdsa-sha2-nistp384" => KeyLayout::Ecdsa {
            curve: "nistp384",
            point_length: 97,
        },
        "ecdsa-sha2-nistp521" => KeyLayout::Ecdsa {
            curve: "nistp521",
            point_length: 133,
        },
        "ssh-ed25519" => KeyLayout::Ed25519,
        "sk-ecdsa-sha2-nistp256@openssh.com" => KeyLayout::SecurityKeyEcdsa,
        "sk-ssh-ed25519@openssh.com" => KeyLayout::SecurityKeyEd25519,
        _ => return None,
    };

    Some(layout)
}

/// Parse concatenated `algorithm base64key comment` records
/// (OpenSSH authorized_keys format).
///
/// Blank lines and `#` comments are skipped. Parsing stops at the first
/// malformed record.
pub fn parse_ssh_host_keys(content: &str) -> Result<Vec<SshHostKey>> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse_ssh_host_key)
        .collect()
}

fn parse_ssh_host_key(line: &str) -> Result<SshHostKey> {
    let invalid = |reason: &str| Error::InvalidSshHostKey {
        line: line.to_string(),
        reason: reason.to_string(),
    };

    let mut fields = line.split_whitespace();
    let algorithm = fields.next().ok_or_else(|| invalid("missing algorithm"))?;
    let encoded = fields.next().ok_or_else(|| invalid("missing key material"))?;

    let layout = key_layout(algorithm).ok_or_else(|| invalid("unsupported key algorithm"))?;

    let key = STANDARD
        .decode(encoded)
        .map_err(|e| invalid(&format!("key material is not base64: {}", e)))?;

    let wire_fields = split_wire_fields(&key).ok_or_else(|| invalid("truncated key material"))?;

    let Some((key_type, key_fields)) = wire_fields.split_first() else {
        return Err(invalid("missing public key"));
    };

    if *key_type != algorithm.as_bytes() {
        return Err(invalid("key type does not match the declared algorithm"));
    }

    check_key_fields(layout, key_fields).map_err(invalid)?;

    Ok(SshHostKey {
        algorithm: algorithm.to_string(),
        fingerprint: STANDARD.encode(&key),
    })
}

/// Check the fields following the key type against the algorithm layout
fn check_key_fields(layout: KeyLayout, fields: &[&[u8]]) -> std::result::Result<(), &'static str> {
    match (layout, fields) {
        (KeyLayout::Rsa, [exponent, modulus]) => {
            check_rsa_exponent(exponent)?;
            if is_zero_mpint(modulus) {
                return Err("RSA modulus is empty");
            }
            Ok(())
        }
        (KeyLayout::Dsa, [p, q, g, y]) => {
            if [p, q, g, y].into_iter().any(|value| is_zero_mpint(value)) {
                return Err("DSA parameter is empty");
            }
            Ok(())
        }
        (KeyLayout::Ecdsa { curve, point_length }, [key_curve, point]) => {
            if *key_curve != curve.as_bytes() {
                return Err("curve does not match the declared algorithm");
            }
            check_ecdsa_point(point, point_length)
        }
        (KeyLayout::SecurityKeyEcdsa, [key_curve, point, _application]) => {
            if *key_curve != b"nistp256" {
                return Err("curve does not match the declared algorithm");
            }
            check_ecdsa_point(point, 65)
        }
        (KeyLayout::Ed25519, [key]) | (KeyLayout::SecurityKeyEd25519, [key, _]) => {
            if key.len() != ED25519_KEY_LENGTH {
                return Err("ed25519 key must be 32 bytes long");
            }
            Ok(())
        }
        _ => Err("unexpected number of key fields"),
    }
}

fn check_rsa_exponent(exponent: &[u8]) -> std::result::Result<(), &'static str> {
    let significant = strip_leading_zeros(exponent);

    if significant.len() > 3 {
        return Err("RSA exponent too large");
    }

    let value = significant
        .iter()
        .fold(0u32, |acc, byte| (acc << 8) | u32::from(*byte));

    if value < 3 || value % 2 == 0 {
        return Err("incorrect RSA exponent");
    }

    Ok(())
}

/// Uncompressed SEC1 point: `0x04 || x || y`
fn check_ecdsa_point(point: &[u8], point_length: usize) -> std::result::Result<(), &'static str> {
    if point.len() != point_length || point.first() != Some(&0x04) {
        return Err("invalid ECDSA public point");
    }
    Ok(())
}

fn strip_leading_zeros(mpint: &[u8]) -> &[u8] {
    let start = mpint.iter().position(|byte| *byte != 0).unwrap_or(mpint.len());
    &mpint[start..]
}

fn is_zero_mpint(mpint: &[u8]) -> bool {
    strip_leading_zeros(mpint).is_empty()
}

/// Split an SSH wire-format blob into its length-prefixed fields
fn split_wire_fields(mut blob: &[u8]) -> Option<Vec<&[u8]>> {
    let mut fields = Vec::new();

    while !blob.is_empty() {
        let (len, rest) = blob.split_first_chunk::<4>()?;
        let len = u32::from_be_bytes(*len) as usize;

        if rest.len() < len {
            return None;
        }

        let (field, rest) = rest.split_at(len);
        fields.push(field);
        blob = rest;
    }

    Some(fields)
}
