//! Subresource-Integrity checks for the chart style asset.
//!
//! Metadata is one or more whitespace-separated `<alg>-<base64 digest>`
//! tokens. As in browsers, only tokens of the strongest algorithm present
//! are considered, and the asset passes if any of them matches.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256, Sha384, Sha512};

use super::LoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Algorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl Algorithm {
    fn digest(self, bytes: &[u8]) -> Vec<u8> {
        match self {
            Algorithm::Sha256 => Sha256::digest(bytes).to_vec(),
            Algorithm::Sha384 => Sha384::digest(bytes).to_vec(),
            Algorithm::Sha512 => Sha512::digest(bytes).to_vec(),
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha384 => "sha384",
            Algorithm::Sha512 => "sha512",
        }
    }
}

/// Parsed integrity metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Integrity {
    hashes: Vec<(Algorithm, Vec<u8>)>,
}

impl FromStr for Integrity {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut hashes = Vec::new();

        for token in s.split_whitespace() {
            let (alg, digest) = token
                .split_once('-')
                .ok_or_else(|| LoadError::BadIntegrity(token.to_string()))?;
            let alg = match alg {
                "sha256" => Algorithm::Sha256,
                "sha384" => Algorithm::Sha384,
                "sha512" => Algorithm::Sha512,
                _ => return Err(LoadError::BadIntegrity(token.to_string())),
            };
            // Options after '?' are reserved and ignored.
            let digest = digest.split('?').next().unwrap_or_default();
            let digest = STANDARD
                .decode(digest)
                .map_err(|_| LoadError::BadIntegrity(token.to_string()))?;
            hashes.push((alg, digest));
        }

        if hashes.is_empty() {
            return Err(LoadError::BadIntegrity(s.to_string()));
        }
        Ok(Self { hashes })
    }
}

impl fmt::Display for Integrity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<String> = self
            .hashes
            .iter()
            .map(|(alg, digest)| format!("{}-{}", alg.prefix(), STANDARD.encode(digest)))
            .collect();
        write!(f, "{}", tokens.join(" "))
    }
}

impl Integrity {
    /// Check `bytes` against the strongest algorithm listed.
    pub fn verify(&self, bytes: &[u8]) -> Result<(), LoadError> {
        let Some(strongest) = self.hashes.iter().map(|(alg, _)| *alg).max() else {
            return Err(LoadError::IntegrityMismatch);
        };

        let actual = strongest.digest(bytes);
        let matched = self
            .hashes
            .iter()
            .filter(|(alg, _)| *alg == strongest)
            .any(|(_, expected)| *expected == actual);

        if matched {
            Ok(())
        } else {
            Err(LoadError::IntegrityMismatch)
        }
    }
}
