//! Private key preparation.
//!
//! Turns PEM text into a typed private key a signer can dispatch on.
use crate::{
    error::{Error, Result},
    pem,
};
use openssl::{
    ec::EcKey,
    pkey::{Id, PKey, Private},
    rsa::Rsa,
};

/// A private key decoded from PKCS#8, one variant per supported algorithm.
#[derive(Debug, Clone)]
pub enum KeyMaterial {
    Rsa(Rsa<Private>),
    Ec(EcKey<Private>),
    Ed25519(PKey<Private>),
}

impl KeyMaterial {
    /// Parse a DER encoded, unencrypted PKCS#8 `PrivateKeyInfo`.
    pub fn from_pkcs8_der(der: &[u8]) -> Result<Self> {
        let pkey = PKey::private_key_from_pkcs8(der)?;
        let id = pkey.id();
        if id == Id::RSA {
            Ok(KeyMaterial::Rsa(pkey.rsa()?))
        } else if id == Id::EC {
            Ok(KeyMaterial::Ec(pkey.ec_key()?))
        } else if id == Id::ED25519 {
            Ok(KeyMaterial::Ed25519(pkey))
        } else {
            Err(Error::UnsupportedKey(format!(
                "OpenSSL key type {}",
                id.as_raw()
            )))
        }
    }

    /// Short name of the key algorithm.
    pub fn algorithm(&self) -> &'static str {
        match self {
            KeyMaterial::Rsa(_) => "RSA",
            KeyMaterial::Ec(_) => "EC",
            KeyMaterial::Ed25519(_) => "Ed25519",
        }
    }

    /// Wrap the key back up as a [PKey] for signers that take one.
    pub fn to_pkey(&self) -> Result<PKey<Private>> {
        let pkey = match self {
            KeyMaterial::Rsa(rsa) => PKey::from_rsa(rsa.clone())?,
            KeyMaterial::Ec(ec) => PKey::from_ec_key(ec.clone())?,
            KeyMaterial::Ed25519(pkey) => pkey.clone(),
        };
        Ok(pkey)
    }
}

/// Decode PEM encoded PKCS#8 private key bytes into a [KeyMaterial].
///
/// `None` means the caller had no key at all and is reported as missing
/// input. An empty slice isn't special cased, it fails like any other input
/// without a PEM block.
#[tracing::instrument(level = "debug", skip(pem_bytes), fields(present = pem_bytes.is_some()))]
pub fn prepare_pkcs8_private_key(pem_bytes: Option<&[u8]>) -> Result<KeyMaterial> {
    let pem_bytes =
        pem_bytes.ok_or_else(|| Error::Input("no private key bytes provided".into()))?;
    let block = pem::decode_first(pem_bytes)?;
    let key = KeyMaterial::from_pkcs8_der(&block.contents)?;
    tracing::debug!(label = %block.label, algorithm = key.algorithm(), "Prepared private key");
    Ok(key)
}

#[cfg(test)]
mod test {
    use super::*;
    use openssl::{ec::EcGroup, nid::Nid, symm::Cipher};
    use pkcs8::der::pem::{self, LineEnding};

    fn rsa_key() -> PKey<Private> {
        PKey::from_rsa(Rsa::generate(2048).unwrap()).unwrap()
    }

    fn ec_key() -> PKey<Private> {
        let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
        PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap()
    }

    fn pem_wrap(label: &str, der: &[u8]) -> Vec<u8> {
        pem::encode_string(label, LineEnding::LF, der)
            .unwrap()
            .into_bytes()
    }

    #[test]
    fn test_prepare_rsa_key() {
        let original = rsa_key();
        let pem = original.private_key_to_pem_pkcs8().unwrap();
        let key = prepare_pkcs8_private_key(Some(pem.as_slice())).unwrap();
        assert!(matches!(key, KeyMaterial::Rsa(_)));
        assert_eq!(key.algorithm(), "RSA");
        assert!(key.to_pkey().unwrap().public_eq(&original));
    }

    #[test]
    fn test_prepare_ec_key() {
        let original = ec_key();
        let pem = original.private_key_to_pem_pkcs8().unwrap();
        let key = prepare_pkcs8_private_key(Some(pem.as_slice())).unwrap();
        match &key {
            KeyMaterial::Ec(ec) => ec.check_key().unwrap(),
            other => panic!("Expected an EC key, got {}", other.algorithm()),
        }
        assert!(key.to_pkey().unwrap().public_eq(&original));
    }

    #[test]
    fn test_prepare_ed25519_key() {
        let original = PKey::generate_ed25519().unwrap();
        let pem = original.private_key_to_pem_pkcs8().unwrap();
        let key = prepare_pkcs8_private_key(Some(pem.as_slice())).unwrap();
        assert_eq!(key.algorithm(), "Ed25519");
        assert!(key.to_pkey().unwrap().public_eq(&original));
    }

    #[test]
    fn test_key_with_surrounding_text() {
        let mut pem = b"Subject: test key\n".to_vec();
        pem.extend(ec_key().private_key_to_pem_pkcs8().unwrap());
        pem.extend_from_slice(b"\nthe end\n");
        let key = prepare_pkcs8_private_key(Some(pem.as_slice())).unwrap();
        assert_eq!(key.algorithm(), "EC");
    }

    #[test]
    fn test_missing_input() {
        let err = prepare_pkcs8_private_key(None).unwrap_err();
        assert!(matches!(err, Error::Input(_)), "{:?}", err);
    }

    #[test]
    fn test_empty_input_fails_at_pem_decode() {
        let err = prepare_pkcs8_private_key(Some(&b""[..])).unwrap_err();
        assert!(err.is_parse(), "{:?}", err);
    }

    #[test]
    fn test_not_pem() {
        let der = rsa_key().private_key_to_pkcs8().unwrap();
        let err = prepare_pkcs8_private_key(Some(der.as_slice())).unwrap_err();
        assert!(err.is_parse(), "{:?}", err);
    }

    #[test]
    fn test_truncated_pem() {
        let pem = rsa_key().private_key_to_pem_pkcs8().unwrap();
        let err = prepare_pkcs8_private_key(Some(&pem[..pem.len() / 2])).unwrap_err();
        assert!(err.is_parse(), "{:?}", err);
    }

    #[test]
    fn test_truncated_der() {
        let der = ec_key().private_key_to_pkcs8().unwrap();
        let pem = pem_wrap("PRIVATE KEY", &der[..der.len() / 2]);
        let err = prepare_pkcs8_private_key(Some(pem.as_slice())).unwrap_err();
        assert!(err.is_key_format(), "{:?}", err);
    }

    #[test]
    fn test_pkcs1_is_not_pkcs8() {
        let rsa = Rsa::generate(2048).unwrap();
        let pem = rsa.private_key_to_pem().unwrap();
        let err = prepare_pkcs8_private_key(Some(pem.as_slice())).unwrap_err();
        assert!(err.is_key_format(), "{:?}", err);
    }

    #[test]
    fn test_encrypted_pkcs8_is_rejected() {
        let pem = rsa_key()
            .private_key_to_pem_pkcs8_passphrase(Cipher::aes_256_cbc(), b"secret")
            .unwrap();
        let err = prepare_pkcs8_private_key(Some(pem.as_slice())).unwrap_err();
        assert!(err.is_key_format(), "{:?}", err);
    }

    #[test]
    fn test_unsupported_algorithm() {
        let pem = PKey::generate_x25519()
            .unwrap()
            .private_key_to_pem_pkcs8()
            .unwrap();
        let err = prepare_pkcs8_private_key(Some(pem.as_slice())).unwrap_err();
        assert!(matches!(err, Error::UnsupportedKey(_)), "{:?}", err);
    }
}
