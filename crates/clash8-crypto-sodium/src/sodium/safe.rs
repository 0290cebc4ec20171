use clash8_core::crypto::{BoxKeypair, CryptoError, Nonce24, SessionKey, KEY_LEN, MAC_LEN};

use super::ffi;

pub(crate) fn sodium_init() -> Result<(), CryptoError> {
    let rc = ffi::sodium_init();
    if rc < 0 {
        return Err(CryptoError::RngFailure);
    }
    Ok(())
}

pub(crate) fn random_bytes(out: &mut [u8]) -> Result<(), CryptoError> {
    if out.is_empty() {
        return Ok(());
    }
    ffi::randombytes_buf(out.as_mut_ptr(), out.len());
    Ok(())
}

pub(crate) fn box_keypair() -> Result<BoxKeypair, CryptoError> {
    let mut pk = [0u8; KEY_LEN];
    let mut sk = [0u8; KEY_LEN];

    let rc = ffi::box_keypair(pk.as_mut_ptr(), sk.as_mut_ptr());
    if rc != 0 {
        return Err(CryptoError::KeypairFailure);
    }

    Ok(BoxKeypair {
        public: pk,
        secret: sk,
    })
}

pub(crate) fn box_seal(
    plaintext: &[u8],
    nonce: &Nonce24,
    my_secret: &[u8; 32],
    peer_public: &[u8; 32],
) -> Result<Vec<u8>, CryptoError> {
    // combined form: 16-byte MAC followed by the ciphertext
    let mut c = vec![0u8; plaintext.len() + MAC_LEN];

    let rc = ffi::box_easy(
        c.as_mut_ptr(),
        plaintext.as_ptr(),
        plaintext.len() as u64,
        nonce.0.as_ptr(),
        peer_public.as_ptr(),
        my_secret.as_ptr(),
    );

    if rc != 0 {
        return Err(CryptoError::EncryptFailure);
    }

    Ok(c)
}

pub(crate) fn box_open(
    ciphertext: &[u8],
    nonce: &Nonce24,
    my_secret: &[u8; 32],
    peer_public: &[u8; 32],
) -> Result<Vec<u8>, CryptoError> {
    if ciphertext.len() < MAC_LEN {
        return Err(CryptoError::DecryptFailure);
    }
    let mut m = vec![0u8; ciphertext.len() - MAC_LEN];

    let rc = ffi::box_open_easy(
        m.as_mut_ptr(),
        ciphertext.as_ptr(),
        ciphertext.len() as u64,
        nonce.0.as_ptr(),
        peer_public.as_ptr(),
        my_secret.as_ptr(),
    );

    if rc != 0 {
        return Err(CryptoError::DecryptFailure);
    }

    Ok(m)
}

pub(crate) fn secretbox_seal(
    plaintext: &[u8],
    nonce: &Nonce24,
    key: &SessionKey,
) -> Result<Vec<u8>, CryptoError> {
    let mut c = vec![0u8; plaintext.len() + MAC_LEN];

    let rc = ffi::secretbox_easy(
        c.as_mut_ptr(),
        plaintext.as_ptr(),
        plaintext.len() as u64,
        nonce.0.as_ptr(),
        key.0.as_ptr(),
    );

    if rc != 0 {
        return Err(CryptoError::EncryptFailure);
    }

    Ok(c)
}

pub(crate) fn secretbox_open(
    ciphertext: &[u8],
    nonce: &Nonce24,
    key: &SessionKey,
) -> Result<Vec<u8>, CryptoError> {
    if ciphertext.len() < MAC_LEN {
        return Err(CryptoError::DecryptFailure);
    }
    let mut m = vec![0u8; ciphertext.len() - MAC_LEN];

    let rc = ffi::secretbox_open_easy(
        m.as_mut_ptr(),
        ciphertext.as_ptr(),
        ciphertext.len() as u64,
        nonce.0.as_ptr(),
        key.0.as_ptr(),
    );

    if rc != 0 {
        return Err(CryptoError::DecryptFailure);
    }

    Ok(m)
}

pub(crate) fn blake2b_24(data: &[u8]) -> Result<Nonce24, CryptoError> {
    let mut out = [0u8; 24];

    let rc = ffi::generichash(
        out.as_mut_ptr(),
        out.len(),
        data.as_ptr(),
        data.len() as u64,
        std::ptr::null(),
        0,
    );
    if rc != 0 {
        return Err(CryptoError::HashFailure);
    }

    Ok(Nonce24(out))
}
