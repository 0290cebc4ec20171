use std::sync::Arc;

use clash8_core::crypto::{CryptoProvider, SessionKey};
use clash8_core::keys::{standard_keypair, STANDARD_PUBLIC_KEY, SUPERCELL_PUBLIC_KEY};
use clash8_core::session::{CryptoSession, Direction, NonceKind, SessionError, SessionState};

use crate::SodiumCryptoProvider;

#[tokio::test]
async fn random_bytes_changes_buffer() {
    let p = SodiumCryptoProvider::new();
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];

    p.random_bytes(&mut a).await.unwrap();
    p.random_bytes(&mut b).await.unwrap();

    assert_ne!(a, [0u8; 32]);
    assert_ne!(b, [0u8; 32]);
    assert_ne!(a, b);
}

#[tokio::test]
async fn box_round_trip_and_tamper() {
    let p = SodiumCryptoProvider::new();

    let alice = p.box_keypair().await.unwrap();
    let bob = p.box_keypair().await.unwrap();
    let nonce = p.blake2b_24(b"nonce seed").await.unwrap();

    let msg = b"login payload";
    let c = p
        .box_seal(msg, &nonce, &alice.secret, &bob.public)
        .await
        .unwrap();
    assert_eq!(c.len(), msg.len() + 16);

    let m = p
        .box_open(&c, &nonce, &bob.secret, &alice.public)
        .await
        .unwrap();
    assert_eq!(m, msg);

    let mut tampered = c.clone();
    tampered[0] ^= 0x01;
    assert!(p
        .box_open(&tampered, &nonce, &bob.secret, &alice.public)
        .await
        .is_err());

    // Short input cannot even carry a MAC.
    assert!(p
        .box_open(&c[..8], &nonce, &bob.secret, &alice.public)
        .await
        .is_err());
}

#[tokio::test]
async fn secretbox_round_trip_wrong_nonce_and_tamper() {
    let p = SodiumCryptoProvider::new();

    let key = SessionKey([7u8; 32]);
    let nonce = p.blake2b_24(b"bulk nonce").await.unwrap();

    let msg = b"bulk traffic";
    let c = p.secretbox_seal(msg, &nonce, &key).await.unwrap();
    assert_eq!(c.len(), msg.len() + 16);

    let m = p.secretbox_open(&c, &nonce, &key).await.unwrap();
    assert_eq!(m, msg);

    let other_nonce = p.blake2b_24(b"other nonce").await.unwrap();
    assert!(p.secretbox_open(&c, &other_nonce, &key).await.is_err());

    let mut tampered = c.clone();
    tampered[4] ^= 0x01;
    assert!(p.secretbox_open(&tampered, &nonce, &key).await.is_err());
}

#[tokio::test]
async fn blake2b_24_is_deterministic() {
    let p = SodiumCryptoProvider::new();

    let a = p.blake2b_24(b"hello").await.unwrap();
    let b = p.blake2b_24(b"hello").await.unwrap();
    let c = p.blake2b_24(b"hell0").await.unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

// The standard custom-server keypair against the live server key: the
// hashing nonce must be the Blake2b of client_pk || server_pk.
#[tokio::test]
async fn standard_keypair_blake_nonce_derivation() {
    let crypto = Arc::new(SodiumCryptoProvider::new());

    let mut session =
        CryptoSession::new(Direction::Client, standard_keypair(), crypto.clone());
    session.update_shared_key(&SUPERCELL_PUBLIC_KEY).await.unwrap();

    assert_eq!(session.state(), SessionState::InitialKey);

    let mut material = Vec::with_capacity(64);
    material.extend_from_slice(&STANDARD_PUBLIC_KEY);
    material.extend_from_slice(&SUPERCELL_PUBLIC_KEY);
    let expected = crypto.blake2b_24(&material).await.unwrap();

    assert_eq!(session.blake_nonce(), Some(&expected));
}

async fn session_pair(
    crypto: &Arc<SodiumCryptoProvider>,
) -> (CryptoSession, CryptoSession) {
    let client = CryptoSession::generate(Direction::Client, crypto.clone())
        .await
        .unwrap();
    let server = CryptoSession::generate(Direction::Server, crypto.clone())
        .await
        .unwrap();
    (client, server)
}

// The full handshake on real crypto: static key exchange, blake re-nonce
// from the session nonce, crossed counter nonces, derived key, ordered
// bulk traffic.
#[tokio::test]
async fn full_handshake_to_bulk_traffic() {
    let crypto = Arc::new(SodiumCryptoProvider::new());
    let (mut client, mut server) = session_pair(&crypto).await;

    let client_pk = *client.public_key();
    let server_pk = *server.public_key();
    client.update_shared_key(&server_pk).await.unwrap();
    server.update_shared_key(&client_pk).await.unwrap();
    assert_eq!(client.blake_nonce(), server.blake_nonce());

    let hello = client.encrypt(b"hello").await.unwrap();
    assert_eq!(server.decrypt(&hello).await.unwrap(), b"hello");

    // Zero-byte plaintext is legal handshake traffic.
    let empty = client.encrypt(b"").await.unwrap();
    assert!(server.decrypt(&empty).await.unwrap().is_empty());

    let mut snonce = [0u8; 24];
    crypto.random_bytes(&mut snonce).await.unwrap();
    client.update_nonce(&snonce, NonceKind::Blake).await.unwrap();
    server.update_nonce(&snonce, NonceKind::Blake).await.unwrap();
    assert_eq!(client.state(), SessionState::BlakeNonce);
    assert_eq!(client.blake_nonce(), server.blake_nonce());

    let mut rnonce = [0u8; 24];
    let mut key = [0u8; 32];
    crypto.random_bytes(&mut rnonce).await.unwrap();
    crypto.random_bytes(&mut key).await.unwrap();

    client.update_nonce(&snonce, NonceKind::Encrypt).await.unwrap();
    client.update_nonce(&rnonce, NonceKind::Decrypt).await.unwrap();
    server.update_nonce(&rnonce, NonceKind::Encrypt).await.unwrap();
    server.update_nonce(&snonce, NonceKind::Decrypt).await.unwrap();
    client.update_shared_key(&key).await.unwrap();
    server.update_shared_key(&key).await.unwrap();

    assert_eq!(client.state(), SessionState::SecondKey);
    assert_eq!(server.state(), SessionState::SecondKey);

    let messages: [&[u8]; 3] = [b"first turn", b"second turn", b"third turn"];
    let mut cts = Vec::new();
    for m in messages {
        cts.push(client.encrypt(m).await.unwrap());
    }
    for (m, ct) in messages.iter().zip(&cts) {
        assert_eq!(&server.decrypt(ct).await.unwrap(), m);
    }

    let ack = server.encrypt(b"server ack").await.unwrap();
    assert_eq!(client.decrypt(&ack).await.unwrap(), b"server ack");
}

#[tokio::test]
async fn out_of_order_bulk_decrypt_fails() {
    let crypto = Arc::new(SodiumCryptoProvider::new());
    let (mut client, mut server) = session_pair(&crypto).await;

    let client_pk = *client.public_key();
    let server_pk = *server.public_key();
    client.update_shared_key(&server_pk).await.unwrap();
    server.update_shared_key(&client_pk).await.unwrap();

    let snonce = [5u8; 24];
    let rnonce = [6u8; 24];
    let key = [9u8; 32];
    client.update_nonce(&snonce, NonceKind::Encrypt).await.unwrap();
    client.update_nonce(&rnonce, NonceKind::Decrypt).await.unwrap();
    server.update_nonce(&rnonce, NonceKind::Encrypt).await.unwrap();
    server.update_nonce(&snonce, NonceKind::Decrypt).await.unwrap();
    client.update_shared_key(&key).await.unwrap();
    server.update_shared_key(&key).await.unwrap();

    let m1 = client.encrypt(b"one").await.unwrap();
    let m2 = client.encrypt(b"two").await.unwrap();

    // Skipping m1 desynchronizes the counter; neither ciphertext can
    // ever authenticate again.
    assert!(matches!(
        server.decrypt(&m2).await.unwrap_err(),
        SessionError::AuthFailure
    ));
    assert!(matches!(
        server.decrypt(&m1).await.unwrap_err(),
        SessionError::AuthFailure
    ));
}
