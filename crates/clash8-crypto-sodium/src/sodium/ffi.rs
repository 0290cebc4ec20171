//! Unsafe FFI calls into libsodium.
//!
//! Policy: This is the only module allowed to use `unsafe` in this crate.

use libsodium_sys as sodium;
use std::os::raw::{c_int, c_uchar, c_ulonglong};

pub(crate) fn sodium_init() -> c_int {
    unsafe { sodium::sodium_init() }
}

pub(crate) fn randombytes_buf(buf: *mut c_uchar, size: usize) {
    unsafe { sodium::randombytes_buf(buf as *mut _, size) }
}

// --- Curve25519 box ---
pub(crate) fn box_keypair(pk: *mut c_uchar, sk: *mut c_uchar) -> c_int {
    unsafe { sodium::crypto_box_keypair(pk as *mut _, sk as *mut _) }
}

pub(crate) fn box_easy(
    c: *mut c_uchar,
    m: *const c_uchar,
    mlen: c_ulonglong,
    n: *const c_uchar,
    pk: *const c_uchar,
    sk: *const c_uchar,
) -> c_int {
    unsafe {
        sodium::crypto_box_easy(
            c as *mut _,
            m as *const _,
            mlen,
            n as *const _,
            pk as *const _,
            sk as *const _,
        )
    }
}

pub(crate) fn box_open_easy(
    m: *mut c_uchar,
    c: *const c_uchar,
    clen: c_ulonglong,
    n: *const c_uchar,
    pk: *const c_uchar,
    sk: *const c_uchar,
) -> c_int {
    unsafe {
        sodium::crypto_box_open_easy(
            m as *mut _,
            c as *const _,
            clen,
            n as *const _,
            pk as *const _,
            sk as *const _,
        )
    }
}

// --- XSalsa20-Poly1305 secretbox ---
pub(crate) fn secretbox_easy(
    c: *mut c_uchar,
    m: *const c_uchar,
    mlen: c_ulonglong,
    n: *const c_uchar,
    k: *const c_uchar,
) -> c_int {
    unsafe {
        sodium::crypto_secretbox_easy(c as *mut _, m as *const _, mlen, n as *const _, k as *const _)
    }
}

pub(crate) fn secretbox_open_easy(
    m: *mut c_uchar,
    c: *const c_uchar,
    clen: c_ulonglong,
    n: *const c_uchar,
    k: *const c_uchar,
) -> c_int {
    unsafe {
        sodium::crypto_secretbox_open_easy(
            m as *mut _,
            c as *const _,
            clen,
            n as *const _,
            k as *const _,
        )
    }
}

// --- Generic hash (BLAKE2b) ---
pub(crate) fn generichash(
    out: *mut c_uchar,
    outlen: usize,
    input: *const c_uchar,
    inlen: c_ulonglong,
    key: *const c_uchar,
    keylen: usize,
) -> c_int {
    unsafe { sodium::crypto_generichash(out as *mut _, outlen, input as *const _, inlen, key as *const _, keylen) }
}
