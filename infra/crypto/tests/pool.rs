mod fixtures;

use fixtures::setup_pool;
use lockbox_crypto::prelude::*;
use std::sync::Barrier;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn capacity_one_rejects_second_borrow_until_release() {
    let pool = setup_pool(1);

    let h1 = pool.borrow(CipherMode::Encrypt).unwrap();
    let h1_id = h1.id();

    let err = pool.borrow(CipherMode::Encrypt).unwrap_err();
    assert!(matches!(err, CryptoError::PoolExhausted { in_use: 1, capacity: 1, .. }));

    pool.release(h1).unwrap();

    let h3 = pool.borrow(CipherMode::Encrypt).unwrap();
    assert_eq!(h3.id(), h1_id, "the idle handle is recycled");
    pool.release(h3).unwrap();
}

#[test]
fn nth_plus_one_borrow_fails() {
    let pool = setup_pool(4);
    let held: Vec<_> = (0..4).map(|_| pool.borrow(CipherMode::Decrypt).unwrap()).collect();

    assert!(matches!(pool.borrow(CipherMode::Decrypt), Err(CryptoError::PoolExhausted { .. })));

    for handle in held {
        pool.release(handle).unwrap();
    }
    assert_eq!(pool.in_use(), 0);
    assert_eq!(pool.available(), 4);
}

#[test]
fn foreign_handle_is_not_owned() {
    let a = setup_pool(2);
    let b = setup_pool(2);

    let handle = a.borrow(CipherMode::Encrypt).unwrap();
    let err = b.release(handle).unwrap_err();

    assert!(matches!(err, CryptoError::NotOwned { .. }));
    assert_eq!(b.available(), 0);
}

#[test]
fn concurrent_borrows_never_exceed_capacity() {
    const THREADS: usize = 100;
    const CAPACITY: usize = 10;

    let pool = setup_pool(CAPACITY);
    let barrier = Barrier::new(THREADS);
    let granted = AtomicUsize::new(0);

    std::thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                let handle = pool.borrow(CipherMode::Encrypt).ok();
                if handle.is_some() {
                    granted.fetch_add(1, Ordering::SeqCst);
                }
                // Hold every granted handle until all threads have tried.
                barrier.wait();
                if let Some(handle) = handle {
                    pool.release(handle).unwrap();
                }
            });
        }
    });

    assert_eq!(granted.load(Ordering::SeqCst), CAPACITY);
    assert_eq!(pool.in_use(), 0);
    assert_eq!(pool.available(), CAPACITY);
}
