//! Behavior against the host libcrypto. Every test skips when none loads.

use std::cmp::Ordering;

use bnlink::{BigNum, BnCtx, BnError, MontCtx};

macro_rules! require_libcrypto {
    () => {
        if let Err(err) = bnlink::init() {
            eprintln!("Skipping: no usable libcrypto ({err})");
            return;
        }
    };
}

fn n(value: u64) -> BigNum {
    BigNum::from_u64(value).expect("alloc")
}

#[test]
fn arithmetic_matches_u64() {
    require_libcrypto!();
    let ctx = BnCtx::new().unwrap();
    let (a, b) = (n(1_000_003), n(97));
    let mut r = BigNum::new().unwrap();

    r.add(&a, &b).unwrap();
    assert_eq!(r.to_u64(), 1_000_100);
    r.sub(&a, &b).unwrap();
    assert_eq!(r.to_u64(), 999_906);
    r.mul(&a, &b, &ctx).unwrap();
    assert_eq!(r.to_u64(), 97_000_291);
    r.div(&a, &b, &ctx).unwrap();
    assert_eq!(r.to_u64(), 1_000_003 / 97);
    r.modulo(&a, &b, &ctx).unwrap();
    assert_eq!(r.to_u64(), 1_000_003 % 97);
    r.exp(&n(3), &n(5), &ctx).unwrap();
    assert_eq!(r.to_u64(), 243);
}

#[test]
fn modulo_edge_cases() {
    require_libcrypto!();
    let ctx = BnCtx::new().unwrap();
    let mut r = BigNum::new().unwrap();
    r.modulo(&n(5), &n(7), &ctx).unwrap();
    assert_eq!(r.to_u64(), 5);
    r.modulo(&n(7), &n(7), &ctx).unwrap();
    assert_eq!(r.to_u64(), 0);
    r.modulo(&n(21), &n(7), &ctx).unwrap();
    assert_eq!(r.to_u64(), 0);

    match r.modulo(&n(21), &n(0), &ctx) {
        Err(BnError::Native { operation, .. }) => assert_eq!(operation, "BN_mod"),
        other => panic!("expected BN_mod failure, got {other:?}"),
    }
}

#[test]
fn modular_operations() {
    require_libcrypto!();
    let ctx = BnCtx::new().unwrap();
    let m = n(497);
    let mut r = BigNum::new().unwrap();

    r.mod_exp(&n(4), &n(13), &m, &ctx).unwrap();
    assert_eq!(r.to_u64(), 445);

    r.mod_exp_mont(&n(4), &n(13), &m, &ctx, None).unwrap();
    assert_eq!(r.to_u64(), 445);

    let mut mont = MontCtx::new().unwrap();
    mont.set(&m, &ctx).unwrap();
    r.mod_exp_mont(&n(4), &n(13), &m, &ctx, Some(&mont)).unwrap();
    assert_eq!(r.to_u64(), 445);

    r.mod_mul(&n(400), &n(300), &m, &ctx).unwrap();
    assert_eq!(r.to_u64(), 400 * 300 % 497);

    r.mod_inverse(&n(3), &n(11), &ctx).unwrap();
    assert_eq!(r.to_u64(), 4);
    assert!(r.mod_inverse(&n(4), &n(8), &ctx).is_err());
}

#[test]
fn montgomery_product_round_trips_through_one() {
    require_libcrypto!();
    let ctx = BnCtx::new().unwrap();
    let m = n(1_000_003);
    let mut mont = MontCtx::new().unwrap();
    mont.set(&m, &ctx).unwrap();

    // Mont(x, R^2 mod m) = x * R mod m; Mont(that, 1) = x.
    let mut r_squared = BigNum::new().unwrap();
    let mut r = BigNum::new().unwrap();
    r.lshift(BigNum::one().unwrap(), 64).unwrap();
    r_squared.mod_mul(&r, &r, &m, &ctx).unwrap();

    let mut to_mont = BigNum::new().unwrap();
    to_mont.mod_mul_montgomery(&n(12345), &r_squared, &mont, &ctx).unwrap();
    let mut back = BigNum::new().unwrap();
    back.mod_mul_montgomery(&to_mont, BigNum::one().unwrap(), &mont, &ctx).unwrap();
    assert_eq!(back.to_u64(), 12345);
}

#[test]
fn text_forms() {
    require_libcrypto!();
    let v: BigNum = "123456789012345678901234567890".parse().unwrap();
    assert_eq!(v.to_string(), "123456789012345678901234567890");
    assert_eq!(v.to_dec_string().unwrap(), "123456789012345678901234567890");

    let h: BigNum = "0xff".parse().unwrap();
    assert_eq!(h.to_u64(), 255);
    assert_eq!(h.to_hex_string().unwrap(), "FF");
    let bare: BigNum = "ff".parse().unwrap();
    assert_eq!(bare.to_u64(), 255);
    let dec_first: BigNum = "10".parse().unwrap();
    assert_eq!(dec_first.to_u64(), 10);

    assert!(matches!("0xzz".parse::<BigNum>(), Err(BnError::Native { .. })));
    assert!(matches!("12g".parse::<BigNum>(), Err(BnError::InvalidParse)));
    assert!(matches!("".parse::<BigNum>(), Err(BnError::InvalidParse)));

    let mut neg = BigNum::new().unwrap();
    neg.set_dec_str("-42").unwrap();
    assert_eq!(neg.to_string(), "-42");
    assert_eq!(format!("{neg:>5}"), "  -42");
}

#[test]
fn serde_uses_prefixed_hex() {
    require_libcrypto!();
    let v = n(0xdead_beef);
    let json = serde_json::to_string(&v).unwrap();
    assert_eq!(json, "\"0xDEADBEEF\"");
    let back: BigNum = serde_json::from_str(&json).unwrap();
    assert_eq!(back, v);
    let dec: BigNum = serde_json::from_str("\"3735928559\"").unwrap();
    assert_eq!(dec, v);
}

#[test]
fn serde_empty_string_is_zero() {
    require_libcrypto!();
    let zero: BigNum = serde_json::from_str("\"\"").unwrap();
    assert_eq!(zero, n(0));
    assert!(serde_json::from_str::<BigNum>("\"0xzz\"").is_err());
}

#[test]
fn byte_encodings() {
    require_libcrypto!();
    let v = BigNum::from_bytes(&[0x01, 0x02, 0x03]).unwrap();
    assert_eq!(v.to_u64(), 0x010203);
    assert_eq!(v.bit_len(), 17);
    assert_eq!(v.byte_len(), 3);
    assert_eq!(v.to_bytes().unwrap(), vec![0x01, 0x02, 0x03]);

    let mut padded = [0xaa; 6];
    v.fill_bytes(&mut padded).unwrap();
    assert_eq!(padded, [0, 0, 0, 0x01, 0x02, 0x03]);

    let mut short = [0u8; 2];
    assert_eq!(
        v.fill_bytes(&mut short),
        Err(BnError::BufferTooSmall {
            needed: 3,
            available: 2
        })
    );

    let zero = BigNum::new().unwrap();
    assert_eq!(zero.bit_len(), 0);
    assert!(zero.to_bytes().unwrap().is_empty());
    zero.fill_bytes(&mut []).unwrap();
}

#[test]
fn u64_conversions() {
    require_libcrypto!();
    assert_eq!(n(u64::MAX).to_u64(), u64::MAX);
    assert_eq!(n(0).to_u64(), 0);
    let mut big = BigNum::new().unwrap();
    big.lshift(&n(1), 64).unwrap();
    assert_eq!(big.bit_len(), 65);
    assert_eq!(big.to_u64(), u64::MAX);
    let mut back = BigNum::new().unwrap();
    back.rshift(&big, 1).unwrap();
    assert_eq!(back.to_u64(), 1 << 63);
}

#[test]
fn bitwise_on_magnitudes() {
    require_libcrypto!();
    let a = n(0x1234_0f0f);
    let b = n(0xf0);
    let mut r = BigNum::new().unwrap();
    r.bit_or(&a, &b).unwrap();
    assert_eq!(r.to_u64(), 0x1234_0fff);
    r.bit_and(&a, &b).unwrap();
    assert_eq!(r.to_u64(), 0);
    r.bit_and(&a, &n(0xffff)).unwrap();
    assert_eq!(r.to_u64(), 0x0f0f);
}

#[test]
fn ordering_and_equality() {
    require_libcrypto!();
    let mut neg = BigNum::new().unwrap();
    neg.set_dec_str("-5").unwrap();
    assert_eq!(n(3).cmp(&n(4)), Ordering::Less);
    assert_eq!(n(4).cmp(&n(4)), Ordering::Equal);
    assert!(neg < n(0));
    assert!(*BigNum::one().unwrap() == *n(1));

    let mut copy = BigNum::new().unwrap();
    copy.copy_from(&n(77)).unwrap();
    assert_eq!(copy, n(77));
    assert_eq!(copy.try_clone().unwrap(), n(77));

    assert!(n(77).constant_time_eq(&n(77)).unwrap());
    assert!(!n(77).constant_time_eq(&n(78)).unwrap());
    assert!(!n(0x0100).constant_time_eq(&n(0x01)).unwrap());
}

#[test]
fn primes() {
    require_libcrypto!();
    let ctx = BnCtx::new().unwrap();
    assert!(n(1_000_003).is_probably_prime(Some(&ctx)).unwrap());
    assert!(!n(1_000_001).is_probably_prime(None).unwrap());

    let p = BigNum::generate_prime(128, false, Some(&ctx)).unwrap();
    assert_eq!(p.bit_len(), 128);
    assert!(p.is_probably_prime(None).unwrap());

    let mut q = BigNum::generate_prime(64, true, None).unwrap();
    assert!(q.set_const_time().is_probably_prime(None).unwrap());
}

#[test]
fn random_values_stay_in_range() {
    require_libcrypto!();
    let range = n(1000);
    let mut r = BigNum::new().unwrap();
    for _ in 0..64 {
        r.rand_range(&range).unwrap();
        assert!(r < range);
    }
}

#[test]
fn scratch_values_live_for_the_frame() {
    require_libcrypto!();
    let ctx = BnCtx::new().unwrap();
    let frame = ctx.start();
    let mut t = frame.get().unwrap();
    let mut u = frame.get().unwrap();
    assert_eq!(t.bit_len(), 0);
    t.set_u64(6).unwrap();
    u.mul(&t, &n(7), frame.ctx()).unwrap();
    assert_eq!(u.to_u64(), 42);

    let mut kept = BigNum::new().unwrap();
    kept.copy_from(&u).unwrap();
    drop((t, u));
    frame.end();
    assert_eq!(kept.to_u64(), 42);
}

#[test]
fn version_is_reported() {
    require_libcrypto!();
    let version = bnlink::version().unwrap();
    let text = bnlink::version_text().unwrap();
    assert!(!text.is_empty());
    assert!(text.contains(&version.major().to_string()), "{text} vs {version}");
    assert!(bnlink::library_name().unwrap().starts_with("libcrypto"));
    // Cached: a second call sees the same outcome.
    assert_eq!(bnlink::init(), Ok(version));
}
