use proptest::prelude::*;

use tally_types::{Age, IdentityKey, RecordId, TicketAmount, Timestamp};

proptest! {
    /// RecordId roundtrip: new -> as_bytes produces identical bytes.
    #[test]
    fn record_id_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let id = RecordId::new(bytes);
        prop_assert_eq!(id.as_bytes(), &bytes);
    }

    /// RecordId::is_zero is true only for all-zero bytes.
    #[test]
    fn record_id_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let id = RecordId::new(bytes);
        prop_assert_eq!(id.is_zero(), bytes == [0u8; 32]);
    }

    /// RecordId bincode serialization roundtrip.
    #[test]
    fn record_id_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let id = RecordId::new(bytes);
        let encoded = bincode::serialize(&id).unwrap();
        let decoded: RecordId = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, id);
    }

    /// TicketAmount checked_add agrees with u64 overflow semantics.
    #[test]
    fn amount_checked_add(a in 0u64.., b in 0u64..) {
        let sum = TicketAmount::new(a).checked_add(TicketAmount::new(b));
        prop_assert_eq!(sum.map(|s| s.raw()), a.checked_add(b));
    }

    /// TicketAmount checked_sub agrees with u64 underflow semantics.
    #[test]
    fn amount_checked_sub(a in 0u64.., b in 0u64..) {
        let diff = TicketAmount::new(a).checked_sub(TicketAmount::new(b));
        prop_assert_eq!(diff.map(|d| d.raw()), a.checked_sub(b));
    }

    /// Age ordering follows the day counter.
    #[test]
    fn age_ordering(a in 0u64.., b in 0u64..) {
        prop_assert_eq!(Age::new(a) <= Age::new(b), a <= b);
    }

    /// Age::plus_days never moves backwards.
    #[test]
    fn age_plus_days_monotone(base in 0u64.., days in 0u64..) {
        prop_assert!(Age::new(base).plus_days(days) >= Age::new(base));
    }

    /// Timestamp::plus_days adds whole days (absent saturation).
    #[test]
    fn timestamp_plus_days(base in 0u64..1_000_000_000, days in 0u64..10_000) {
        let t = Timestamp::new(base);
        prop_assert_eq!(t.plus_days(days).as_secs(), base + days * 86_400);
    }

    /// The default alias is always a prefix of the identity key and never
    /// exceeds the requested limit.
    #[test]
    fn truncated_is_bounded_prefix(key in "[0-9a-f]{0,130}", limit in 0usize..64) {
        let id = IdentityKey::new(key.clone());
        let alias = id.truncated(limit);
        prop_assert!(alias.len() <= limit);
        prop_assert!(key.starts_with(&alias));
    }
}
