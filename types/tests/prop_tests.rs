use proptest::prelude::*;

use tessera_types::{AssetType, ChainHead, Timestamp, Tracker};

proptest! {
    /// Tracker roundtrip through raw bytes.
    #[test]
    fn tracker_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let tracker = Tracker::new(bytes);
        prop_assert_eq!(tracker.as_bytes(), &bytes);
        prop_assert_eq!(Tracker::try_from(&bytes[..]).unwrap(), tracker);
    }

    /// AssetType::is_zero is true only for all-zero bytes.
    #[test]
    fn asset_type_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let asset_type = AssetType::new(bytes);
        prop_assert_eq!(asset_type.is_zero(), bytes == [0u8; 32]);
    }

    /// Hash ordering follows byte ordering, which keeps BTreeMap iteration stable.
    #[test]
    fn tracker_ordering_matches_bytes(
        a in prop::array::uniform32(0u8..),
        b in prop::array::uniform32(0u8..),
    ) {
        prop_assert_eq!(Tracker::new(a).cmp(&Tracker::new(b)), a.cmp(&b));
    }

    /// Bincode encodes a 32-byte hash as exactly 32 bytes, no length prefix.
    #[test]
    fn tracker_bincode_is_fixed_width(bytes in prop::array::uniform32(0u8..)) {
        let encoded = bincode::serialize(&Tracker::new(bytes)).unwrap();
        prop_assert_eq!(encoded.len(), 32);
        prop_assert_eq!(&encoded[..], &bytes[..]);
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        prop_assert_eq!(Timestamp::new(a) <= Timestamp::new(b), a <= b);
    }

    /// saturating_add never wraps.
    #[test]
    fn timestamp_saturating_add(base in 0u64..u64::MAX, offset in 0u64..u64::MAX) {
        let t = Timestamp::new(base).saturating_add(offset);
        prop_assert!(t >= Timestamp::new(base));
        prop_assert_eq!(t.as_secs(), base.saturating_add(offset));
    }

    /// ChainHead::next advances the height by exactly one.
    #[test]
    fn chain_head_next(height in 0u64..1_000_000, ts in 0u64..1_000_000) {
        let head = ChainHead::new(height, Timestamp::new(ts));
        let next = head.next(Timestamp::new(ts + 1));
        prop_assert_eq!(next.height, height + 1);
        prop_assert_eq!(next.timestamp, Timestamp::new(ts + 1));
    }
}
