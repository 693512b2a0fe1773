use cell_machine_levels_base74::{decode, encode, ALPHABET};
use proptest::prelude::*;

fn numeral() -> impl Strategy<Value = String> {
    let symbols: Vec<char> = ALPHABET.chars().collect();
    proptest::collection::vec(proptest::sample::select(symbols), 1..8)
        .prop_map(|digits| digits.into_iter().collect())
}

#[test]
fn leading_zero_digits_are_stripped_on_reencode() {
    assert_eq!(decode("00a"), Ok(10));
    assert_eq!(encode(decode("00a").expect("decodes")), "a");
    assert_eq!(encode(decode("000").expect("decodes")), "0");
}

proptest! {
    #[test]
    fn decode_inverts_encode(value in any::<u64>()) {
        prop_assert_eq!(decode(&encode(value)), Ok(value));
    }

    #[test]
    fn encode_is_minimal(value in 1u64..) {
        let numeral = encode(value);
        prop_assert!(!numeral.starts_with('0'), "{} has a leading zero", numeral);
    }

    #[test]
    fn reencoding_preserves_value(numeral in numeral()) {
        let value = decode(&numeral).expect("alphabet numerals decode");
        let canonical = encode(value);
        prop_assert_eq!(decode(&canonical), Ok(value));

        let stripped = numeral.trim_start_matches('0');
        let expected = if stripped.is_empty() { "0" } else { stripped };
        prop_assert_eq!(canonical.as_str(), expected);
    }
}
