use lockbox_passgen::*;
use lockbox_domain::constants::MAX_PASSWORD_LENGTH;
use proptest::prelude::*;

#[test]
fn names_parse_case_insensitively() {
    assert_eq!(parse_kind("SPECIAL").unwrap(), GeneratorKind::Special);
    assert_eq!(parse_kind("AlphaNumeric").unwrap(), GeneratorKind::Alphanumeric);
}

#[test]
fn unknown_name_is_rejected() {
    let err = parse_kind("emoji").unwrap_err();
    assert!(matches!(err, PassgenError::UnknownGenerator { ref name, .. } if name == "emoji"));
    assert!(err.to_string().contains("emoji"));
}

#[test]
fn minimum_length_is_enforced() {
    assert!(matches!(
        generate_password(GeneratorKind::Alphanumeric, 10),
        Err(PassgenError::TooShort { length: 10, minimum: 11, .. })
    ));
    assert_eq!(generate_password(GeneratorKind::Special, 11).unwrap().len(), 11);
}

#[test]
fn oversized_length_is_rejected_without_allocating() {
    assert!(matches!(
        generate_password(GeneratorKind::Alphanumeric, 4_000_000_000),
        Err(PassgenError::TooLong { length: 4_000_000_000, maximum: MAX_PASSWORD_LENGTH, .. })
    ));
    assert_eq!(generate_password(GeneratorKind::Special, MAX_PASSWORD_LENGTH).unwrap().len(), 4096);
}

#[test]
fn consecutive_passwords_differ() {
    let generator = create_generator(GeneratorKind::Special);
    assert_ne!(generator.generate(32), generator.generate(32));
}

proptest! {
    #[test]
    fn generated_length_matches_request(length in 11u32..256) {
        let password = generate_password(GeneratorKind::Special, length).unwrap();
        prop_assert_eq!(password.chars().count(), length as usize);
        prop_assert!(password.bytes().all(|b| ALPHANUMERIC.contains(&b) || SPECIAL.contains(&b)));
    }
}
