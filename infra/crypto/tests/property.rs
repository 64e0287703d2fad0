mod fixtures;

use fixtures::setup_crypto;
use proptest::prelude::*;

proptest! {
    #[test]
    fn decrypt_inverts_encrypt(plaintext in ".{0,512}") {
        let crypto = setup_crypto(1);

        let sealed = crypto.encrypt(&plaintext).unwrap();
        prop_assert_eq!(crypto.decrypt(&sealed).unwrap(), plaintext);
    }
}
