use lockbox_audit::AccessLog;
use lockbox_domain::access::{AccessAction, AccessRecord, SecretValue};
use lockbox_domain::config::ConfigSnapshot;
use proptest::prelude::*;

fn config(key: &str) -> ConfigSnapshot {
    ConfigSnapshot {
        database_url: "mem://".to_owned(),
        encryption_key: key.to_owned(),
        password_length: 12,
    }
}

#[test]
fn capture_is_not_aliased_to_live_log() {
    let log = AccessLog::new();
    log.record("email", "before", AccessAction::Modification);

    let state = log.capture(config("k1"));

    log.record("email", "after", AccessAction::Modification);
    log.record("bank", "new", AccessAction::Modification);

    assert_eq!(state.history()["email"], vec![AccessRecord::modification("before")]);
    assert!(!state.history().contains_key("bank"));
    assert_eq!(state.config().encryption_key, "k1");
}

#[test]
fn replace_installs_a_copy() {
    let log = AccessLog::new();
    log.record("email", "v1", AccessAction::Modification);
    let state = log.capture(config("k"));

    log.record("email", "v2", AccessAction::Modification);
    log.replace(&state);
    assert_eq!(log.history("email"), vec![AccessRecord::modification("v1")]);

    // Mutating the restored log must leave the capture as it was.
    log.record("email", "v3", AccessAction::Modification);
    assert_eq!(state.history()["email"].len(), 1);
}

#[test]
fn last_modification_skips_consultations() {
    let log = AccessLog::new();
    log.record("email", "first", AccessAction::Modification);
    log.record("email", "second", AccessAction::Modification);
    log.record("email", "second", AccessAction::Consultation);
    log.record("bank", "peek", AccessAction::Consultation);

    let state = log.capture(config("k"));

    assert_eq!(state.last_modification("email"), Some(&SecretValue::from("second")));
    assert_eq!(state.last_modification("bank"), None);
    assert_eq!(state.last_modification("missing"), None);
}

proptest! {
    #[test]
    fn capture_preserves_every_record(values in proptest::collection::vec("[a-z]{1,8}", 1..32)) {
        let log = AccessLog::new();
        for value in &values {
            log.record("cat", value.as_str(), AccessAction::Modification);
        }

        let state = log.capture(config("k"));
        prop_assert_eq!(state.history()["cat"].len(), values.len());
        prop_assert_eq!(
            state.last_modification("cat").map(SecretValue::expose),
            values.last().map(String::as_str)
        );
    }
}
