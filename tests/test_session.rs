//! Deliverer session providers.

use reparto_sdk::session::{DelivererIdProvider, NoDeliverer, SessionFile, StaticDeliverer};
use reparto_sdk::{RepartoError, RepartoSdk};

#[test]
fn static_and_no_deliverer() {
    assert_eq!(StaticDeliverer("rep-1".into()).deliverer_id().as_deref(), Some("rep-1"));
    assert!(NoDeliverer.deliverer_id().is_none());
}

#[test]
fn session_file_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let session = SessionFile::new(tmp.path().join("nested").join("session"));

    assert!(session.deliverer_id().is_none());
    session.login("  rep-4 \n").unwrap();
    assert_eq!(session.deliverer_id().as_deref(), Some("rep-4"));

    session.logout().unwrap();
    assert!(session.deliverer_id().is_none());
    // Logging out twice is fine.
    session.logout().unwrap();
}

#[test]
fn session_file_rejects_blank_login() {
    let tmp = tempfile::tempdir().unwrap();
    let session = SessionFile::new(tmp.path().join("session"));
    assert!(matches!(session.login("   "), Err(RepartoError::InvalidArgument(_))));
}

#[test]
fn sdk_reads_session_file_on_each_call() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("session");
    let sdk = RepartoSdk::builder()
        .base_url("http://127.0.0.1:9")
        .session_file(&path)
        .build()
        .unwrap();

    assert!(sdk.api().deliverer_id().is_none());
    std::fs::write(&path, "rep-7\n").unwrap();
    assert_eq!(sdk.api().deliverer_id().as_deref(), Some("rep-7"));
}
