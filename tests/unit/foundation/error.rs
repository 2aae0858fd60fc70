use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TripError::rejected("x")
            .to_string()
            .contains("rejected run:")
    );
    assert!(TripError::media("x").to_string().contains("media error:"));
    assert!(
        TripError::writer_open("x")
            .to_string()
            .contains("writer open error:")
    );
    assert!(TripError::encode("x").to_string().contains("encode error:"));
    assert!(
        TripError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        TripError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TripError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_run_level_errors_are_fatal() {
    assert!(TripError::rejected("empty").is_run_fatal());
    assert!(TripError::writer_open("no ffmpeg").is_run_fatal());
    assert!(!TripError::media("bad jpeg").is_run_fatal());
    assert!(!TripError::validation("layer size").is_run_fatal());
    assert!(!TripError::Other(anyhow::anyhow!("io")).is_run_fatal());
}
