use super::*;

#[test]
fn defaults_match_play_mode_constants() {
    let cfg = PlaybackConfig::default();
    assert_eq!(cfg.transition_secs, 1.0);
    assert_eq!(cfg.default_hold_secs, 3.0);
    assert_eq!(cfg.start_delay_secs, 0.5);
    assert_eq!(cfg.z_index_base, 1000);
    assert_eq!(cfg.slice_secs(), 0.5);
    cfg.validate().unwrap();
}

#[test]
fn partial_json_keeps_other_defaults() {
    let cfg = PlaybackConfig::from_reader(r#"{"transition_secs": 0.8}"#.as_bytes()).unwrap();
    assert_eq!(cfg.transition_secs, 0.8);
    assert_eq!(cfg.encounter_interstitial_secs, 2.5);
}

#[test]
fn rejects_unknown_fields_and_bad_values() {
    let err = PlaybackConfig::from_reader(r#"{"transition": 1}"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("serialization error:"));

    let err = PlaybackConfig::from_reader(r#"{"transition_secs": -1}"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("transition_secs"));

    let err = PlaybackConfig::from_reader(r#"{"shutter_in_strips": 0}"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("strip counts"));
}

#[test]
fn shutter_out_count_follows_breakpoint() {
    let cfg = PlaybackConfig::default();
    assert_eq!(cfg.shutter_out_count(390.0), 10);
    assert_eq!(cfg.shutter_out_count(768.0), 10);
    assert_eq!(cfg.shutter_out_count(1280.0), 15);
}
