//! Environment overrides reach the control plane.

use slipstream::config::SlipstreamConfig;
use slipstream::control::ControlPlane;

#[test]
fn test_from_env_applies_overrides() {
    std::env::set_var("SLIPSTREAM_ACCEPTANCE_THRESHOLD", "0.9");
    let plane = ControlPlane::from_env(&SlipstreamConfig::default());
    std::env::remove_var("SLIPSTREAM_ACCEPTANCE_THRESHOLD");

    let plane = plane.unwrap();
    assert_eq!(plane.quantizer().acceptance_threshold(), 0.9);

    let plain = ControlPlane::from_config(&SlipstreamConfig::default(), None).unwrap();
    assert_eq!(plain.quantizer().acceptance_threshold(), 0.5);
}
