use super::*;

#[test]
fn grid_endpoint_formats_path() {
    assert_eq!(grid_endpoint("FDR-12"), "/api/feeders/FDR-12/grid");
}

#[test]
fn detail_endpoint_maps_type_to_collection() {
    assert_eq!(detail_endpoint("switch", "sw-1").as_deref(), Ok("/api/components/switches/sw-1"));
    assert_eq!(detail_endpoint("Transformer", "t9").as_deref(), Ok("/api/components/transformers/t9"));
    assert_eq!(detail_endpoint("line-segment", "ls").as_deref(), Ok("/api/components/line-segments/ls"));
}

#[test]
fn every_equipment_kind_but_bus_has_details() {
    for kind in ComponentKind::ALL {
        assert_eq!(detail_segment(kind).is_none(), kind == ComponentKind::Bus, "{kind:?}");
    }
    assert!(detail_segment(ComponentKind::Unknown).is_none());
}

#[test]
fn unsupported_type_is_distinct_from_network_failure() {
    let err = detail_endpoint("flux_capacitor", "x");
    assert_eq!(err, Err(ApiError::UnsupportedType("flux_capacitor".to_owned())));
    let err = detail_endpoint("bus", "b1");
    assert_eq!(err, Err(ApiError::UnsupportedType("bus".to_owned())));
}

#[test]
fn user_messages() {
    assert_eq!(ApiError::Status(404).user_message(), "No details found for this component.");
    assert_eq!(ApiError::Status(503).user_message(), "Server returned 503.");
    assert_eq!(ApiError::Network("offline".to_owned()).user_message(), "Could not reach the server.");
    assert_eq!(ApiError::Decode("eof".to_owned()).user_message(), "Unexpected response from the server.");
    assert_eq!(
        ApiError::UnsupportedType("bus".to_owned()).user_message(),
        "Details are not available for bus components."
    );
}

#[test]
fn error_display_includes_context() {
    assert_eq!(ApiError::Status(500).to_string(), "server returned status 500");
    assert!(ApiError::UnsupportedType("bus".to_owned()).to_string().contains("bus"));
}
