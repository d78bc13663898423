//! Data source lookups against a scripted API

use oscflow_api::testing::ScriptedTransport;
use oscflow_cloud::{CloudError, ResourceData};
use oscflow_provider::OscProvider;
use serde_json::json;

fn setup() -> (ScriptedTransport, OscProvider) {
    let transport = ScriptedTransport::new();
    let provider = OscProvider::new(transport.client());
    (transport, provider)
}

fn nat(id: &str) -> serde_json::Value {
    json!({
        "NatServiceId": id,
        "NetId": "net-1",
        "SubnetId": "subnet-1",
        "State": "available",
        "PublicIps": [{ "PublicIp": "198.51.100.1", "PublicIpId": "eipalloc-1" }]
    })
}

#[tokio::test]
async fn test_nat_service_by_id() {
    let (transport, provider) = setup();
    transport.ok(
        "ReadNatServices",
        &json!({ "NatServices": [nat("nat-1")], "ResponseContext": { "RequestId": "r-9" } }),
    );

    let mut d = ResourceData::new().with_attribute("nat_service_id", "nat-1");
    provider.read_data_source("nat_service", &mut d).await.unwrap();

    assert_eq!(d.id(), "nat-1");
    assert_eq!(d.get_str("subnet_id"), Some("subnet-1"));
    assert_eq!(
        d.get("public_ips").unwrap(),
        &json!([{ "public_ip": "198.51.100.1", "public_ip_id": "eipalloc-1" }])
    );
    assert_eq!(d.get_str("request_id"), Some("r-9"));

    let request = &transport.requests_for("ReadNatServices")[0];
    assert_eq!(
        request.body,
        json!({ "Filters": { "NatServiceIds": ["nat-1"] } })
    );
}

#[tokio::test]
async fn test_nat_service_no_results() {
    let (transport, provider) = setup();
    transport.ok("ReadNatServices", &json!({ "NatServices": [] }));

    let mut d = ResourceData::new().with_attribute("nat_service_id", "nat-404");
    let err = provider.read_data_source("nat_service", &mut d).await.unwrap_err();

    assert!(matches!(err, CloudError::NoResults));
    assert!(err.to_string().contains("no results"));
}

#[tokio::test]
async fn test_nat_service_too_many_results() {
    let (transport, provider) = setup();
    transport.ok("ReadNatServices", &json!({ "NatServices": [nat("nat-1"), nat("nat-2")] }));

    let mut d = ResourceData::new()
        .with_attribute("filter", json!([{ "name": "net_ids", "values": ["net-1"] }]));
    let err = provider.read_data_source("nat_service", &mut d).await.unwrap_err();

    assert!(matches!(err, CloudError::TooManyResults(2)));
    assert!(!d.exists());
}

#[tokio::test]
async fn test_lookup_requires_id_or_filter() {
    let (transport, provider) = setup();

    for ds in ["nat_service", "net_access_point", "vm_state", "load_balancer_vms"] {
        let mut d = ResourceData::new();
        let err = provider.read_data_source(ds, &mut d).await.unwrap_err();
        assert!(matches!(err, CloudError::MissingArgument(_)), "{}: {:?}", ds, err);
    }
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_unknown_filter_name_rejected() {
    let (transport, provider) = setup();

    let mut d = ResourceData::new()
        .with_attribute("filter", json!([{ "name": "colour", "values": ["blue"] }]));
    let err = provider
        .read_data_source("net_access_point", &mut d)
        .await
        .unwrap_err();

    assert!(matches!(err, CloudError::InvalidAttribute { ref attribute, .. } if attribute == "filter"));
    assert!(transport.requests().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_lookup_retries_throttling() {
    let (transport, provider) = setup();
    transport
        .fail("ReadNetAccessPoints", 503, "TooManyRequests", "slow down")
        .ok(
            "ReadNetAccessPoints",
            &json!({
                "NetAccessPoints": [{
                    "NetAccessPointId": "vpce-1",
                    "NetId": "net-1",
                    "ServiceName": "com.outscale.eu-west-2.oos",
                    "State": "available",
                    "RouteTableIds": ["rtb-1", "rtb-2"]
                }]
            }),
        );

    let mut d = ResourceData::new().with_attribute("net_access_point_id", "vpce-1");
    provider
        .read_data_source("net_access_point", &mut d)
        .await
        .unwrap();

    assert_eq!(transport.calls("ReadNetAccessPoints"), 2);
    assert_eq!(d.id(), "vpce-1");
    assert_eq!(d.get("route_table_ids").unwrap(), &json!(["rtb-1", "rtb-2"]));
}

#[tokio::test]
async fn test_vm_state() {
    let (transport, provider) = setup();
    transport.ok(
        "ReadVmsState",
        &json!({
            "VmStates": [{
                "VmId": "i-1",
                "VmState": "running",
                "SubregionName": "eu-west-2a",
                "MaintenanceEvents": [{ "Code": "system-reboot", "NotBefore": "2026-01-01" }]
            }]
        }),
    );

    let mut d = ResourceData::new().with_attribute("vm_id", "i-1");
    provider.read_data_source("vm_state", &mut d).await.unwrap();

    assert_eq!(d.id(), "i-1");
    assert_eq!(d.get_str("vm_state"), Some("running"));
    assert_eq!(
        d.get("maintenance_events").unwrap(),
        &json!([{ "code": "system-reboot", "not_before": "2026-01-01" }])
    );

    let request = &transport.requests_for("ReadVmsState")[0];
    assert_eq!(request.body["AllVms"], json!(false));
    assert_eq!(request.body["Filters"]["VmIds"], json!(["i-1"]));
}

#[tokio::test]
async fn test_load_balancer_vms() {
    let (transport, provider) = setup();
    transport.ok(
        "ReadLoadBalancers",
        &json!({ "LoadBalancers": [{ "LoadBalancerName": "lb-web", "BackendVmIds": ["i-1", "i-2"] }] }),
    );

    let mut d = ResourceData::new().with_attribute("load_balancer_name", "lb-web");
    provider
        .read_data_source("load_balancer_vms", &mut d)
        .await
        .unwrap();

    assert_eq!(d.id(), "lb-web");
    assert_eq!(d.get("backend_vm_ids").unwrap(), &json!(["i-1", "i-2"]));
}

#[tokio::test]
async fn test_public_ips_lists_all() {
    let (transport, provider) = setup();
    transport.ok(
        "ReadPublicIps",
        &json!({
            "PublicIps": [
                { "PublicIpId": "eipalloc-1", "PublicIp": "198.51.100.1", "VmId": "i-1" },
                { "PublicIpId": "eipalloc-2", "PublicIp": "198.51.100.2" }
            ]
        }),
    );

    let mut d = ResourceData::new();
    provider.read_data_source("public_ips", &mut d).await.unwrap();

    assert!(d.id().starts_with("oscflow-"));
    let ips = d.get("public_ips").unwrap().as_array().unwrap();
    assert_eq!(ips.len(), 2);
    assert_eq!(ips[0]["vm_id"], "i-1");
    assert!(ips[1].get("vm_id").is_none());
    assert_eq!(ips[1]["tags"], json!([]));

    let request = &transport.requests_for("ReadPublicIps")[0];
    assert_eq!(request.body, json!({}));
}

#[tokio::test]
async fn test_public_ips_empty_is_no_results() {
    let (transport, provider) = setup();
    transport.ok("ReadPublicIps", &json!({ "PublicIps": [] }));

    let mut d = ResourceData::new()
        .with_attribute("filter", json!([{ "name": "vm_ids", "values": ["i-1"] }]));
    let err = provider.read_data_source("public_ips", &mut d).await.unwrap_err();

    assert!(matches!(err, CloudError::NoResults));
    let request = &transport.requests_for("ReadPublicIps")[0];
    assert_eq!(request.body, json!({ "Filters": { "VmIds": ["i-1"] } }));
}
