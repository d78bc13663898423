//! Resource CRUD against a scripted API

use oscflow_api::testing::ScriptedTransport;
use oscflow_cloud::{CloudError, ResourceData};
use oscflow_provider::OscProvider;
use serde_json::json;

fn setup() -> (ScriptedTransport, OscProvider) {
    let transport = ScriptedTransport::new();
    let provider = OscProvider::new(transport.client());
    (transport, provider)
}

fn group(id: &str, name: &str) -> serde_json::Value {
    json!({
        "SecurityGroupId": id,
        "SecurityGroupName": name,
        "Description": "Managed by oscflow",
        "NetId": "vpc-1",
        "AccountId": "123456789012",
        "InboundRules": [{
            "FromPortRange": 22,
            "ToPortRange": 22,
            "IpProtocol": "tcp",
            "IpRanges": ["10.0.0.0/16"]
        }],
        "OutboundRules": [],
        "Tags": [{ "Key": "env", "Value": "prod" }]
    })
}

#[tokio::test(start_paused = true)]
async fn test_security_group_create_waits_then_tags() {
    let (transport, provider) = setup();
    transport.ok(
        "CreateSecurityGroup",
        &json!({ "SecurityGroup": { "SecurityGroupId": "sg-1" } }),
    );
    transport
        .ok("ReadSecurityGroups", &json!({ "SecurityGroups": [] }))
        .ok(
            "ReadSecurityGroups",
            &json!({
                "SecurityGroups": [group("sg-1", "web")],
                "ResponseContext": { "RequestId": "req-1" }
            }),
        );
    transport.ok("CreateTags", &json!({}));

    let mut d = ResourceData::new()
        .with_attribute("security_group_name", "web")
        .with_attribute("net_id", "vpc-1")
        .with_attribute("tags", json!([{ "key": "env", "value": "prod" }]));

    provider.create("security_group", &mut d).await.unwrap();

    assert_eq!(d.id(), "sg-1");
    assert_eq!(d.get_str("account_id"), Some("123456789012"));
    assert_eq!(d.get_str("request_id"), Some("req-1"));
    assert_eq!(
        d.get("inbound_rules").unwrap()[0]["ip_ranges"],
        json!(["10.0.0.0/16"])
    );
    assert!(!d.is_new_resource());

    let create = &transport.requests_for("CreateSecurityGroup")[0];
    assert_eq!(create.body["Description"], "Managed by oscflow");
    assert_eq!(create.body["NetId"], "vpc-1");

    // one not-yet-visible poll, one successful poll, one final read
    assert_eq!(transport.calls("ReadSecurityGroups"), 3);

    let tags = &transport.requests_for("CreateTags")[0];
    assert_eq!(tags.body["ResourceIds"], json!(["sg-1"]));
    assert_eq!(tags.body["Tags"], json!([{ "Key": "env", "Value": "prod" }]));
}

#[tokio::test(start_paused = true)]
async fn test_security_group_generates_name() {
    let (transport, provider) = setup();
    transport.ok(
        "CreateSecurityGroup",
        &json!({ "SecurityGroup": { "SecurityGroupId": "sg-2" } }),
    );
    transport.ok("ReadSecurityGroups", &json!({ "SecurityGroups": [group("sg-2", "")] }));

    let mut d = ResourceData::new();
    provider.create("security_group", &mut d).await.unwrap();

    let create = &transport.requests_for("CreateSecurityGroup")[0];
    let name = create.body["SecurityGroupName"].as_str().unwrap();
    assert!(name.starts_with("oscflow-"));
    assert_eq!(transport.calls("CreateTags"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_security_group_create_retries_throttling() {
    let (transport, provider) = setup();
    transport
        .fail("CreateSecurityGroup", 400, "TooManyResources", "RequestLimitExceeded")
        .ok(
            "CreateSecurityGroup",
            &json!({ "SecurityGroup": { "SecurityGroupId": "sg-3" } }),
        );
    transport.ok("ReadSecurityGroups", &json!({ "SecurityGroups": [group("sg-3", "db")] }));

    let mut d = ResourceData::new().with_attribute("security_group_name", "db");
    provider.create("security_group", &mut d).await.unwrap();

    assert_eq!(transport.calls("CreateSecurityGroup"), 2);
    assert_eq!(d.id(), "sg-3");
}

#[tokio::test]
async fn test_security_group_create_aborts_on_other_errors() {
    let (transport, provider) = setup();
    transport.fail("CreateSecurityGroup", 400, "InvalidParameterValue", "bad net");

    let mut d = ResourceData::new().with_attribute("security_group_name", "db");
    let err = provider.create("security_group", &mut d).await.unwrap_err();

    assert!(matches!(err, CloudError::Api { ref operation, .. } if operation == "CreateSecurityGroup"));
    assert_eq!(transport.calls("CreateSecurityGroup"), 1);
    assert!(!d.exists());
}

#[tokio::test]
async fn test_security_group_read_clears_missing() {
    let (transport, provider) = setup();
    transport.ok("ReadSecurityGroups", &json!({ "SecurityGroups": [] }));

    let mut d = ResourceData::new().with_id("sg-gone");
    provider.read("security_group", &mut d).await.unwrap();

    assert!(!d.exists());
}

#[tokio::test(start_paused = true)]
async fn test_security_group_delete_retries_dependency_violation() {
    let (transport, provider) = setup();
    transport
        .fail("DeleteSecurityGroup", 409, "ResourceConflict", "DependencyViolation")
        .fail("DeleteSecurityGroup", 409, "ResourceConflict", "Conflict")
        .ok("DeleteSecurityGroup", &json!({}));

    let mut d = ResourceData::new().with_id("sg-1");
    provider.delete("security_group", &mut d).await.unwrap();

    assert_eq!(transport.calls("DeleteSecurityGroup"), 3);
    assert!(!d.exists());
}

#[tokio::test]
async fn test_security_group_delete_not_found_is_success() {
    let (transport, provider) = setup();
    transport.fail("DeleteSecurityGroup", 400, "InvalidResource", "InvalidGroup.NotFound");

    let mut d = ResourceData::new().with_id("sg-1");
    provider.delete("security_group", &mut d).await.unwrap();

    assert_eq!(transport.calls("DeleteSecurityGroup"), 1);
    assert!(!d.exists());
}

#[tokio::test(start_paused = true)]
async fn test_security_group_update_syncs_tags() {
    let (transport, provider) = setup();
    transport.ok(
        "ReadTags",
        &json!({ "Tags": [{ "Key": "env", "Value": "dev", "ResourceId": "sg-1" }] }),
    );
    transport.ok("DeleteTags", &json!({}));
    transport.ok("CreateTags", &json!({}));
    transport.ok("ReadSecurityGroups", &json!({ "SecurityGroups": [group("sg-1", "web")] }));

    let old = ResourceData::new()
        .with_id("sg-1")
        .with_attribute("security_group_name", "web")
        .with_attribute("tags", json!([{ "key": "env", "value": "dev" }]));
    let mut new = old
        .clone()
        .with_attribute("tags", json!([{ "key": "env", "value": "prod" }]));

    provider.update("security_group", &old, &mut new).await.unwrap();

    let removed = &transport.requests_for("DeleteTags")[0];
    assert_eq!(removed.body["Tags"], json!([{ "Key": "env", "Value": "dev" }]));
    let created = &transport.requests_for("CreateTags")[0];
    assert_eq!(created.body["Tags"], json!([{ "Key": "env", "Value": "prod" }]));
}

#[tokio::test(start_paused = true)]
async fn test_internet_service_link_create_polls_until_available() {
    let (transport, provider) = setup();
    transport.ok("LinkInternetService", &json!({}));
    transport
        .ok(
            "ReadInternetServices",
            &json!({ "InternetServices": [{ "InternetServiceId": "igw-1", "State": "pending" }] }),
        )
        .ok(
            "ReadInternetServices",
            &json!({ "InternetServices": [{ "InternetServiceId": "igw-1", "NetId": "net-1", "State": "available" }] }),
        );

    let mut d = ResourceData::new()
        .with_attribute("net_id", "net-1")
        .with_attribute("internet_service_id", "igw-1");
    provider.create("internet_service_link", &mut d).await.unwrap();

    assert_eq!(d.id(), "igw-1");
    assert_eq!(d.get_str("state"), Some("available"));
    let link = &transport.requests_for("LinkInternetService")[0];
    assert_eq!(link.body, json!({ "InternetServiceId": "igw-1", "NetId": "net-1" }));
}

#[tokio::test(start_paused = true)]
async fn test_internet_service_link_empty_state_reads_available() {
    let (transport, provider) = setup();
    transport.ok(
        "ReadInternetServices",
        &json!({ "InternetServices": [{ "InternetServiceId": "igw-1", "NetId": "net-1" }] }),
    );

    let mut d = ResourceData::new().with_id("igw-1");
    provider.read("internet_service_link", &mut d).await.unwrap();

    assert_eq!(d.id(), "igw-1");
    assert_eq!(d.get_str("net_id"), Some("net-1"));
    assert_eq!(transport.calls("ReadInternetServices"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_internet_service_link_fail_state() {
    let (transport, provider) = setup();
    transport.ok("LinkInternetService", &json!({}));
    transport.ok(
        "ReadInternetServices",
        &json!({ "InternetServices": [{ "InternetServiceId": "igw-1", "State": "failed" }] }),
    );

    let mut d = ResourceData::new()
        .with_attribute("net_id", "net-1")
        .with_attribute("internet_service_id", "igw-1");
    let err = provider.create("internet_service_link", &mut d).await.unwrap_err();

    assert!(matches!(err, CloudError::FailState { ref state } if state == "failed"));
    assert_eq!(transport.calls("ReadInternetServices"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_internet_service_link_delete_when_already_deleted() {
    let (transport, provider) = setup();
    transport.ok("ReadInternetServices", &json!({ "InternetServices": [] }));

    let mut d = ResourceData::new().with_id("igw-1");
    provider.delete("internet_service_link", &mut d).await.unwrap();

    assert!(!d.exists());
    assert_eq!(transport.calls("ReadInternetServices"), 1);
    assert_eq!(transport.calls("UnlinkInternetService"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_internet_service_link_delete_unlinks() {
    let (transport, provider) = setup();
    transport.ok(
        "ReadInternetServices",
        &json!({ "InternetServices": [{ "InternetServiceId": "igw-1", "NetId": "net-1", "State": "available" }] }),
    );
    transport.ok("UnlinkInternetService", &json!({}));

    let mut d = ResourceData::new().with_id("igw-1");
    provider.delete("internet_service_link", &mut d).await.unwrap();

    let unlink = &transport.requests_for("UnlinkInternetService")[0];
    assert_eq!(unlink.body, json!({ "InternetServiceId": "igw-1", "NetId": "net-1" }));
    assert!(!d.exists());
}

#[tokio::test]
async fn test_internet_service_link_cannot_update() {
    let (_, provider) = setup();
    let old = ResourceData::new()
        .with_id("igw-1")
        .with_attribute("net_id", "net-1")
        .with_attribute("internet_service_id", "igw-1");
    let mut new = old.clone();

    let err = provider
        .update("internet_service_link", &old, &mut new)
        .await
        .unwrap_err();
    assert!(matches!(err, CloudError::InvalidConfig(_)));
}

#[tokio::test]
async fn test_public_ip_lifecycle() {
    let (transport, provider) = setup();
    transport.ok(
        "CreatePublicIp",
        &json!({ "PublicIp": { "PublicIpId": "eipalloc-1", "PublicIp": "198.51.100.7" } }),
    );
    transport.ok(
        "ReadPublicIps",
        &json!({ "PublicIps": [{ "PublicIpId": "eipalloc-1", "PublicIp": "198.51.100.7" }] }),
    );
    transport.fail("DeletePublicIp", 400, "InvalidResource", "InvalidAllocationID.NotFound");

    let mut d = ResourceData::new();
    provider.create("public_ip", &mut d).await.unwrap();

    assert_eq!(d.id(), "eipalloc-1");
    assert_eq!(d.get_str("public_ip"), Some("198.51.100.7"));
    assert!(d.get("vm_id").is_none());
    assert_eq!(transport.calls("CreateTags"), 0);

    provider.delete("public_ip", &mut d).await.unwrap();
    assert!(!d.exists());
}

#[tokio::test]
async fn test_public_ip_read_not_found_clears_id() {
    let (transport, provider) = setup();
    transport.fail("ReadPublicIps", 400, "InvalidResource", "InvalidAddress.NotFound");

    let mut d = ResourceData::new().with_id("eipalloc-9");
    provider.read("public_ip", &mut d).await.unwrap();

    assert!(!d.exists());
}

#[tokio::test]
async fn test_tag_create_and_read() {
    let (transport, provider) = setup();
    transport.ok("CreateTags", &json!({}));
    transport.ok(
        "ReadTags",
        &json!({
            "Tags": [{ "Key": "name", "Value": "web", "ResourceId": "i-1", "ResourceType": "vm" }]
        }),
    );

    let mut d = ResourceData::new()
        .with_attribute("resource_id", "i-1")
        .with_attribute("tags", json!([{ "key": "name", "value": "web" }]));
    provider.create("tag", &mut d).await.unwrap();

    assert_eq!(d.id(), "i-1");
    assert_eq!(d.get_str("resource_type"), Some("vm"));
    let read = &transport.requests_for("ReadTags")[0];
    assert_eq!(read.body["Filters"]["Keys"], json!(["name"]));
}

#[tokio::test]
async fn test_tag_requires_resource_id() {
    let (transport, provider) = setup();

    let mut d = ResourceData::new().with_attribute("tags", json!([{ "key": "a", "value": "b" }]));
    let err = provider.create("tag", &mut d).await.unwrap_err();

    assert!(matches!(err, CloudError::MissingArgument(ref a) if a == "resource_id"));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_policy_delete_removes_non_default_versions() {
    let (transport, provider) = setup();
    transport.ok(
        "ReadPolicyVersions",
        &json!({
            "PolicyVersions": [
                { "VersionId": "v1", "DefaultVersion": true },
                { "VersionId": "v2", "DefaultVersion": false },
                { "VersionId": "v3" }
            ]
        }),
    );
    transport.ok("DeletePolicyVersion", &json!({}));
    transport.ok("DeletePolicy", &json!({}));

    let mut d = ResourceData::new().with_id("orn:ows:idauth::123:policy/readonly");
    provider.delete("policy", &mut d).await.unwrap();

    let deleted: Vec<_> = transport
        .requests_for("DeletePolicyVersion")
        .iter()
        .map(|r| r.body["VersionId"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(deleted, vec!["v2", "v3"]);
    assert_eq!(transport.calls("DeletePolicy"), 1);
    assert!(!d.exists());
}

#[tokio::test]
async fn test_policy_delete_when_already_gone() {
    let (transport, provider) = setup();
    transport.fail("ReadPolicyVersions", 404, "InvalidResource", "Policy NotFound");
    transport.fail("DeletePolicy", 404, "InvalidResource", "Policy NotFound");

    let mut d = ResourceData::new().with_id("orn:ows:idauth::123:policy/gone");
    tokio_test::assert_ok!(provider.delete("policy", &mut d).await);

    assert!(!d.exists());
    assert_eq!(transport.calls("ReadPolicyVersions"), 1);
    assert_eq!(transport.calls("DeletePolicy"), 0);
}

#[tokio::test]
async fn test_policy_create_sets_orn() {
    let (transport, provider) = setup();
    transport.ok(
        "CreatePolicy",
        &json!({ "Policy": { "Orn": "orn:ows:idauth::123:policy/ro", "PolicyName": "ro" } }),
    );
    transport.ok(
        "ReadPolicy",
        &json!({
            "Policy": {
                "Orn": "orn:ows:idauth::123:policy/ro",
                "PolicyName": "ro",
                "ResourcesCount": 0,
                "IsLinkable": true
            }
        }),
    );

    let mut d = ResourceData::new()
        .with_attribute("policy_name", "ro")
        .with_attribute("document", r#"{"Statement":[]}"#);
    provider.create("policy", &mut d).await.unwrap();

    assert_eq!(d.id(), "orn:ows:idauth::123:policy/ro");
    assert_eq!(d.get_bool("is_linkable"), Some(true));
    assert_eq!(d.get_i64("resources_count"), Some(0));
}
