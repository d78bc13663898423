//! Named API operations
//!
//! Each Outscale call is a zero-sized type implementing [`Operation`]; the
//! generic [`Client::execute`](crate::Client::execute) does the rest.

use crate::models::*;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// One API operation: name, HTTP method, input and output types
pub trait Operation {
    const NAME: &'static str;
    const METHOD: Method = Method::POST;

    type Input: Serialize + Default + Clone + Send + Sync;
    type Output: DeserializeOwned + Default + Send;

    fn path() -> String {
        format!("/api/v1/{}", Self::NAME)
    }
}

macro_rules! operations {
    ($($name:ident: $input:ty => $output:ty;)+) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl Operation for $name {
                const NAME: &'static str = stringify!($name);
                type Input = $input;
                type Output = $output;
            }
        )+

        /// Names of every operation the client knows
        pub const ALL: &[&str] = &[$(stringify!($name)),+];
    };
}

operations! {
    CreateSecurityGroup: CreateSecurityGroupRequest => CreateSecurityGroupResponse;
    DeleteSecurityGroup: DeleteSecurityGroupRequest => EmptyResponse;
    ReadSecurityGroups: ReadSecurityGroupsRequest => ReadSecurityGroupsResponse;

    CreateTags: CreateTagsRequest => EmptyResponse;
    DeleteTags: DeleteTagsRequest => EmptyResponse;
    ReadTags: ReadTagsRequest => ReadTagsResponse;

    LinkInternetService: LinkInternetServiceRequest => EmptyResponse;
    UnlinkInternetService: UnlinkInternetServiceRequest => EmptyResponse;
    ReadInternetServices: ReadInternetServicesRequest => ReadInternetServicesResponse;

    CreatePublicIp: CreatePublicIpRequest => CreatePublicIpResponse;
    DeletePublicIp: DeletePublicIpRequest => EmptyResponse;
    ReadPublicIps: ReadPublicIpsRequest => ReadPublicIpsResponse;

    ReadNatServices: ReadNatServicesRequest => ReadNatServicesResponse;
    ReadNetAccessPoints: ReadNetAccessPointsRequest => ReadNetAccessPointsResponse;
    ReadVmsState: ReadVmsStateRequest => ReadVmsStateResponse;
    ReadLoadBalancers: ReadLoadBalancersRequest => ReadLoadBalancersResponse;

    CreatePolicy: CreatePolicyRequest => CreatePolicyResponse;
    ReadPolicy: ReadPolicyRequest => ReadPolicyResponse;
    DeletePolicy: DeletePolicyRequest => EmptyResponse;
    ReadPolicyVersions: ReadPolicyVersionsRequest => ReadPolicyVersionsResponse;
    DeletePolicyVersion: DeletePolicyVersionRequest => EmptyResponse;
}
