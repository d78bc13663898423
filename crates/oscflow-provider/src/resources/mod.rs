//! Managed resource types

mod internet_service_link;
mod policy;
mod public_ip;
mod security_group;
mod tag;

pub use internet_service_link::InternetServiceLink;
pub use policy::Policy;
pub use public_ip::PublicIp;
pub use security_group::SecurityGroup;
pub use tag::Tag;

use chrono::Utc;
use oscflow_api::Client;
use oscflow_cloud::Resource;
use std::sync::atomic::{AtomicU32, Ordering};

static UNIQUE_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Name unique within this process, ordered by creation time.
pub fn unique_id() -> String {
    let n = UNIQUE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("oscflow-{}{:08}", Utc::now().format("%Y%m%d%H%M%S%6f"), n)
}

/// Every resource type, in registration order
pub fn all() -> Vec<Box<dyn Resource<Client>>> {
    vec![
        Box::new(SecurityGroup),
        Box::new(InternetServiceLink),
        Box::new(PublicIp),
        Box::new(Tag),
        Box::new(Policy),
    ]
}
