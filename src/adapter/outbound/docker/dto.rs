//! Docker CLI output formats.
//!
//! `docker network inspect --format '{{json .Containers}}'` prints a map of
//! container id to endpoint details, or `null` on some engine versions when
//! nothing is attached:
//!
//! ```json
//! {"3f1c…":{"Name":"c1-db","EndpointID":"…","MacAddress":"…","IPv4Address":"172.18.0.2/16","IPv6Address":""}}
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::membership::{ClusterMembership, Member};
use crate::error::Result;

/// One attached container as reported by `network inspect`.
#[derive(Debug, Deserialize)]
pub struct NetworkEndpoint {
    #[serde(rename = "Name")]
    pub name: String,
}

/// Parse the `.Containers` JSON of a network into its membership, ordered
/// by container id.
pub fn parse_membership(json: &str) -> Result<ClusterMembership> {
    let endpoints: Option<BTreeMap<String, NetworkEndpoint>> = serde_json::from_str(json.trim())?;
    let members = endpoints
        .unwrap_or_default()
        .into_iter()
        .map(|(id, endpoint)| Member::new(id, endpoint.name))
        .collect();
    Ok(ClusterMembership::new(members))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attached_containers() {
        let json = r#"{"bbb":{"Name":"c1-db","EndpointID":"e2","IPv4Address":"172.18.0.3/16"},
                       "aaa":{"Name":"c1","EndpointID":"e1","IPv4Address":"172.18.0.2/16"}}"#;
        let membership = parse_membership(json).unwrap();

        assert_eq!(
            membership.members(),
            &[Member::new("aaa", "c1"), Member::new("bbb", "c1-db")]
        );
    }

    #[test]
    fn empty_and_null_mean_no_members() {
        assert!(parse_membership("{}\n").unwrap().is_empty());
        assert!(parse_membership("null").unwrap().is_empty());
    }

    #[test]
    fn malformed_output_is_an_error() {
        assert!(parse_membership("<no value>").is_err());
    }
}
