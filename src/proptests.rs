//! Property-based tests for merging and VLAN map pivoting.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use std::collections::BTreeMap;
    use std::path::Path;

    use crate::error::Error;
    use crate::merge::merge;
    use crate::vars::ConfigMapping;
    use crate::vlan::{pivot, MAPPING_KEY};
    use proptest::prelude::*;
    use serde_yaml::{Mapping, Value};

    fn to_mapping(entries: &BTreeMap<String, i64>) -> ConfigMapping {
        entries
            .iter()
            .map(|(k, v)| (Value::from(k.as_str()), Value::from(*v)))
            .collect()
    }

    // ============================================================================
    // merge property tests
    // ============================================================================

    proptest! {
        /// Property: merging disjoint mappings is their key-wise union
        #[test]
        fn merge_disjoint_is_union(
            left in prop::collection::btree_map("a[a-z]{0,6}", any::<i64>(), 0..8),
            right in prop::collection::btree_map("b[a-z]{0,6}", any::<i64>(), 0..8),
        ) {
            let mut base = to_mapping(&left);
            merge(&mut base, to_mapping(&right), "right", false).unwrap();

            prop_assert_eq!(base.len(), left.len() + right.len());
            for (k, v) in left.iter().chain(right.iter()) {
                prop_assert_eq!(base.get(k.as_str()), Some(&Value::from(*v)));
            }
        }

        /// Property: a shared key conflicts without override, and takes the
        /// incoming value with override
        #[test]
        fn merge_shared_key(
            key in "[a-z]{1,8}",
            old in any::<i64>(),
            new in any::<i64>(),
        ) {
            let base = to_mapping(&BTreeMap::from([(key.clone(), old)]));
            let incoming = to_mapping(&BTreeMap::from([(key.clone(), new)]));

            let mut strict = base.clone();
            match merge(&mut strict, incoming.clone(), "incoming", false) {
                Err(Error::Conflict { key: reported, .. }) => {
                    prop_assert_eq!(reported, key.clone())
                }
                other => prop_assert!(false, "expected conflict, got {:?}", other),
            }

            let mut relaxed = base;
            merge(&mut relaxed, incoming, "incoming", true).unwrap();
            prop_assert_eq!(relaxed.get(key.as_str()), Some(&Value::from(new)));
        }
    }

    // ============================================================================
    // pivot property tests
    // ============================================================================

    /// vlan -> device -> interface -> description
    type RawMap = BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>;

    fn raw_vlan_map(raw: &RawMap) -> ConfigMapping {
        let entries: Vec<Value> = raw
            .iter()
            .map(|(vlan, devices)| {
                let devices: Mapping = devices
                    .iter()
                    .map(|(device, interfaces)| {
                        let interfaces: Mapping = interfaces
                            .iter()
                            .map(|(i, d)| (Value::from(i.as_str()), Value::from(d.as_str())))
                            .collect();
                        (Value::from(device.as_str()), Value::Mapping(interfaces))
                    })
                    .collect();
                let mut entry = Mapping::new();
                entry.insert(Value::from("name"), Value::from(vlan.as_str()));
                entry.insert(Value::from("devices"), Value::Mapping(devices));
                Value::Mapping(entry)
            })
            .collect();

        let mut map = Mapping::new();
        map.insert(Value::from(MAPPING_KEY), Value::Sequence(entries));
        map
    }

    fn raw_map_strategy() -> impl Strategy<Value = RawMap> {
        prop::collection::btree_map(
            "VLAN[0-9]{1,3}",
            prop::collection::btree_map(
                "sw[0-9]",
                prop::collection::btree_map("ge-0/0/[0-9]{1,2}", "[A-Za-z ]{1,10}", 1..4),
                1..3,
            ),
            0..5,
        )
    }

    proptest! {
        /// Property: every (vlan, device, interface, description) entry appears
        /// exactly once in the pivoted map
        #[test]
        fn pivot_is_lossless(raw in raw_map_strategy()) {
            let pivoted = pivot(&raw_vlan_map(&raw), Path::new("vlans.yaml")).unwrap();

            let total: usize = raw
                .values()
                .flat_map(|devices| devices.values())
                .map(|interfaces| interfaces.len())
                .sum();
            prop_assert_eq!(pivoted.len(), total);

            for (vlan, devices) in &raw {
                for (device, interfaces) in devices {
                    for (interface, description) in interfaces {
                        let found = pivoted
                            .device(device)
                            .and_then(|d| d.interfaces.iter().find(|i| &i.interface == interface))
                            .map(|i| {
                                i.assignments
                                    .iter()
                                    .filter(|a| &a.description == description && &a.vlan == vlan)
                                    .count()
                            });
                        prop_assert_eq!(found, Some(1));
                    }
                }
            }
        }
    }
}
