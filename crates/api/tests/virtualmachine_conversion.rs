#![forbid(unsafe_code)]

use chrono::{TimeZone, Utc};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use vmop_api::{v1alpha1 as spoke, v1alpha4 as hub};
use vmop_core::condition;
use vmop_core::{Condition, ConditionStatus, Convertible};
use vmop_hubdata::HUB_DATA_ANNOTATION;

fn t(secs: i64) -> Option<Time> {
    Some(Time(Utc.timestamp_opt(secs, 0).unwrap()))
}

fn annotations(pairs: &[(&str, &str)]) -> Option<std::collections::BTreeMap<String, String>> {
    Some(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
}

fn down(hub: &hub::VirtualMachine) -> spoke::VirtualMachine {
    spoke::VirtualMachine::convert_from(hub).unwrap()
}

fn without_snapshot(mut vm: spoke::VirtualMachine) -> spoke::VirtualMachine {
    if let Some(a) = vm.metadata.annotations.as_mut() {
        a.remove(HUB_DATA_ANNOTATION);
        if a.is_empty() {
            vm.metadata.annotations = None;
        }
    }
    vm
}

fn full_hub() -> hub::VirtualMachine {
    hub::VirtualMachine {
        metadata: ObjectMeta {
            name: Some("my-vm".into()),
            namespace: Some("ns".into()),
            generation: Some(3),
            annotations: annotations(&[
                (hub::PAUSE_ANNOTATION, "true"),
                (hub::V1ALPHA1_CONFIGMAP_TRANSPORT_ANNOTATION, "true"),
            ]),
            ..Default::default()
        },
        spec: hub::VirtualMachineSpec {
            image_name: "photon-5".into(),
            image: Some(hub::VirtualMachineImageRef { kind: "VirtualMachineImage".into(), name: "vmi-0123".into() }),
            class_name: "best-effort-small".into(),
            storage_class: "wcp-policy".into(),
            bootstrap: Some(hub::VirtualMachineBootstrapSpec {
                cloud_init: Some(hub::VirtualMachineBootstrapCloudInitSpec {
                    instance_id: "iid-1".into(),
                    raw_cloud_config: Some(hub::SecretKeySelector { name: "my-cm".into(), key: "user-data".into() }),
                    ssh_authorized_keys: vec!["ssh-ed25519 AAAA".into()],
                    ..Default::default()
                }),
                ..Default::default()
            }),
            network: Some(hub::VirtualMachineNetworkSpec {
                host_name: "my-vm-host".into(),
                nameservers: vec!["8.8.8.8".into()],
                interfaces: vec![hub::VirtualMachineNetworkInterfaceSpec {
                    name: "eth0".into(),
                    network: Some(hub::PartialObjectRef {
                        api_version: "netoperator.vmware.com/v1alpha1".into(),
                        kind: "Network".into(),
                        name: "primary".into(),
                    }),
                    gateway4: "10.0.0.1".into(),
                    ..Default::default()
                }],
                ..Default::default()
            }),
            power_state: Some(hub::VirtualMachinePowerState::PoweredOn),
            power_off_mode: Some(hub::VirtualMachinePowerOpMode::TrySoft),
            volumes: vec![hub::VirtualMachineVolume {
                name: "data".into(),
                persistent_volume_claim: Some(hub::PersistentVolumeClaimVolumeSource {
                    claim_name: "data-pvc".into(),
                    ..Default::default()
                }),
            }],
            readiness_probe: Some(hub::VirtualMachineReadinessProbeSpec {
                tcp_socket: Some(hub::TcpSocketAction { port: Some(IntOrString::Int(22)), host: String::new() }),
                guest_info: vec![hub::GuestInfoAction { key: "ready".into(), value: "1".into() }],
                ..Default::default()
            }),
            advanced: Some(hub::VirtualMachineAdvancedSpec {
                boot_disk_capacity: Some(Quantity("20Gi".into())),
                default_volume_provisioning_mode: Some(hub::VolumeProvisioningMode::Thin),
                change_block_tracking: Some(true),
            }),
            reserved: Some(hub::VirtualMachineReservedSpec { resource_policy_name: "policy-a".into() }),
            min_hardware_version: 17,
            instance_uuid: "inst-uuid".into(),
            guest_id: "vmwarePhoton64Guest".into(),
            crypto: Some(hub::VirtualMachineCryptoSpec {
                encryption_class_name: "default".into(),
                use_default_key_provider: Some(true),
            }),
            ..Default::default()
        },
        status: Some(hub::VirtualMachineStatus {
            class: Some(hub::LocalObjectRef { name: "best-effort-small".into(), ..Default::default() }),
            node_name: "esx-1".into(),
            power_state: Some(hub::VirtualMachinePowerState::PoweredOn),
            conditions: vec![
                Condition::new(hub::VIRTUAL_MACHINE_CONDITION_CLASS_READY, ConditionStatus::True).at(t(100)),
                Condition::new(hub::VIRTUAL_MACHINE_CONDITION_IMAGE_READY, ConditionStatus::True).at(t(110)),
                Condition::new(hub::VIRTUAL_MACHINE_CONDITION_CREATED, ConditionStatus::True).at(t(120)),
            ],
            network: Some(hub::VirtualMachineNetworkStatus {
                primary_ip4: "10.0.0.5".into(),
                interfaces: vec![hub::VirtualMachineNetworkInterfaceStatus {
                    name: "eth0".into(),
                    ip: Some(hub::VirtualMachineNetworkInterfaceIpStatus {
                        addresses: vec![hub::VirtualMachineNetworkInterfaceIpAddrStatus {
                            address: "10.0.0.5/24".into(),
                        }],
                        mac_addr: "00:50:56:00:00:01".into(),
                    }),
                }],
                ..Default::default()
            }),
            unique_id: "vm-42".into(),
            volumes: vec![
                hub::VirtualMachineVolumeStatus {
                    name: "data".into(),
                    attached: true,
                    disk_uuid: "disk-1".into(),
                    type_: Some(hub::VirtualMachineStorageDiskType::Managed),
                    ..Default::default()
                },
                hub::VirtualMachineVolumeStatus {
                    name: "root".into(),
                    attached: true,
                    type_: Some(hub::VirtualMachineStorageDiskType::Classic),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }),
    }
}

fn legacy_spoke() -> spoke::VirtualMachine {
    spoke::VirtualMachine {
        metadata: ObjectMeta {
            name: Some("legacy".into()),
            generation: Some(1),
            annotations: annotations(&[(spoke::PAUSE_RECONCILE_ANNOTATION, "true")]),
            ..Default::default()
        },
        spec: spoke::VirtualMachineSpec {
            image_name: "ubuntu-22".into(),
            class_name: "small".into(),
            power_state: "poweredOn".into(),
            vm_metadata: Some(spoke::VirtualMachineMetadata {
                config_map_name: "bootstrap".into(),
                transport: Some(spoke::VirtualMachineMetadataTransport::OvfEnv),
                ..Default::default()
            }),
            network_interfaces: vec![spoke::VirtualMachineNetworkInterface {
                network_type: "nsx-t".into(),
                network_name: "vnet".into(),
                ..Default::default()
            }],
            resource_policy_name: "rp-1".into(),
            volumes: vec![spoke::VirtualMachineVolume {
                name: "data".into(),
                persistent_volume_claim: Some(spoke::PersistentVolumeClaimVolumeSource {
                    claim_name: "data-pvc".into(),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            readiness_probe: Some(spoke::Probe {
                tcp_socket: Some(spoke::TcpSocketAction { port: Some(IntOrString::Int(22)), host: String::new() }),
                period_seconds: 10,
                ..Default::default()
            }),
            advanced_options: Some(spoke::VirtualMachineAdvancedOptions {
                default_volume_provisioning_options: Some(spoke::VirtualMachineVolumeProvisioningOptions {
                    thin_provisioned: Some(false),
                    eager_zeroed: None,
                }),
                change_block_tracking: Some(true),
            }),
            ..Default::default()
        },
        status: Some(spoke::VirtualMachineStatus {
            host: "esx-2".into(),
            power_state: "poweredOn".into(),
            phase: Some(spoke::VmStatusPhase::Created),
            conditions: vec![spoke::Condition {
                type_: spoke::VIRTUAL_MACHINE_PREREQ_READY_CONDITION.into(),
                status: ConditionStatus::True,
                last_transition_time: t(50),
                ..Default::default()
            }],
            vm_ip: "fd00::10".into(),
            volumes: vec![spoke::VirtualMachineVolumeStatus {
                name: "data".into(),
                attached: true,
                disk_uuid: "disk-9".into(),
                ..Default::default()
            }],
            network_interfaces: vec![spoke::NetworkInterfaceStatus {
                connected: true,
                mac_address: "00:50:56:00:00:09".into(),
                ip_addresses: vec!["fd00::10".into()],
            }],
            ..Default::default()
        }),
    }
}

#[test]
fn empty_hub_round_trips_without_snapshot() {
    let hub = hub::VirtualMachine::default();
    let spoke = down(&hub);
    assert!(spoke.metadata.annotations.is_none());
    assert_eq!(spoke.convert_to().unwrap(), hub);
}

#[test]
fn full_hub_round_trips_exactly() {
    let hub = full_hub();
    let spoke = down(&hub);

    assert_eq!(spoke.spec.image_name, "photon-5");
    assert_eq!(spoke.spec.power_state, "poweredOn");
    assert_eq!(spoke.spec.power_off_mode, "trySoft");
    let md = spoke.spec.vm_metadata.as_ref().unwrap();
    assert_eq!(md.config_map_name, "my-cm");
    assert_eq!(md.transport, Some(spoke::VirtualMachineMetadataTransport::CloudInit));
    assert_eq!(spoke.spec.network_interfaces[0].network_type, "vsphere-distributed");
    assert_eq!(spoke.spec.resource_policy_name, "policy-a");
    assert!(spoke.spec.volumes.iter().any(|v| v.name == spoke::BOOT_DISK_VOLUME_NAME));
    let a = spoke.metadata.annotations.as_ref().unwrap();
    assert!(a.contains_key(spoke::PAUSE_RECONCILE_ANNOTATION));
    assert!(!a.contains_key(hub::PAUSE_ANNOTATION));
    assert!(!a.contains_key(hub::V1ALPHA1_CONFIGMAP_TRANSPORT_ANNOTATION));
    assert!(a.contains_key(HUB_DATA_ANNOTATION));

    let status = spoke.status.as_ref().unwrap();
    assert_eq!(status.host, "esx-1");
    assert_eq!(status.vm_ip, "10.0.0.5");
    assert_eq!(status.phase, Some(spoke::VmStatusPhase::Created));
    assert_eq!(status.volumes.len(), 1);
    let prereq = condition::find(&status.conditions, spoke::VIRTUAL_MACHINE_PREREQ_READY_CONDITION).unwrap();
    assert_eq!(prereq.status, ConditionStatus::True);

    assert_eq!(spoke.convert_to().unwrap(), hub);
}

#[test]
fn legacy_spoke_survives_hub_and_back() {
    let original = legacy_spoke();
    let hub = original.convert_to().unwrap();

    assert_eq!(hub.spec.image.as_ref().map(|i| i.name.as_str()), Some("ubuntu-22"));
    let bootstrap = hub.spec.bootstrap.as_ref().unwrap();
    assert!(bootstrap.linux_prep.is_some());
    assert_eq!(bootstrap.vapp_config.as_ref().unwrap().raw_properties, "bootstrap");
    let nic = &hub.spec.network.as_ref().unwrap().interfaces[0];
    assert_eq!(nic.name, "eth0");
    assert_eq!(nic.network.as_ref().unwrap().kind, "VirtualNetwork");
    assert_eq!(
        hub.spec.advanced.as_ref().unwrap().default_volume_provisioning_mode,
        Some(hub::VolumeProvisioningMode::Thick)
    );
    let hub_status = hub.status.as_ref().unwrap();
    assert_eq!(hub_status.network.as_ref().unwrap().primary_ip6, "fd00::10");
    assert_eq!(hub_status.volumes[0].type_, Some(hub::VirtualMachineStorageDiskType::Managed));
    let hub_annotations = hub.metadata.annotations.as_ref().unwrap();
    assert!(hub_annotations.contains_key(hub::PAUSE_ANNOTATION));
    assert!(hub_annotations.contains_key(hub::V1ALPHA1_CONFIGMAP_TRANSPORT_ANNOTATION));

    let back = without_snapshot(down(&hub));
    assert_eq!(back.metadata, original.metadata);
    assert_eq!(back.spec, original.spec);
    let (before, after) = (original.status.unwrap(), back.status.unwrap());
    assert_eq!(after.host, before.host);
    assert_eq!(after.phase, before.phase);
    assert_eq!(after.vm_ip, before.vm_ip);
    assert_eq!(after.volumes, before.volumes);
    assert_eq!(after.network_interfaces, before.network_interfaces);
    let prereq = condition::find(&after.conditions, spoke::VIRTUAL_MACHINE_PREREQ_READY_CONDITION).unwrap();
    assert_eq!(prereq.status, ConditionStatus::True);
    assert_eq!(prereq.last_transition_time, t(50));
}

#[test]
fn true_aggregate_without_snapshot_becomes_class_and_image_ready() {
    let mut vm = spoke::VirtualMachine::new("vm", Default::default());
    vm.status = Some(spoke::VirtualMachineStatus {
        conditions: vec![spoke::Condition {
            type_: spoke::VIRTUAL_MACHINE_PREREQ_READY_CONDITION.into(),
            status: ConditionStatus::True,
            last_transition_time: t(7),
            ..Default::default()
        }],
        ..Default::default()
    });

    let hub = vm.convert_to().unwrap();
    let conds = &hub.status.as_ref().unwrap().conditions;
    assert_eq!(conds.len(), 2);
    let class = condition::find(conds, hub::VIRTUAL_MACHINE_CONDITION_CLASS_READY).unwrap();
    let image = condition::find(conds, hub::VIRTUAL_MACHINE_CONDITION_IMAGE_READY).unwrap();
    assert!(class.is_true() && image.is_true());
    assert_eq!(class.last_transition_time, t(7));

    let back = down(&hub);
    let status = back.status.unwrap();
    let prereq = condition::find(&status.conditions, spoke::VIRTUAL_MACHINE_PREREQ_READY_CONDITION).unwrap();
    assert_eq!(prereq.status, ConditionStatus::True);
    assert!(prereq.reason.is_empty() && prereq.message.is_empty());
    assert_eq!(status.phase, Some(spoke::VmStatusPhase::Created));
}

#[test]
fn false_aggregate_with_class_reason_blames_class() {
    let mut vm = spoke::VirtualMachine::new("vm", Default::default());
    vm.status = Some(spoke::VirtualMachineStatus {
        conditions: vec![spoke::Condition {
            type_: spoke::VIRTUAL_MACHINE_PREREQ_READY_CONDITION.into(),
            status: ConditionStatus::False,
            severity: spoke::CONDITION_SEVERITY_ERROR.into(),
            reason: "ClassNotFound".into(),
            message: "class small not found".into(),
            ..Default::default()
        }],
        ..Default::default()
    });

    let hub = vm.convert_to().unwrap();
    let conds = &hub.status.as_ref().unwrap().conditions;
    let class = condition::find(conds, hub::VIRTUAL_MACHINE_CONDITION_CLASS_READY).unwrap();
    assert_eq!(class.status, ConditionStatus::False);
    assert_eq!(class.reason, "ClassNotFound");
    assert_eq!(class.message, "class small not found");
    let image = condition::find(conds, hub::VIRTUAL_MACHINE_CONDITION_IMAGE_READY).unwrap();
    assert_eq!(image.status, ConditionStatus::Unknown);

    let status = down(&hub).status.unwrap();
    let prereq = condition::find(&status.conditions, spoke::VIRTUAL_MACHINE_PREREQ_READY_CONDITION).unwrap();
    assert_eq!(prereq.status, ConditionStatus::False);
    assert_eq!(prereq.reason, "ClassNotFound");
    assert_eq!(status.phase, Some(spoke::VmStatusPhase::Unknown));
}

#[test]
fn snapshot_suppresses_condition_synthesis() {
    let mut hub = hub::VirtualMachine::new("vm", Default::default());
    hub.status = Some(hub::VirtualMachineStatus {
        conditions: vec![Condition::new(hub::VIRTUAL_MACHINE_CONDITION_CLASS_READY, ConditionStatus::False)],
        ..Default::default()
    });
    let spoke = down(&hub);
    let back = spoke.convert_to().unwrap();
    assert_eq!(back, hub);
}

#[test]
fn boot_disk_capacity_survives_without_snapshot() {
    let mut hub = hub::VirtualMachine::new("vm", Default::default());
    hub.spec.advanced =
        Some(hub::VirtualMachineAdvancedSpec { boot_disk_capacity: Some(Quantity("10Gi".into())), ..Default::default() });

    let first = without_snapshot(down(&hub));
    let sentinel = first.spec.volumes.iter().find(|v| v.name == spoke::BOOT_DISK_VOLUME_NAME).unwrap();
    let vsphere = sentinel.vsphere_volume.as_ref().unwrap();
    assert_eq!(vsphere.device_key, Some(spoke::BOOT_DISK_DEVICE_KEY));
    assert_eq!(vsphere.capacity.get("ephemeral-storage"), Some(&Quantity("10Gi".into())));

    let up = first.convert_to().unwrap();
    assert_eq!(up, hub);
    assert!(up.spec.volumes.is_empty());

    let second = without_snapshot(down(&up));
    assert_eq!(second, first);
    assert_eq!(second.convert_to().unwrap(), hub);
}

#[test]
fn unknown_enum_values_pass_through() {
    let mut vm = spoke::VirtualMachine::new("vm", Default::default());
    vm.spec.power_state = "hibernated".into();
    vm.spec.restart_mode = "gentle".into();

    let hub = vm.convert_to().unwrap();
    assert_eq!(hub.spec.power_state, Some(hub::VirtualMachinePowerState::Other("hibernated".into())));
    let back = down(&hub);
    assert_eq!(back.spec.power_state, "hibernated");
    assert_eq!(back.spec.restart_mode, "gentle");
}

#[test]
fn spoke_edits_win_over_stale_snapshot() {
    let mut spoke = down(&full_hub());
    spoke.spec.image_name = "photon-6".into();
    spoke.spec.network_interfaces =
        vec![spoke::VirtualMachineNetworkInterface { network_type: "nsx-t-subnet".into(), network_name: "sub".into(), ..Default::default() }];
    spoke.spec.resource_policy_name = String::new();

    let hub = spoke.convert_to().unwrap();
    assert_eq!(hub.spec.image_name, "photon-6");
    assert_eq!(hub.spec.image.as_ref().unwrap().name, "photon-6");
    let network = hub.spec.network.as_ref().unwrap();
    assert_eq!(network.interfaces.len(), 1);
    assert_eq!(network.interfaces[0].network.as_ref().unwrap().kind, "Subnet");
    assert!(network.interfaces[0].gateway4.is_empty());
    assert_eq!(network.host_name, "my-vm-host");
    assert!(hub.spec.reserved.is_none());
    // Hub-only fields still come back.
    assert_eq!(hub.spec.instance_uuid, "inst-uuid");
    assert_eq!(hub.spec.bootstrap.as_ref().unwrap().cloud_init.as_ref().unwrap().instance_id, "iid-1");
}

#[test]
fn renamed_bootstrap_object_keeps_snapshot_detail() {
    let mut spoke = down(&full_hub());
    spoke.spec.vm_metadata.as_mut().unwrap().config_map_name = "other-cm".into();

    let hub = spoke.convert_to().unwrap();
    let ci = hub.spec.bootstrap.as_ref().unwrap().cloud_init.as_ref().unwrap();
    assert_eq!(ci.raw_cloud_config.as_ref().unwrap().name, "other-cm");
    assert_eq!(ci.ssh_authorized_keys, vec!["ssh-ed25519 AAAA".to_string()]);
}

#[test]
fn malformed_snapshot_is_treated_as_absent() {
    let mut vm = legacy_spoke();
    vm.metadata
        .annotations
        .get_or_insert_with(Default::default)
        .insert(HUB_DATA_ANNOTATION.into(), "v1:{not json".into());
    let hub = vm.convert_to().unwrap();
    assert!(!hub.metadata.annotations.as_ref().unwrap().contains_key(HUB_DATA_ANNOTATION));
    let conds = &hub.status.as_ref().unwrap().conditions;
    assert!(condition::find(conds, hub::VIRTUAL_MACHINE_CONDITION_CLASS_READY).is_some());
}

#[test]
fn conversion_does_not_touch_its_input() {
    let hub = full_hub();
    let before = hub.clone();
    let spoke = down(&hub);
    let spoke_before = spoke.clone();
    spoke.convert_to().unwrap();
    assert_eq!(hub, before);
    assert_eq!(spoke, spoke_before);
}

#[test]
fn replaced_readiness_probe_drops_snapshot_guest_info() {
    let mut spoke = down(&full_hub());
    spoke.spec.readiness_probe = Some(spoke::Probe {
        tcp_socket: Some(spoke::TcpSocketAction { port: Some(IntOrString::Int(2222)), host: String::new() }),
        ..Default::default()
    });

    let hub = spoke.convert_to().unwrap();
    let probe = hub.spec.readiness_probe.as_ref().unwrap();
    assert_eq!(probe.tcp_socket.as_ref().unwrap().port, Some(IntOrString::Int(2222)));
    assert!(probe.guest_info.is_empty());

    let untouched = down(&full_hub()).convert_to().unwrap();
    assert_eq!(untouched.spec.readiness_probe.unwrap().guest_info.len(), 1);
}

/// Severity has no hub field, so a spoke-created condition comes back
/// without it; everything else on the condition survives.
#[test]
fn legacy_condition_severity_is_not_carried_through_hub() {
    let guest = spoke::Condition {
        type_: "GuestCustomization".into(),
        status: ConditionStatus::False,
        severity: spoke::CONDITION_SEVERITY_WARNING.into(),
        last_transition_time: t(30),
        reason: "GuestCustomizationPending".into(),
        message: "waiting for tools".into(),
    };
    let mut vm = spoke::VirtualMachine::new("vm", Default::default());
    vm.status = Some(spoke::VirtualMachineStatus { conditions: vec![guest.clone()], ..Default::default() });

    let back = without_snapshot(down(&vm.convert_to().unwrap()));
    let conds = back.status.unwrap().conditions;
    let after = condition::find(&conds, "GuestCustomization").unwrap();
    assert!(after.severity.is_empty());
    assert_eq!(*after, spoke::Condition { severity: String::new(), ..guest });
}
