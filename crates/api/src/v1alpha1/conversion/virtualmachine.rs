//! v1alpha1 <-> hub VirtualMachine.
//!
//! Both directions run the same fixed pipeline: a structural copy of every
//! field sharing a wire name, explicit overrides for fields whose shape or
//! meaning changed, condition translation, and finally the side channel
//! (restore on the way up, snapshot on the way down).

use std::collections::BTreeMap;
use std::net::IpAddr;

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use tracing::trace;
use vmop_core::{structural, Annotations, ConversionResult, Convertible, EnumTable};

use super::conditions::{self, Requested};
use crate::v1alpha1 as spoke;
use crate::v1alpha1::VirtualMachineMetadataTransport as Transport;
use crate::v1alpha4 as hub;
use crate::restore_hub_only;

/// v1alpha1 annotation pausing reconciliation; renamed at the hub.
pub const PAUSE_RECONCILE_ANNOTATION: &str = "vmoperator.vmware.com/pause-reconcile";

/// Sentinel volume carrying the hub boot disk capacity at v1alpha1.
pub const BOOT_DISK_VOLUME_NAME: &str = "vmoperator-vm-boot-disk";
pub const BOOT_DISK_DEVICE_KEY: i32 = 2000;
const EPHEMERAL_STORAGE: &str = "ephemeral-storage";

const CLOUD_INIT_USER_DATA_KEY: &str = "user-data";
const CLOUD_INIT_EXTRA_CONFIG_KEY: &str = "guestinfo.userdata";
const SYSPREP_UNATTEND_KEY: &str = "unattend";

/// Legacy network type next to the typed reference it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkProvider {
    pub network_type: &'static str,
    pub api_version: &'static str,
    pub kind: &'static str,
}

pub const NETWORK_PROVIDERS: &[NetworkProvider] = &[
    NetworkProvider {
        network_type: "vsphere-distributed",
        api_version: "netoperator.vmware.com/v1alpha1",
        kind: "Network",
    },
    NetworkProvider { network_type: "nsx-t", api_version: "vmware.com/v1alpha1", kind: "VirtualNetwork" },
    NetworkProvider { network_type: "nsx-t-subnet", api_version: "crd.nsx.vmware.com/v1alpha1", kind: "Subnet" },
    NetworkProvider {
        network_type: "nsx-t-subnetset",
        api_version: "crd.nsx.vmware.com/v1alpha1",
        kind: "SubnetSet",
    },
];

static POWER_STATES: EnumTable<hub::VirtualMachinePowerState> = EnumTable::new(
    "powerState",
    &[
        ("poweredOff", hub::VirtualMachinePowerState::PoweredOff),
        ("poweredOn", hub::VirtualMachinePowerState::PoweredOn),
        ("suspended", hub::VirtualMachinePowerState::Suspended),
    ],
);

static POWER_OP_MODES: EnumTable<hub::VirtualMachinePowerOpMode> = EnumTable::new(
    "powerOpMode",
    &[
        ("hard", hub::VirtualMachinePowerOpMode::Hard),
        ("soft", hub::VirtualMachinePowerOpMode::Soft),
        ("trySoft", hub::VirtualMachinePowerOpMode::TrySoft),
    ],
);

impl Convertible for spoke::VirtualMachine {
    type Hub = hub::VirtualMachine;

    fn convert_to(&self) -> ConversionResult<hub::VirtualMachine> {
        let mut dst: hub::VirtualMachine = structural::copy(self)?;
        dst.metadata = up_metadata(&self.metadata, &self.spec);
        up_spec(&self.spec, self.metadata.generation.unwrap_or_default(), &mut dst.spec);
        if let (Some(src), Some(status)) = (&self.status, dst.status.as_mut()) {
            up_status(src, status);
        }

        let snapshot = vmop_hubdata::read_lenient::<hub::VirtualMachine>(&self.metadata);
        let requested = Requested {
            resource_policy: !self.spec.resource_policy_name.is_empty(),
            bootstrap: dst.spec.bootstrap.is_some(),
        };
        if let Some(status) = dst.status.as_mut() {
            if snapshot.is_some() {
                conditions::strip_prereq(&mut status.conditions);
            } else {
                conditions::expand_prereq(&mut status.conditions, requested);
            }
        }

        if let Some(snapshot) = &snapshot {
            trace!(name = ?self.metadata.name, "restoring virtual machine from hub snapshot");
            restore_spec(&mut dst.spec, &snapshot.spec, self, &Annotations::of(&dst.metadata));
            if let Some(snap) = &snapshot.status {
                restore_status(dst.status.get_or_insert_with(Default::default), snap, self.status.as_ref());
            }
        }
        Ok(dst)
    }

    fn convert_from(hub: &hub::VirtualMachine) -> ConversionResult<Self> {
        let mut dst: Self = structural::copy(hub)?;
        let annotations = Annotations::of(&hub.metadata);
        down_spec(&hub.spec, &annotations, &mut dst.spec);
        if let (Some(src), Some(status)) = (&hub.status, dst.status.as_mut()) {
            down_status(src, status);
        }
        annotations
            .without(hub::V1ALPHA1_CONFIGMAP_TRANSPORT_ANNOTATION)
            .renamed(hub::PAUSE_ANNOTATION, PAUSE_RECONCILE_ANNOTATION)
            .apply_to(&mut dst.metadata);
        vmop_hubdata::write(hub, &mut dst.metadata)?;
        Ok(dst)
    }
}

fn up_metadata(meta: &ObjectMeta, spec: &spoke::VirtualMachineSpec) -> ObjectMeta {
    let mut out = meta.clone();
    let mut annotations = Annotations::of(meta)
        .without(vmop_hubdata::HUB_DATA_ANNOTATION)
        .renamed(PAUSE_RECONCILE_ANNOTATION, hub::PAUSE_ANNOTATION);
    if spec.vm_metadata.as_ref().is_some_and(|md| !md.config_map_name.is_empty()) {
        annotations = annotations.with_default(hub::V1ALPHA1_CONFIGMAP_TRANSPORT_ANNOTATION, "true");
    }
    annotations.apply_to(&mut out);
    out
}

fn up_spec(src: &spoke::VirtualMachineSpec, generation: i64, dst: &mut hub::VirtualMachineSpec) {
    dst.power_state = POWER_STATES.up(&src.power_state);
    dst.power_off_mode = POWER_OP_MODES.up(&src.power_off_mode);
    dst.suspend_mode = POWER_OP_MODES.up(&src.suspend_mode);
    dst.restart_mode = POWER_OP_MODES.up(&src.restart_mode);

    // A freshly created object has no generation yet; the image reference
    // is only inferred for objects that already exist.
    dst.image = (generation > 0 && !src.image_name.is_empty())
        .then(|| hub::VirtualMachineImageRef { name: src.image_name.clone(), ..Default::default() });

    dst.bootstrap = vm_metadata_to_bootstrap(src.vm_metadata.as_ref());
    dst.network = (!src.network_interfaces.is_empty()).then(|| hub::VirtualMachineNetworkSpec {
        interfaces: src.network_interfaces.iter().enumerate().map(|(i, nic)| up_interface(i, nic)).collect(),
        ..Default::default()
    });
    dst.volumes.retain(|v| v.persistent_volume_claim.is_some());
    if dst.readiness_probe.as_ref().is_some_and(|p| *p == Default::default()) {
        dst.readiness_probe = None;
    }
    dst.advanced = up_advanced(src.advanced_options.as_ref(), &src.volumes);
    dst.reserved = (!src.resource_policy_name.is_empty())
        .then(|| hub::VirtualMachineReservedSpec { resource_policy_name: src.resource_policy_name.clone() });
}

fn down_spec(src: &hub::VirtualMachineSpec, annotations: &Annotations, dst: &mut spoke::VirtualMachineSpec) {
    dst.power_state = POWER_STATES.down(src.power_state.as_ref());
    dst.power_off_mode = POWER_OP_MODES.down(src.power_off_mode.as_ref());
    dst.suspend_mode = POWER_OP_MODES.down(src.suspend_mode.as_ref());
    dst.restart_mode = POWER_OP_MODES.down(src.restart_mode.as_ref());

    dst.image_name = down_image_name(src);
    dst.vm_metadata = bootstrap_to_vm_metadata(src.bootstrap.as_ref(), annotations);
    dst.network_interfaces = down_interfaces(src.network.as_ref());
    dst.readiness_probe = down_probe(src.readiness_probe.as_ref());
    dst.advanced_options = down_advanced(src.advanced.as_ref());
    dst.resource_policy_name = down_resource_policy(src.reserved.as_ref());
    if let Some(capacity) = src.advanced.as_ref().and_then(|a| a.boot_disk_capacity.as_ref()) {
        dst.volumes.push(boot_disk_volume(capacity));
    }
}

fn up_status(src: &spoke::VirtualMachineStatus, dst: &mut hub::VirtualMachineStatus) {
    dst.power_state = POWER_STATES.up(&src.power_state);
    dst.node_name = src.host.clone();
    dst.network = up_network_status(src);
    for (vol, legacy) in dst.volumes.iter_mut().zip(&src.volumes) {
        vol.disk_uuid = legacy.disk_uuid.clone();
        vol.type_.get_or_insert(hub::VirtualMachineStorageDiskType::Managed);
    }
}

fn down_status(src: &hub::VirtualMachineStatus, dst: &mut spoke::VirtualMachineStatus) {
    dst.power_state = POWER_STATES.down(src.power_state.as_ref());
    dst.host = src.node_name.clone();
    let (vm_ip, interfaces, host_name) = down_network_status(src.network.as_ref());
    dst.vm_ip = vm_ip;
    dst.network_interfaces = interfaces;
    dst.host_name = host_name;
    dst.volumes = down_volume_statuses(&src.volumes);
    dst.phase = Some(conditions::derive_prereq(&src.conditions, &mut dst.conditions));
}

fn down_image_name(src: &hub::VirtualMachineSpec) -> String {
    match (&src.image_name, &src.image) {
        (name, Some(image)) if name.is_empty() => image.name.clone(),
        (name, _) => name.clone(),
    }
}

fn up_interface(index: usize, nic: &spoke::VirtualMachineNetworkInterface) -> hub::VirtualMachineNetworkInterfaceSpec {
    let network = (!nic.network_name.is_empty() || !nic.network_type.is_empty()).then(|| {
        let (api_version, kind) = match NETWORK_PROVIDERS.iter().find(|p| p.network_type == nic.network_type) {
            Some(p) => (p.api_version.to_owned(), p.kind.to_owned()),
            // An unrecognised network type travels verbatim as the kind.
            None => (String::new(), nic.network_type.clone()),
        };
        hub::PartialObjectRef { api_version, kind, name: nic.network_name.clone() }
    });
    hub::VirtualMachineNetworkInterfaceSpec { name: format!("eth{index}"), network, ..Default::default() }
}

fn down_interfaces(network: Option<&hub::VirtualMachineNetworkSpec>) -> Vec<spoke::VirtualMachineNetworkInterface> {
    let Some(network) = network else {
        return Vec::new();
    };
    network
        .interfaces
        .iter()
        .map(|nic| {
            let Some(net) = &nic.network else {
                return spoke::VirtualMachineNetworkInterface::default();
            };
            spoke::VirtualMachineNetworkInterface {
                network_name: net.name.clone(),
                network_type: NETWORK_PROVIDERS
                    .iter()
                    .find(|p| p.kind == net.kind)
                    .map_or_else(|| net.kind.clone(), |p| p.network_type.to_owned()),
                ..Default::default()
            }
        })
        .collect()
}

fn vm_metadata_to_bootstrap(md: Option<&spoke::VirtualMachineMetadata>) -> Option<hub::VirtualMachineBootstrapSpec> {
    let md = md?;
    let name = if md.secret_name.is_empty() { &md.config_map_name } else { &md.secret_name };
    let selector = |key: &str| {
        (!name.is_empty()).then(|| hub::SecretKeySelector { name: name.clone(), key: key.to_owned() })
    };
    let cloud_init = |key| hub::VirtualMachineBootstrapCloudInitSpec {
        raw_cloud_config: selector(key),
        ..Default::default()
    };
    let vapp = || hub::VirtualMachineBootstrapVAppConfigSpec { raw_properties: name.clone(), ..Default::default() };

    let mut out = hub::VirtualMachineBootstrapSpec::default();
    match md.transport.as_ref()? {
        Transport::ExtraConfig => out.cloud_init = Some(cloud_init(CLOUD_INIT_EXTRA_CONFIG_KEY)),
        Transport::CloudInit => out.cloud_init = Some(cloud_init(CLOUD_INIT_USER_DATA_KEY)),
        Transport::Sysprep => {
            out.sysprep = Some(hub::VirtualMachineBootstrapSysprepSpec {
                raw_sysprep: selector(SYSPREP_UNATTEND_KEY),
                ..Default::default()
            })
        }
        Transport::OvfEnv => {
            out.linux_prep = Some(Default::default());
            out.vapp_config = Some(vapp());
        }
        Transport::VAppConfig => out.vapp_config = Some(vapp()),
        Transport::Other(_) => return None,
    }
    Some(out)
}

/// Hub bootstrap -> legacy metadata. The object name is routed to the
/// ConfigMap slot when the object was created at v1alpha1 with a ConfigMap.
fn bootstrap_to_vm_metadata(
    bootstrap: Option<&hub::VirtualMachineBootstrapSpec>,
    annotations: &Annotations,
) -> Option<spoke::VirtualMachineMetadata> {
    let b = bootstrap?;
    let selector_name = |s: &Option<hub::SecretKeySelector>| s.as_ref().map(|s| s.name.clone()).unwrap_or_default();
    let (transport, name) = if let Some(ci) = &b.cloud_init {
        let transport = match &ci.raw_cloud_config {
            Some(sel) if sel.key == CLOUD_INIT_EXTRA_CONFIG_KEY => Transport::ExtraConfig,
            _ => Transport::CloudInit,
        };
        (transport, selector_name(&ci.raw_cloud_config))
    } else if let Some(sysprep) = &b.sysprep {
        (Transport::Sysprep, selector_name(&sysprep.raw_sysprep))
    } else if let Some(vapp) = &b.vapp_config {
        let transport = if b.linux_prep.is_some() { Transport::OvfEnv } else { Transport::VAppConfig };
        (transport, vapp.raw_properties.clone())
    } else {
        return None;
    };

    let mut md = spoke::VirtualMachineMetadata { transport: Some(transport), ..Default::default() };
    if !name.is_empty() {
        if annotations.contains(hub::V1ALPHA1_CONFIGMAP_TRANSPORT_ANNOTATION) {
            md.config_map_name = name;
        } else {
            md.secret_name = name;
        }
    }
    Some(md)
}

fn down_probe(probe: Option<&hub::VirtualMachineReadinessProbeSpec>) -> Option<spoke::Probe> {
    let probe = probe.filter(|p| **p != Default::default())?;
    Some(spoke::Probe {
        tcp_socket: probe
            .tcp_socket
            .as_ref()
            .map(|t| spoke::TcpSocketAction { port: t.port.clone(), host: t.host.clone() }),
        guest_heartbeat: probe.guest_heartbeat.as_ref().map(|g| spoke::GuestHeartbeatAction {
            threshold_status: g.threshold_status.as_ref().map(|s| s.to_string()).unwrap_or_default(),
        }),
        timeout_seconds: probe.timeout_seconds,
        period_seconds: probe.period_seconds,
    })
}

fn up_advanced(
    opts: Option<&spoke::VirtualMachineAdvancedOptions>,
    volumes: &[spoke::VirtualMachineVolume],
) -> Option<hub::VirtualMachineAdvancedSpec> {
    let opts = opts.filter(|o| **o != Default::default());
    let boot_disk_capacity = boot_disk_capacity(volumes);
    if opts.is_none() && boot_disk_capacity.is_none() {
        return None;
    }
    let mut out = hub::VirtualMachineAdvancedSpec { boot_disk_capacity, ..Default::default() };
    if let Some(opts) = opts {
        out.change_block_tracking = opts.change_block_tracking;
        out.default_volume_provisioning_mode =
            opts.default_volume_provisioning_options.as_ref().and_then(|p| match (p.thin_provisioned, p.eager_zeroed) {
                (Some(true), _) => Some(hub::VolumeProvisioningMode::Thin),
                (Some(false), _) => Some(hub::VolumeProvisioningMode::Thick),
                (None, Some(true)) => Some(hub::VolumeProvisioningMode::ThickEagerZero),
                (None, _) => None,
            });
    }
    Some(out)
}

fn down_advanced(advanced: Option<&hub::VirtualMachineAdvancedSpec>) -> Option<spoke::VirtualMachineAdvancedOptions> {
    let advanced = advanced?;
    let provisioning = match &advanced.default_volume_provisioning_mode {
        Some(hub::VolumeProvisioningMode::Thin) => {
            Some(spoke::VirtualMachineVolumeProvisioningOptions { thin_provisioned: Some(true), eager_zeroed: None })
        }
        Some(hub::VolumeProvisioningMode::Thick) => {
            Some(spoke::VirtualMachineVolumeProvisioningOptions { thin_provisioned: Some(false), eager_zeroed: None })
        }
        Some(hub::VolumeProvisioningMode::ThickEagerZero) => {
            Some(spoke::VirtualMachineVolumeProvisioningOptions { thin_provisioned: None, eager_zeroed: Some(true) })
        }
        Some(hub::VolumeProvisioningMode::Other(_)) | None => None,
    };
    let out = spoke::VirtualMachineAdvancedOptions {
        default_volume_provisioning_options: provisioning,
        change_block_tracking: advanced.change_block_tracking,
    };
    (out != Default::default()).then_some(out)
}

fn down_resource_policy(reserved: Option<&hub::VirtualMachineReservedSpec>) -> String {
    reserved.map(|r| r.resource_policy_name.clone()).unwrap_or_default()
}

fn boot_disk_volume(capacity: &Quantity) -> spoke::VirtualMachineVolume {
    spoke::VirtualMachineVolume {
        name: BOOT_DISK_VOLUME_NAME.into(),
        vsphere_volume: Some(spoke::VsphereVolumeSource {
            capacity: BTreeMap::from([(EPHEMERAL_STORAGE.to_owned(), capacity.clone())]),
            device_key: Some(BOOT_DISK_DEVICE_KEY),
        }),
        ..Default::default()
    }
}

/// Capacity of the first vSphere volume recognised as the boot disk, by
/// sentinel name or by the boot disk device key.
fn boot_disk_capacity(volumes: &[spoke::VirtualMachineVolume]) -> Option<Quantity> {
    volumes
        .iter()
        .filter_map(|v| v.vsphere_volume.as_ref().map(|vs| (v, vs)))
        .find(|(v, vs)| v.name == BOOT_DISK_VOLUME_NAME || vs.device_key == Some(BOOT_DISK_DEVICE_KEY))
        .and_then(|(_, vs)| vs.capacity.get(EPHEMERAL_STORAGE).cloned())
}

fn up_network_status(src: &spoke::VirtualMachineStatus) -> Option<hub::VirtualMachineNetworkStatus> {
    if src.vm_ip.is_empty() && src.network_interfaces.is_empty() && src.host_name.is_empty() {
        return None;
    }
    let mut out = hub::VirtualMachineNetworkStatus { host_name: src.host_name.clone(), ..Default::default() };
    if !src.vm_ip.is_empty() {
        match src.vm_ip.parse::<IpAddr>() {
            Ok(IpAddr::V4(_)) => out.primary_ip4 = src.vm_ip.clone(),
            _ => out.primary_ip6 = src.vm_ip.clone(),
        }
    }
    out.interfaces = src
        .network_interfaces
        .iter()
        .map(|nic| hub::VirtualMachineNetworkInterfaceStatus {
            ip: Some(hub::VirtualMachineNetworkInterfaceIpStatus {
                addresses: nic
                    .ip_addresses
                    .iter()
                    .map(|a| hub::VirtualMachineNetworkInterfaceIpAddrStatus { address: a.clone() })
                    .collect(),
                mac_addr: nic.mac_address.clone(),
            }),
            ..Default::default()
        })
        .collect();
    Some(out)
}

fn down_network_status(
    network: Option<&hub::VirtualMachineNetworkStatus>,
) -> (String, Vec<spoke::NetworkInterfaceStatus>, String) {
    let Some(network) = network else {
        return Default::default();
    };
    let vm_ip = if network.primary_ip4.is_empty() { &network.primary_ip6 } else { &network.primary_ip4 };
    let interfaces = network
        .interfaces
        .iter()
        .map(|nic| {
            let ip = nic.ip.clone().unwrap_or_default();
            spoke::NetworkInterfaceStatus {
                connected: true,
                mac_address: ip.mac_addr,
                ip_addresses: ip.addresses.into_iter().map(|a| a.address).collect(),
            }
        })
        .collect();
    (vm_ip.clone(), interfaces, network.host_name.clone())
}

fn down_volume_statuses(volumes: &[hub::VirtualMachineVolumeStatus]) -> Vec<spoke::VirtualMachineVolumeStatus> {
    volumes
        .iter()
        .filter(|v| v.type_ != Some(hub::VirtualMachineStorageDiskType::Classic))
        .map(|v| spoke::VirtualMachineVolumeStatus {
            name: v.name.clone(),
            attached: v.attached,
            disk_uuid: v.disk_uuid.clone(),
            error: v.error.clone(),
        })
        .collect()
}

/// Restores hub-only spec fields unconditionally and shared fields only
/// when the snapshot value still projects to what the spoke carries now.
fn restore_spec(
    dst: &mut hub::VirtualMachineSpec,
    snap: &hub::VirtualMachineSpec,
    src: &spoke::VirtualMachine,
    annotations: &Annotations,
) {
    let cur = &src.spec;
    restore_hub_only!(
        dst,
        snap,
        instance_uuid,
        bios_uuid,
        guest_id,
        cdrom,
        crypto,
        promote_disks_mode,
        boot_options,
        affinity,
        group_name,
    );

    if down_image_name(snap) == cur.image_name {
        dst.image_name = snap.image_name.clone();
        dst.image = snap.image.clone();
    }

    restore_bootstrap(dst, snap, cur, annotations);

    if let Some(snap_net) = &snap.network {
        let net = dst.network.get_or_insert_with(Default::default);
        restore_hub_only!(net, snap_net, disabled, host_name, domain_name, nameservers, search_domains);
        if down_interfaces(Some(snap_net)) == cur.network_interfaces {
            net.interfaces = snap_net.interfaces.clone();
        }
    }

    if let Some(snap_probe) = &snap.readiness_probe {
        if down_probe(Some(snap_probe)) == cur.readiness_probe {
            let probe = dst.readiness_probe.get_or_insert_with(Default::default);
            probe.guest_info = snap_probe.guest_info.clone();
        }
    }

    if let Some(snap_adv) = &snap.advanced {
        if down_advanced(Some(snap_adv)) == cur.advanced_options {
            let boot_disk_capacity = dst.advanced.as_ref().and_then(|a| a.boot_disk_capacity.clone());
            let merged = hub::VirtualMachineAdvancedSpec { boot_disk_capacity, ..snap_adv.clone() };
            // Only the boot disk was set, and the spoke dropped its sentinel.
            let dropped = merged == Default::default() && snap_adv.boot_disk_capacity.is_some();
            dst.advanced = (!dropped).then_some(merged);
        }
    }

    if down_resource_policy(snap.reserved.as_ref()) == cur.resource_policy_name {
        dst.reserved = snap.reserved.clone();
    }
}

fn restore_bootstrap(
    dst: &mut hub::VirtualMachineSpec,
    snap: &hub::VirtualMachineSpec,
    cur: &spoke::VirtualMachineSpec,
    annotations: &Annotations,
) {
    let projected = bootstrap_to_vm_metadata(snap.bootstrap.as_ref(), annotations);
    let transport = |md: Option<&spoke::VirtualMachineMetadata>| md.map(|m| m.transport.clone());
    if transport(projected.as_ref()) == transport(cur.vm_metadata.as_ref()) {
        let mut bootstrap = snap.bootstrap.clone();
        if let (Some(b), Some(projected), Some(cur)) = (bootstrap.as_mut(), &projected, &cur.vm_metadata) {
            if object_name(projected) != object_name(cur) {
                rename_bootstrap_object(b, object_name(cur));
            }
        }
        dst.bootstrap = bootstrap;
        return;
    }

    let snap_ci = snap.bootstrap.as_ref().and_then(|b| b.cloud_init.as_ref());
    let dst_ci = dst.bootstrap.as_mut().and_then(|b| b.cloud_init.as_mut());
    if let (Some(snap_ci), Some(ci)) = (snap_ci, dst_ci) {
        if ci.instance_id.is_empty() {
            ci.instance_id = snap_ci.instance_id.clone();
        }
    }
}

fn object_name(md: &spoke::VirtualMachineMetadata) -> &str {
    if md.secret_name.is_empty() {
        &md.config_map_name
    } else {
        &md.secret_name
    }
}

/// Point whichever raw data slot the bootstrap uses at `name`; an empty name
/// clears the slot.
fn rename_bootstrap_object(b: &mut hub::VirtualMachineBootstrapSpec, name: &str) {
    fn rename(sel: &mut Option<hub::SecretKeySelector>, name: &str) {
        if name.is_empty() {
            *sel = None;
        } else if let Some(sel) = sel {
            sel.name = name.to_owned();
        }
    }
    if let Some(ci) = &mut b.cloud_init {
        rename(&mut ci.raw_cloud_config, name);
    } else if let Some(sysprep) = &mut b.sysprep {
        rename(&mut sysprep.raw_sysprep, name);
    } else if let Some(vapp) = &mut b.vapp_config {
        vapp.raw_properties = name.to_owned();
    }
}

fn restore_status(
    dst: &mut hub::VirtualMachineStatus,
    snap: &hub::VirtualMachineStatus,
    src: Option<&spoke::VirtualMachineStatus>,
) {
    restore_hub_only!(dst, snap, class, image);
    let src = src.cloned().unwrap_or_default();
    if down_network_status(snap.network.as_ref()) == (src.vm_ip, src.network_interfaces, src.host_name) {
        dst.network = snap.network.clone();
    }
    if down_volume_statuses(&snap.volumes) == src.volumes {
        dst.volumes = snap.volumes.clone();
    }
}
