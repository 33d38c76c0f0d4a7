//! Translation between the single v1alpha1 prerequisite condition and the
//! per-dependency hub conditions.
//!
//! Up-conversion expands the aggregate only when no snapshot is available
//! and the hub list does not already carry any fine-grained entry.
//! Down-conversion recomputes the aggregate on every call.

use vmop_core::condition::{self, ConditionLike};
use vmop_core::{Condition as HubCondition, ConditionStatus};

use crate::v1alpha1::{Condition, VmStatusPhase, CONDITION_SEVERITY_ERROR};
use crate::v1alpha4 as hub;

pub const VIRTUAL_MACHINE_PREREQ_READY_CONDITION: &str = "VirtualMachinePrereqReady";

pub const VIRTUAL_MACHINE_CLASS_NOT_FOUND_REASON: &str = "VirtualMachineClassNotFound";
pub const VIRTUAL_MACHINE_IMAGE_NOT_FOUND_REASON: &str = "VirtualMachineImageNotFound";

/// Reasons on synthesised hub conditions.
const SYNTHESISED_READY_REASON: &str = "True";
const NOT_YET_EVALUATED_REASON: &str = "Unknown";

/// Aggregate reasons that blame the class.
pub const CLASS_NOT_FOUND_REASONS: &[&str] = &[
    VIRTUAL_MACHINE_CLASS_NOT_FOUND_REASON,
    "VirtualMachineClassBindingNotFound",
    "ClassNotFound",
    "ClassBindingNotFound",
];

/// Aggregate reasons that blame the image.
pub const IMAGE_NOT_FOUND_REASONS: &[&str] = &[
    VIRTUAL_MACHINE_IMAGE_NOT_FOUND_REASON,
    "VirtualMachineImageNotReady",
    "ContentSourceBindingNotFound",
    "ContentLibraryProviderNotFound",
    "ImageNotFound",
    "ImageNotReady",
];

const HUB_PREREQ_TYPES: [&str; 4] = [
    hub::VIRTUAL_MACHINE_CONDITION_CLASS_READY,
    hub::VIRTUAL_MACHINE_CONDITION_IMAGE_READY,
    hub::VIRTUAL_MACHINE_CONDITION_VM_SET_RESOURCE_POLICY_READY,
    hub::VIRTUAL_MACHINE_CONDITION_BOOTSTRAP_READY,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Blame {
    Class,
    Image,
}

fn blame(reason: &str) -> Option<Blame> {
    if CLASS_NOT_FOUND_REASONS.contains(&reason) {
        Some(Blame::Class)
    } else if IMAGE_NOT_FOUND_REASONS.contains(&reason) {
        Some(Blame::Image)
    } else {
        None
    }
}

/// What the spoke status requested beyond class and image.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Requested {
    pub resource_policy: bool,
    pub bootstrap: bool,
}

/// Expand the aggregate in `conditions` into hub conditions.
///
/// The aggregate itself is always removed. Nothing is synthesised when a
/// hub condition is already present or the aggregate reason is not one this
/// version knows how to attribute.
pub(crate) fn expand_prereq(conditions: &mut Vec<HubCondition>, requested: Requested) {
    let Some(prereq) = condition::remove(conditions, VIRTUAL_MACHINE_PREREQ_READY_CONDITION) else {
        return;
    };
    if condition::has_any(conditions, &HUB_PREREQ_TYPES) {
        return;
    }
    let at = prereq.last_transition_time.clone();
    let cond = |type_: &str, status: ConditionStatus| HubCondition::new(type_, status).at(at.clone());
    let (optional_status, optional_reason) = match prereq.status {
        ConditionStatus::True => {
            let ok = |type_| cond(type_, ConditionStatus::True).with_reason(SYNTHESISED_READY_REASON);
            conditions.push(ok(hub::VIRTUAL_MACHINE_CONDITION_CLASS_READY));
            conditions.push(ok(hub::VIRTUAL_MACHINE_CONDITION_IMAGE_READY));
            (ConditionStatus::True, SYNTHESISED_READY_REASON)
        }
        ConditionStatus::False => {
            let failed = |type_| {
                cond(type_, ConditionStatus::False)
                    .with_reason(prereq.reason.clone())
                    .with_message(prereq.message.clone())
            };
            match blame(&prereq.reason) {
                Some(Blame::Class) => {
                    conditions.push(failed(hub::VIRTUAL_MACHINE_CONDITION_CLASS_READY));
                    conditions.push(
                        cond(hub::VIRTUAL_MACHINE_CONDITION_IMAGE_READY, ConditionStatus::Unknown)
                            .with_reason(NOT_YET_EVALUATED_REASON),
                    );
                }
                Some(Blame::Image) => {
                    conditions.push(
                        cond(hub::VIRTUAL_MACHINE_CONDITION_CLASS_READY, ConditionStatus::True)
                            .with_reason(SYNTHESISED_READY_REASON),
                    );
                    conditions.push(failed(hub::VIRTUAL_MACHINE_CONDITION_IMAGE_READY));
                }
                None => return,
            }
            (ConditionStatus::Unknown, NOT_YET_EVALUATED_REASON)
        }
        ConditionStatus::Unknown => return,
    };
    let optional = |type_| cond(type_, optional_status).with_reason(optional_reason);
    if requested.resource_policy {
        conditions.push(optional(hub::VIRTUAL_MACHINE_CONDITION_VM_SET_RESOURCE_POLICY_READY));
    }
    if requested.bootstrap {
        conditions.push(optional(hub::VIRTUAL_MACHINE_CONDITION_BOOTSTRAP_READY));
    }
}

/// Drop the aggregate without synthesising anything.
pub(crate) fn strip_prereq(conditions: &mut Vec<HubCondition>) {
    condition::remove(conditions, VIRTUAL_MACHINE_PREREQ_READY_CONDITION);
}

/// Compute the aggregate the hub conditions imply, or `None` when they do
/// not decide it yet.
pub(crate) fn aggregate_prereq(conditions: &[HubCondition]) -> Option<Condition> {
    let class = condition::find(conditions, hub::VIRTUAL_MACHINE_CONDITION_CLASS_READY);
    let image = condition::find(conditions, hub::VIRTUAL_MACHINE_CONDITION_IMAGE_READY);
    let true_or_absent = |type_| condition::find(conditions, type_).map_or(true, HubCondition::is_true);

    if let (Some(class), Some(image)) = (class, image) {
        if class.is_true()
            && image.is_true()
            && true_or_absent(hub::VIRTUAL_MACHINE_CONDITION_VM_SET_RESOURCE_POLICY_READY)
            && true_or_absent(hub::VIRTUAL_MACHINE_CONDITION_BOOTSTRAP_READY)
        {
            return Some(Condition {
                type_: VIRTUAL_MACHINE_PREREQ_READY_CONDITION.into(),
                status: ConditionStatus::True,
                last_transition_time: image.last_transition_time.clone(),
                ..Default::default()
            });
        }
    }

    let failed = [
        (class, VIRTUAL_MACHINE_CLASS_NOT_FOUND_REASON),
        (image, VIRTUAL_MACHINE_IMAGE_NOT_FOUND_REASON),
    ]
    .into_iter()
    .find_map(|(c, fallback)| c.filter(|c| c.is_false()).map(|c| (c, fallback)));
    failed.map(|(c, fallback)| Condition {
        type_: VIRTUAL_MACHINE_PREREQ_READY_CONDITION.into(),
        status: ConditionStatus::False,
        severity: CONDITION_SEVERITY_ERROR.into(),
        last_transition_time: c.last_transition_time.clone(),
        reason: if c.reason.is_empty() { fallback.into() } else { c.reason.clone() },
        message: c.message.clone(),
    })
}

/// Update the aggregate in `spoke` from `hub` and return the implied phase.
pub(crate) fn derive_prereq(hub: &[HubCondition], spoke: &mut Vec<Condition>) -> VmStatusPhase {
    let aggregate = aggregate_prereq(hub);
    let aggregate_true = aggregate.as_ref().is_some_and(|c| c.status() == ConditionStatus::True);
    if let Some(mut aggregate) = aggregate {
        // Severity has no hub field; an unchanged aggregate keeps the one it had.
        let prior = condition::find(spoke, VIRTUAL_MACHINE_PREREQ_READY_CONDITION)
            .filter(|c| c.status == aggregate.status && !c.severity.is_empty());
        if let Some(prior) = prior {
            aggregate.severity = prior.severity.clone();
        }
        condition::set(spoke, aggregate);
    }
    match condition::find(hub, hub::VIRTUAL_MACHINE_CONDITION_CREATED) {
        Some(created) if created.is_true() => VmStatusPhase::Created,
        Some(_) => VmStatusPhase::Creating,
        None if aggregate_true => VmStatusPhase::Created,
        None => VmStatusPhase::Unknown,
    }
}
