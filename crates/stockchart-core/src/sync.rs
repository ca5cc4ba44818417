// File: crates/stockchart-core/src/sync.rs
// Summary: Sync registry; named groups of charts sharing visible range and crosshair position.
// Notes:
// - Owned by the application root and passed to every mount (cheap `Clone`).
// - Broadcasts iterate a snapshot, so join/leave during a broadcast is safe.
// - A failing member is logged and skipped; the rest of the group still updates.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::Result;
use crate::scale::{Logical, LogicalRange, TimeRange};

/// Range pushed from one chart to its peers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RangeUpdate {
    pub time: Option<TimeRange>,
    pub logical: Option<LogicalRange>,
}

/// Anything that can follow a sync group.
pub trait SyncMember {
    fn member_id(&self) -> u64;
    /// Apply a peer's visible range without emitting range events.
    fn apply_time_range(&self, update: &RangeUpdate) -> Result<()>;
    /// Bring `logical` into view without emitting crosshair events.
    fn apply_crosshair_position(&self, logical: Logical) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub applied: usize,
    pub failed: usize,
}

type Groups = BTreeMap<String, Vec<Rc<dyn SyncMember>>>;

#[derive(Clone, Default)]
pub struct SyncRegistry {
    groups: Rc<RefCell<Groups>>,
}

impl std::fmt::Debug for SyncRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let groups = self.groups.borrow();
        let mut map = f.debug_map();
        for (name, members) in groups.iter() {
            map.entry(name, &members.iter().map(|m| m.member_id()).collect::<Vec<_>>());
        }
        map.finish()
    }
}

impl SyncRegistry {
    pub fn new() -> Self { Self::default() }

    /// Add `member` to `group`, creating the group on first use.
    /// Returns false if a member with the same id is already there.
    pub fn join(&self, group: &str, member: Rc<dyn SyncMember>) -> bool {
        let mut groups = self.groups.borrow_mut();
        let members = groups.entry(group.to_string()).or_default();
        if members.iter().any(|m| m.member_id() == member.member_id()) {
            return false;
        }
        members.push(member);
        true
    }

    /// Remove a member; an emptied group is deleted.
    pub fn leave(&self, group: &str, member_id: u64) -> bool {
        let mut groups = self.groups.borrow_mut();
        let Some(members) = groups.get_mut(group) else { return false };
        let before = members.len();
        members.retain(|m| m.member_id() != member_id);
        let removed = members.len() != before;
        if members.is_empty() {
            groups.remove(group);
        }
        removed
    }

    /// Snapshot of the group's members in join order.
    pub fn members(&self, group: &str) -> Vec<Rc<dyn SyncMember>> {
        self.groups.borrow().get(group).cloned().unwrap_or_default()
    }

    pub fn member_ids(&self, group: &str) -> Vec<u64> {
        self.members(group).iter().map(|m| m.member_id()).collect()
    }

    pub fn contains(&self, group: &str, member_id: u64) -> bool {
        self.groups
            .borrow()
            .get(group)
            .is_some_and(|members| members.iter().any(|m| m.member_id() == member_id))
    }

    pub fn group_names(&self) -> Vec<String> {
        self.groups.borrow().keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool { self.groups.borrow().is_empty() }

    /// Apply `update` to every member of `group` except `source`.
    pub fn broadcast_time_range(&self, source: u64, group: &str, update: &RangeUpdate) -> BroadcastReport {
        self.broadcast(source, group, "time range", |m| m.apply_time_range(update))
    }

    /// Scroll every member of `group` except `source` so `logical` is visible.
    pub fn broadcast_crosshair(&self, source: u64, group: &str, logical: Logical) -> BroadcastReport {
        self.broadcast(source, group, "crosshair", |m| m.apply_crosshair_position(logical))
    }

    fn broadcast(
        &self,
        source: u64,
        group: &str,
        what: &str,
        apply: impl Fn(&dyn SyncMember) -> Result<()>,
    ) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        for member in self.members(group) {
            if member.member_id() == source {
                continue;
            }
            match apply(member.as_ref()) {
                Ok(()) => report.applied += 1,
                Err(e) => {
                    log::debug!("sync group '{group}': skipping {what} for member {}: {e}", member.member_id());
                    report.failed += 1;
                }
            }
        }
        report
    }
}
