use engine::{Vec2, Visual};

use super::entity::{Body, EntityId, FacingVisuals};
use super::npc::Npc;
use super::pickup::{Pickup, PickupKind, PickupTemplate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Location {
    OnGround,
    Carried,
}

#[derive(Debug, Clone)]
pub(crate) enum Role {
    Pickup(Pickup),
    Npc(Npc),
    Landmark,
}

#[derive(Debug, Clone)]
pub(crate) enum Appearance {
    Fixed(Visual),
    Facing(FacingVisuals),
}

#[derive(Debug, Clone)]
pub(crate) struct Interactable {
    pub(crate) id: EntityId,
    pub(crate) body: Body,
    pub(crate) appearance: Appearance,
    pub(crate) help_text: String,
    pub(crate) dialogue: Option<String>,
    pub(crate) role: Role,
    pub(crate) location: Location,
}

impl Interactable {
    pub(crate) fn spawn_pickup(id: EntityId, template: &PickupTemplate, position: Vec2) -> Self {
        Self {
            id,
            body: Body::new(position, template.size),
            appearance: Appearance::Fixed(template.visual.clone()),
            help_text: template.help_text.clone(),
            dialogue: None,
            role: Role::Pickup(template.pickup()),
            location: Location::OnGround,
        }
    }

    pub(crate) fn pickup(&self) -> Option<&Pickup> {
        match &self.role {
            Role::Pickup(pickup) => Some(pickup),
            _ => None,
        }
    }

    pub(crate) fn pickup_kind(&self) -> Option<PickupKind> {
        self.pickup().map(|pickup| pickup.kind)
    }

    pub(crate) fn is_on_ground(&self) -> bool {
        self.location == Location::OnGround
    }

    pub(crate) fn is_ground_pickup(&self) -> bool {
        self.is_on_ground() && self.pickup().is_some()
    }

    /// NPCs and landmarks can be talked to; pickups cannot.
    pub(crate) fn accepts_interaction(&self) -> bool {
        self.is_on_ground() && matches!(self.role, Role::Npc(_) | Role::Landmark)
    }

    pub(crate) fn current_visual(&self) -> &Visual {
        match (&self.appearance, &self.role) {
            (Appearance::Fixed(visual), _) => visual,
            (Appearance::Facing(visuals), Role::Npc(npc)) => visuals.get(npc.facing()),
            (Appearance::Facing(visuals), _) => visuals.get(Default::default()),
        }
    }
}

/// Single authoritative collection of everything the player can be near.
/// Insertion order is the tooltip scan order.
#[derive(Debug, Default)]
pub(crate) struct Interactables {
    entries: Vec<Interactable>,
}

impl Interactables {
    pub(crate) fn push(&mut self, entry: Interactable) {
        self.entries.push(entry);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<&Interactable> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Interactable> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Interactable> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Interactable> {
        self.entries.iter()
    }

    /// Entries eligible for proximity prompts, in insertion order.
    pub(crate) fn tooltip_entries(&self) -> impl Iterator<Item = &Interactable> {
        self.entries.iter().filter(|entry| entry.is_on_ground())
    }

    pub(crate) fn ground_pickups(&self) -> impl Iterator<Item = &Interactable> {
        self.entries.iter().filter(|entry| entry.is_ground_pickup())
    }

    pub(crate) fn mark_carried(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(entry) if entry.is_ground_pickup() => {
                entry.location = Location::Carried;
                true
            }
            _ => false,
        }
    }

    /// Puts a carried entry back on the ground at `position`. It re-enters at
    /// the end of the scan order, like a newly added entry.
    pub(crate) fn return_to_ground(&mut self, id: EntityId, position: Vec2) -> bool {
        let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.id == id && entry.location == Location::Carried)
        else {
            return false;
        };
        let mut entry = self.entries.remove(index);
        entry.location = Location::OnGround;
        entry.body.position = position;
        self.entries.push(entry);
        true
    }

    pub(crate) fn patrol_npcs(&mut self) {
        for entry in &mut self.entries {
            if let Role::Npc(npc) = &mut entry.role {
                entry.body.position = npc.patrol_step(entry.body.position);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::gameplay::pickup::CombineTable;

    fn pickup(id: u64, kind: PickupKind, x: f32) -> Interactable {
        Interactable {
            id: EntityId(id),
            body: Body::new(Vec2::new(x, 0.0), Vec2::new(8.0, 8.0)),
            appearance: Appearance::Fixed(Visual::placeholder(8, 8, [255, 255, 0, 255])),
            help_text: format!("pick up the {}", kind.label()),
            dialogue: None,
            role: Role::Pickup(Pickup {
                kind,
                combine_table: CombineTable::default(),
            }),
            location: Location::OnGround,
        }
    }

    fn landmark(id: u64) -> Interactable {
        Interactable {
            id: EntityId(id),
            body: Body::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)),
            appearance: Appearance::Fixed(Visual::placeholder(10, 10, [90, 60, 30, 255])),
            help_text: "sleep".to_string(),
            dialogue: Some("zzz".to_string()),
            role: Role::Landmark,
            location: Location::OnGround,
        }
    }

    #[test]
    fn carried_entries_leave_tooltip_scan() {
        let mut set = Interactables::default();
        set.push(pickup(1, PickupKind::Lemon, 0.0));
        set.push(landmark(2));

        assert!(set.mark_carried(EntityId(1)));
        let ids: Vec<_> = set.tooltip_entries().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![EntityId(2)]);
        assert_eq!(set.ground_pickups().count(), 0);
    }

    #[test]
    fn landmarks_cannot_be_carried() {
        let mut set = Interactables::default();
        set.push(landmark(2));
        assert!(!set.mark_carried(EntityId(2)));
    }

    #[test]
    fn returned_entry_moves_to_end_of_scan_order() {
        let mut set = Interactables::default();
        set.push(pickup(1, PickupKind::Lemon, 0.0));
        set.push(pickup(2, PickupKind::WaterBucket, 20.0));
        set.mark_carried(EntityId(1));

        assert!(set.return_to_ground(EntityId(1), Vec2::new(50.0, 60.0)));
        let ids: Vec<_> = set.tooltip_entries().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![EntityId(2), EntityId(1)]);
        let returned = set.get(EntityId(1)).expect("returned");
        assert_eq!(returned.body.position, Vec2::new(50.0, 60.0));
    }

    #[test]
    fn return_to_ground_ignores_entries_not_carried() {
        let mut set = Interactables::default();
        set.push(pickup(1, PickupKind::Lemon, 0.0));
        assert!(!set.return_to_ground(EntityId(1), Vec2::new(9.0, 9.0)));
        assert_eq!(
            set.get(EntityId(1)).expect("lemon").body.position,
            Vec2::new(0.0, 0.0)
        );
    }

    #[test]
    fn only_npcs_and_landmarks_accept_interaction() {
        assert!(landmark(1).accepts_interaction());
        assert!(!pickup(2, PickupKind::Lemon, 0.0).accepts_interaction());
    }
}
