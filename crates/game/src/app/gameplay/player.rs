use engine::{Rect, Vec2};
use tracing::{debug, info};

use super::entity::{Body, EntityId, EntityIdAllocator, Facing, FacingVisuals};
use super::interactables::{Interactable, Interactables, Location};
use super::pickup::PickupCatalog;
use super::viewport::Viewport;

/// Extra room on every side of the player's body for proximity checks.
pub(crate) const INTERACTION_MARGIN: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum InteractionState {
    #[default]
    Idle,
    Interacting(EntityId),
}

/// The player never moves in screen space; the viewport scrolls under it.
/// Every command is a no-op returning `false`/`None` when its precondition fails.
#[derive(Debug, Clone)]
pub(crate) struct Player {
    anchor: Vec2,
    size: Vec2,
    facing: Facing,
    walking: bool,
    carried: Option<EntityId>,
    nearby: Option<EntityId>,
    interaction: InteractionState,
    visuals: FacingVisuals,
}

impl Player {
    pub(crate) fn new(view_size: Vec2, size: Vec2, visuals: FacingVisuals) -> Self {
        let anchor = Vec2::new(
            (view_size.x * 0.5 - size.x * 0.5).floor(),
            (view_size.y * 0.5 - size.y * 0.5).floor(),
        );
        Self {
            anchor,
            size,
            facing: Facing::Down,
            walking: false,
            carried: None,
            nearby: None,
            interaction: InteractionState::Idle,
            visuals,
        }
    }

    pub(crate) fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub(crate) fn size(&self) -> Vec2 {
        self.size
    }

    pub(crate) fn facing(&self) -> Facing {
        self.facing
    }

    pub(crate) fn is_walking(&self) -> bool {
        self.walking
    }

    pub(crate) fn carried(&self) -> Option<EntityId> {
        self.carried
    }

    pub(crate) fn nearby(&self) -> Option<EntityId> {
        self.nearby
    }

    pub(crate) fn interaction(&self) -> InteractionState {
        self.interaction
    }

    pub(crate) fn visuals(&self) -> &FacingVisuals {
        &self.visuals
    }

    pub(crate) fn world_position(&self, viewport: &Viewport) -> Vec2 {
        viewport.to_world(self.anchor)
    }

    pub(crate) fn bounding_rect(&self, viewport: &Viewport) -> Rect {
        Body::new(self.world_position(viewport), self.size).bounding_rect()
    }

    pub(crate) fn interaction_boundary(&self, viewport: &Viewport) -> Rect {
        self.bounding_rect(viewport)
            .inflate(INTERACTION_MARGIN * 2.0, INTERACTION_MARGIN * 2.0)
    }

    pub(crate) fn set_nearby(&mut self, nearby: Option<EntityId>) {
        self.nearby = nearby;
    }

    pub(crate) fn set_walking(&mut self, walking: bool) {
        self.walking = walking;
    }

    /// Turns to face `facing`. World position is owned by the viewport and never changes here.
    pub(crate) fn key_press(&mut self, facing: Facing) {
        self.facing = facing;
    }

    pub(crate) fn begin_pickup(
        &mut self,
        item: EntityId,
        interactables: &mut Interactables,
        viewport: &Viewport,
    ) -> bool {
        if self.carried.is_some() {
            debug!(item = item.0, reason = "already_carrying", "pickup_rejected");
            return false;
        }
        let Some(entry) = interactables.get(item) else {
            debug!(item = item.0, reason = "unknown_item", "pickup_rejected");
            return false;
        };
        if !entry.is_ground_pickup() || !self.touches(entry, viewport) {
            debug!(item = item.0, reason = "not_reachable", "pickup_rejected");
            return false;
        }
        let kind = entry.pickup_kind();
        if !interactables.mark_carried(item) {
            return false;
        }
        self.carried = Some(item);
        self.forget_nearby(&[item]);
        info!(item = item.0, kind = ?kind, "pickup_collected");
        true
    }

    /// Drops the carried item at the player's current world position.
    pub(crate) fn drop_pickup(&mut self, interactables: &mut Interactables, viewport: &Viewport) -> bool {
        let Some(item) = self.carried else {
            debug!(reason = "not_carrying", "drop_rejected");
            return false;
        };
        let position = self.world_position(viewport);
        if !interactables.return_to_ground(item, position) {
            debug!(item = item.0, reason = "not_in_carried_slot", "drop_rejected");
            return false;
        }
        self.carried = None;
        info!(item = item.0, x = position.x, y = position.y, "pickup_dropped");
        true
    }

    pub(crate) fn start_interact(&mut self, interactables: &Interactables) -> bool {
        if self.interaction != InteractionState::Idle {
            debug!(reason = "already_interacting", "interaction_rejected");
            return false;
        }
        let Some(target) = self.nearby else {
            debug!(reason = "nothing_nearby", "interaction_rejected");
            return false;
        };
        match interactables.get(target) {
            Some(entry) if entry.accepts_interaction() => {
                self.interaction = InteractionState::Interacting(target);
                info!(target = target.0, "interaction_started");
                true
            }
            _ => {
                debug!(target = target.0, reason = "not_interactive", "interaction_rejected");
                false
            }
        }
    }

    pub(crate) fn stop_interact(&mut self) -> bool {
        let InteractionState::Interacting(target) = self.interaction else {
            debug!(reason = "not_interacting", "interaction_stop_rejected");
            return false;
        };
        self.interaction = InteractionState::Idle;
        info!(target = target.0, "interaction_stopped");
        true
    }

    /// Combines the carried item into `target` using `target`'s combine table.
    /// On a hit both items are destroyed and the result is placed where `target`
    /// was; returns the new entity id.
    pub(crate) fn attempt_combine(
        &mut self,
        target: EntityId,
        interactables: &mut Interactables,
        catalog: &PickupCatalog,
        ids: &mut EntityIdAllocator,
        viewport: &Viewport,
    ) -> Option<EntityId> {
        let carried = self.carried?;
        let carried_kind = interactables
            .get(carried)
            .filter(|entry| entry.location == Location::Carried)
            .and_then(Interactable::pickup_kind)?;
        let target_entry = interactables.get(target)?;
        if !target_entry.is_ground_pickup() || !self.touches(target_entry, viewport) {
            debug!(target = target.0, reason = "not_reachable", "combine_rejected");
            return None;
        }
        let Some(result_kind) = target_entry
            .pickup()
            .and_then(|pickup| pickup.combine_result(carried_kind))
        else {
            debug!(target = target.0, carried = ?carried_kind, reason = "no_recipe", "combine_rejected");
            return None;
        };
        let Some(template) = catalog.get(result_kind) else {
            debug!(result = ?result_kind, reason = "unknown_result", "combine_rejected");
            return None;
        };
        let position = target_entry.body.position;

        let consumed = interactables.remove(carried)?;
        if interactables.remove(target).is_none() {
            interactables.push(consumed);
            debug!(target = target.0, reason = "target_vanished", "combine_rejected");
            return None;
        }
        let created = ids.allocate();
        interactables.push(Interactable::spawn_pickup(created, template, position));
        self.carried = None;
        self.forget_nearby(&[carried, target]);
        info!(
            carried = ?carried_kind,
            target = target.0,
            result = ?result_kind,
            created = created.0,
            "pickups_combined"
        );
        Some(created)
    }

    fn touches(&self, entry: &Interactable, viewport: &Viewport) -> bool {
        self.bounding_rect(viewport)
            .intersects(&entry.body.bounding_rect())
    }

    fn forget_nearby(&mut self, gone: &[EntityId]) {
        if self.nearby.is_some_and(|id| gone.contains(&id)) {
            self.nearby = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use engine::{AssetError, AssetLookup, Visual, VisualParams};

    use super::*;
    use super::super::interactables::{Appearance, Role};
    use super::super::npc::Npc;
    use super::super::pickup::{PickupKind, PickupTemplate};

    struct SolidAssets;

    impl AssetLookup for SolidAssets {
        fn lookup(&mut self, _key: &str, _params: &VisualParams) -> Result<Visual, AssetError> {
            Ok(Visual::placeholder(4, 4, [200, 200, 200, 255]))
        }
    }

    // Body covers (390..410, 285..315) with the origin at (0, 0).
    const TOUCHING: Vec2 = Vec2 { x: 395.0, y: 290.0 };
    const FAR: Vec2 = Vec2 { x: 1000.0, y: 1000.0 };

    struct Fixture {
        player: Player,
        set: Interactables,
        catalog: PickupCatalog,
        ids: EntityIdAllocator,
        viewport: Viewport,
    }

    type Snapshot = (
        Vec<(EntityId, Vec2, Location)>,
        Vec<EntityId>,
        Option<EntityId>,
        InteractionState,
    );

    impl Fixture {
        fn new() -> Self {
            let view = Vec2::new(800.0, 600.0);
            let visuals = FacingVisuals::load(&mut SolidAssets, "characters/player", 2, 4)
                .expect("visuals");
            let mut catalog = PickupCatalog::default();
            for (kind, size, combines) in [
                (PickupKind::Lemon, Vec2::new(8.0, 8.0), vec![]),
                (
                    PickupKind::WaterBucket,
                    Vec2::new(20.0, 22.0),
                    vec![(PickupKind::Lemon, PickupKind::LemonadePitcher)],
                ),
                (
                    PickupKind::RatPoison,
                    Vec2::new(21.0, 18.0),
                    vec![(PickupKind::Lemon, PickupKind::LemonadeGlass)],
                ),
                (PickupKind::LemonadePitcher, Vec2::new(18.0, 21.0), vec![]),
            ] {
                catalog.insert(PickupTemplate {
                    kind,
                    size,
                    help_text: format!("pick up the {}", kind.label()),
                    combine_table: combines.into_iter().collect(),
                    visual: Visual::placeholder(4, 4, [250, 230, 40, 255]),
                });
            }
            Self {
                player: Player::new(view, Vec2::new(20.0, 30.0), visuals),
                set: Interactables::default(),
                catalog,
                ids: EntityIdAllocator::default(),
                viewport: Viewport::new(Vec2::ZERO, view, Vec2::new(2000.0, 1600.0)),
            }
        }

        fn place(&mut self, kind: PickupKind, position: Vec2) -> EntityId {
            let id = self.ids.allocate();
            let template = self.catalog.get(kind).expect("template");
            self.set
                .push(Interactable::spawn_pickup(id, template, position));
            id
        }

        fn place_fixed(&mut self, role: Role, position: Vec2) -> EntityId {
            let id = self.ids.allocate();
            self.set.push(Interactable {
                id,
                body: Body::new(position, Vec2::new(25.0, 36.0)),
                appearance: Appearance::Fixed(Visual::placeholder(4, 4, [90, 60, 30, 255])),
                help_text: "talk".to_string(),
                dialogue: Some("hello".to_string()),
                role,
                location: Location::OnGround,
            });
            id
        }

        fn carry(&mut self, kind: PickupKind) -> EntityId {
            let id = self.place(kind, TOUCHING);
            assert!(self.player.begin_pickup(id, &mut self.set, &self.viewport));
            id
        }

        fn snapshot(&self) -> Snapshot {
            (
                self.set
                    .iter()
                    .map(|entry| (entry.id, entry.body.position, entry.location))
                    .collect(),
                self.set.tooltip_entries().map(|entry| entry.id).collect(),
                self.player.carried(),
                self.player.interaction(),
            )
        }

        fn combine(&mut self, target: EntityId) -> Option<EntityId> {
            self.player.attempt_combine(
                target,
                &mut self.set,
                &self.catalog,
                &mut self.ids,
                &self.viewport,
            )
        }
    }

    #[test]
    fn pickup_while_carrying_changes_nothing() {
        let mut fixture = Fixture::new();
        let lemon = fixture.carry(PickupKind::Lemon);
        let far_bucket = fixture.place(PickupKind::WaterBucket, FAR);
        let near_poison = fixture.place(PickupKind::RatPoison, TOUCHING);
        let before = fixture.snapshot();

        for item in [far_bucket, near_poison] {
            assert!(!fixture
                .player
                .begin_pickup(item, &mut fixture.set, &fixture.viewport));
        }

        assert_eq!(fixture.snapshot(), before);
        assert_eq!(fixture.player.carried(), Some(lemon));
    }

    #[test]
    fn pickup_out_of_reach_changes_nothing() {
        let mut fixture = Fixture::new();
        let bucket = fixture.place(PickupKind::WaterBucket, FAR);
        let before = fixture.snapshot();

        assert!(!fixture
            .player
            .begin_pickup(bucket, &mut fixture.set, &fixture.viewport));

        assert_eq!(fixture.snapshot(), before);
        assert_eq!(fixture.player.carried(), None);
    }

    #[test]
    fn npcs_landmarks_and_unknown_ids_cannot_be_picked_up() {
        let mut fixture = Fixture::new();
        let npc = Npc::new(vec![TOUCHING]).expect("patrol");
        let villager = fixture.place_fixed(Role::Npc(npc), TOUCHING);
        let bed = fixture.place_fixed(Role::Landmark, TOUCHING);
        let before = fixture.snapshot();

        for item in [villager, bed, EntityId(999)] {
            assert!(!fixture
                .player
                .begin_pickup(item, &mut fixture.set, &fixture.viewport));
        }

        assert_eq!(fixture.snapshot(), before);
    }

    #[test]
    fn drop_with_empty_hands_changes_nothing() {
        let mut fixture = Fixture::new();
        fixture.place(PickupKind::Lemon, TOUCHING);
        let before = fixture.snapshot();

        assert!(!fixture.player.drop_pickup(&mut fixture.set, &fixture.viewport));

        assert_eq!(fixture.snapshot(), before);
    }

    #[test]
    fn combine_out_of_reach_changes_nothing() {
        let mut fixture = Fixture::new();
        fixture.carry(PickupKind::Lemon);
        let far_bucket = fixture.place(PickupKind::WaterBucket, FAR);
        let before = fixture.snapshot();

        assert_eq!(fixture.combine(far_bucket), None);

        assert_eq!(fixture.snapshot(), before);
    }

    #[test]
    fn combine_with_empty_hands_changes_nothing() {
        let mut fixture = Fixture::new();
        let bucket = fixture.place(PickupKind::WaterBucket, TOUCHING);
        fixture.place(PickupKind::Lemon, TOUCHING);
        let before = fixture.snapshot();

        assert_eq!(fixture.combine(bucket), None);

        assert_eq!(fixture.snapshot(), before);
    }

    #[test]
    fn combine_onto_landmark_changes_nothing() {
        let mut fixture = Fixture::new();
        fixture.carry(PickupKind::Lemon);
        let bed = fixture.place_fixed(Role::Landmark, TOUCHING);
        let before = fixture.snapshot();

        assert_eq!(fixture.combine(bed), None);

        assert_eq!(fixture.snapshot(), before);
    }

    #[test]
    fn combine_with_uncatalogued_result_changes_nothing() {
        let mut fixture = Fixture::new();
        fixture.carry(PickupKind::Lemon);
        let poison = fixture.place(PickupKind::RatPoison, TOUCHING);
        let before = fixture.snapshot();

        assert_eq!(fixture.combine(poison), None);

        assert_eq!(fixture.snapshot(), before);
    }

    #[test]
    fn combine_consumes_both_and_places_result_at_target() {
        let mut fixture = Fixture::new();
        let lemon = fixture.carry(PickupKind::Lemon);
        let bucket = fixture.place(PickupKind::WaterBucket, Vec2::new(392.0, 295.0));

        let created = fixture.combine(bucket).expect("combined");

        assert!(fixture.set.get(lemon).is_none());
        assert!(fixture.set.get(bucket).is_none());
        let result = fixture.set.get(created).expect("result");
        assert_eq!(result.pickup_kind(), Some(PickupKind::LemonadePitcher));
        assert_eq!(result.body.position, Vec2::new(392.0, 295.0));
        assert_eq!(fixture.player.carried(), None);
    }

    #[test]
    fn interaction_commands_outside_their_state_change_nothing() {
        let mut fixture = Fixture::new();
        let lemon = fixture.place(PickupKind::Lemon, TOUCHING);
        let before = fixture.snapshot();

        assert!(!fixture.player.start_interact(&fixture.set));
        assert!(!fixture.player.stop_interact());
        fixture.player.set_nearby(Some(lemon));
        assert!(!fixture.player.start_interact(&fixture.set));

        assert_eq!(fixture.snapshot(), before);
    }

    #[test]
    fn start_interact_while_interacting_keeps_first_target() {
        let mut fixture = Fixture::new();
        let bed = fixture.place_fixed(Role::Landmark, TOUCHING);
        let npc = Npc::new(vec![FAR]).expect("patrol");
        let villager = fixture.place_fixed(Role::Npc(npc), FAR);
        fixture.player.set_nearby(Some(bed));
        assert!(fixture.player.start_interact(&fixture.set));

        fixture.player.set_nearby(Some(villager));
        assert!(!fixture.player.start_interact(&fixture.set));

        assert_eq!(fixture.player.interaction(), InteractionState::Interacting(bed));
        assert!(fixture.player.stop_interact());
        assert!(!fixture.player.stop_interact());
    }
}
