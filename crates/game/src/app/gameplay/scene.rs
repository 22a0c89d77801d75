use engine::{
    AssetError, AssetLookup, Canvas, InputAction, InputSnapshot, Rect, Scene, Vec2, Visual,
};
use tracing::{info, warn};

use super::content::WorldContent;
use super::entity::{Body, EntityId, EntityIdAllocator, Facing, FacingVisuals};
use super::interactables::{Appearance, Interactable, Interactables, Location, Role};
use super::pickup::{PickupCatalog, PickupTemplate};
use super::player::{InteractionState, Player};
use super::tooltip::{resolve_proximity, TooltipBar};
use super::viewport::{HeldDirections, Viewport};

const CLEAR_COLOR: [u8; 4] = [30, 48, 30, 255];
const CARRY_GAP: f32 = 2.0;
const CONVERSATION_HEIGHT: f32 = 84.0;
const CONVERSATION_MARGIN: f32 = 24.0;
const CONVERSATION_BG_COLOR: [u8; 4] = [250, 245, 230, 240];
const CONVERSATION_BORDER_COLOR: [u8; 4] = [90, 70, 40, 255];
const CONVERSATION_TEXT_COLOR: [u8; 4] = [20, 20, 20, 255];
const CONVERSATION_HINT_COLOR: [u8; 4] = [110, 100, 80, 255];
const LEAVE_HINT: &str = "press q to leave";
const SILENT_DIALOGUE: &str = "...";

/// Everything that exists once assets are loaded.
#[derive(Debug)]
pub(crate) struct GameWorld {
    viewport: Viewport,
    player: Player,
    interactables: Interactables,
    catalog: PickupCatalog,
    ids: EntityIdAllocator,
    tooltip: TooltipBar,
    ground_tile: Visual,
    tick: u64,
}

impl GameWorld {
    /// Builds the world from validated content. Tooltip scan order is NPCs,
    /// then placed pickups, then landmarks.
    pub(crate) fn build(
        content: &WorldContent,
        assets: &mut dyn AssetLookup,
    ) -> Result<Self, AssetError> {
        let world = &content.world;
        let view_size = Vec2::new(world.view_width as f32, world.view_height as f32);
        let viewport = Viewport::new(
            world.view_origin.into(),
            view_size,
            Vec2::new(world.width, world.height),
        );
        let ground_tile = assets.image(&world.ground_tile)?;

        let player_def = &content.player;
        let player_visuals = FacingVisuals::load(
            assets,
            &player_def.sprite,
            player_def.walk_frames,
            player_def.ticks_per_frame,
        )?;
        let player = Player::new(view_size, player_def.size.into(), player_visuals);

        let mut catalog = PickupCatalog::default();
        for def in &content.pickups {
            catalog.insert(PickupTemplate {
                kind: def.kind,
                size: def.size.into(),
                help_text: def.help_text.clone(),
                combine_table: def
                    .combines
                    .iter()
                    .map(|combine| (combine.partner, combine.result))
                    .collect(),
                visual: assets.image(&def.sprite)?,
            });
        }

        let mut ids = EntityIdAllocator::default();
        let mut interactables = Interactables::default();

        for def in &content.npcs {
            let npc = match def.patrol_route() {
                Ok(npc) => npc,
                Err(err) => {
                    warn!(npc = %def.name, error = %err, "npc_skipped");
                    continue;
                }
            };
            let visuals = FacingVisuals::load(
                assets,
                &def.character.sprite,
                def.character.walk_frames,
                def.character.ticks_per_frame,
            )?;
            interactables.push(Interactable {
                id: ids.allocate(),
                body: Body::new(npc.current_target(), def.character.size.into()),
                appearance: Appearance::Facing(visuals),
                help_text: def.help_text.clone(),
                dialogue: def.dialogue.clone(),
                role: Role::Npc(npc),
                location: Location::OnGround,
            });
        }

        for placement in &content.placements {
            let Some(template) = catalog.get(placement.kind) else {
                warn!(kind = ?placement.kind, "placement_skipped");
                continue;
            };
            interactables.push(Interactable::spawn_pickup(
                ids.allocate(),
                template,
                placement.position.into(),
            ));
        }

        for def in &content.landmarks {
            interactables.push(Interactable {
                id: ids.allocate(),
                body: Body::new(def.position.into(), def.size.into()),
                appearance: Appearance::Fixed(assets.image(&def.sprite)?),
                help_text: def.help_text.clone(),
                dialogue: def.dialogue.clone(),
                role: Role::Landmark,
                location: Location::OnGround,
            });
        }

        info!(
            interactables = interactables.len(),
            pickup_kinds = catalog.len(),
            origin_x = viewport.origin().x,
            origin_y = viewport.origin().y,
            "world_built"
        );

        Ok(Self {
            viewport,
            player,
            interactables,
            catalog,
            ids,
            tooltip: TooltipBar::default(),
            ground_tile,
            tick: 0,
        })
    }

    pub(crate) fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub(crate) fn player(&self) -> &Player {
        &self.player
    }

    pub(crate) fn interactables(&self) -> &Interactables {
        &self.interactables
    }

    pub(crate) fn tooltip(&self) -> &TooltipBar {
        &self.tooltip
    }

    /// One simulation tick: discrete commands first, then scrolling, then patrols.
    pub(crate) fn update(&mut self, input: &InputSnapshot) {
        self.tick = self.tick.wrapping_add(1);
        for action in input.pressed() {
            self.apply_command(*action);
        }

        let held = HeldDirections::from_input(input);
        self.viewport.scroll(held);
        self.player.set_walking(held.any());

        self.interactables.patrol_npcs();
    }

    pub(crate) fn apply_command(&mut self, action: InputAction) {
        if let Some(facing) = Facing::from_action(action) {
            self.player.key_press(facing);
            return;
        }
        match action {
            InputAction::Interact => self.interact(),
            InputAction::QuitInteraction => {
                self.player.stop_interact();
            }
            InputAction::Drop => {
                self.player
                    .drop_pickup(&mut self.interactables, &self.viewport);
            }
            InputAction::Combine => {
                if let Some(target) = self.last_touching_pickup() {
                    self.player.attempt_combine(
                        target,
                        &mut self.interactables,
                        &self.catalog,
                        &mut self.ids,
                        &self.viewport,
                    );
                }
            }
            _ => {}
        }
    }

    /// Empty hands on a pickup collect it; otherwise talk to whatever is nearby.
    fn interact(&mut self) {
        if self.player.carried().is_none() {
            if let Some(item) = self.last_touching_pickup() {
                if self
                    .player
                    .begin_pickup(item, &mut self.interactables, &self.viewport)
                {
                    return;
                }
            }
        }
        self.player.start_interact(&self.interactables);
    }

    /// The most recently inserted ground pickup overlapping the player's body.
    fn last_touching_pickup(&self) -> Option<EntityId> {
        let body = self.player.bounding_rect(&self.viewport);
        self.interactables
            .ground_pickups()
            .filter(|entry| body.intersects(&entry.body.bounding_rect()))
            .last()
            .map(|entry| entry.id)
    }

    pub(crate) fn recompute_state(&mut self) {
        let outcome = resolve_proximity(&self.player, &self.interactables, &self.viewport);
        self.player.set_nearby(outcome.nearby);
        self.tooltip.set_prompt(outcome.prompt);
    }

    pub(crate) fn draw(&self, canvas: &mut Canvas<'_>) {
        canvas.clear(CLEAR_COLOR);
        canvas.tile(self.ground_tile.rest_frame(), self.viewport.origin());

        let on_ground = move || self.interactables.iter().filter(|entry| entry.is_on_ground());
        for entry in on_ground().filter(|entry| matches!(entry.role, Role::Landmark)) {
            self.draw_entry(canvas, entry);
        }
        for entry in on_ground().filter(|entry| matches!(entry.role, Role::Pickup(_))) {
            self.draw_entry(canvas, entry);
        }
        self.draw_player(canvas);
        for entry in on_ground().filter(|entry| matches!(entry.role, Role::Npc(_))) {
            self.draw_entry(canvas, entry);
        }

        match self.player.interaction() {
            InteractionState::Interacting(target) => self.draw_conversation(canvas, target),
            InteractionState::Idle => self.tooltip.draw(canvas),
        }
    }

    fn draw_entry(&self, canvas: &mut Canvas<'_>, entry: &Interactable) {
        if !self
            .viewport
            .viewport_rect()
            .intersects(&entry.body.bounding_rect())
        {
            return;
        }
        let sprite = match entry.role {
            Role::Npc(_) => entry.current_visual().frame(self.tick),
            _ => entry.current_visual().rest_frame(),
        };
        canvas.blit(sprite, self.viewport.to_screen(entry.body.position));
    }

    fn draw_player(&self, canvas: &mut Canvas<'_>) {
        let visual = self.player.visuals().get(self.player.facing());
        let sprite = if self.player.is_walking() {
            visual.frame(self.tick)
        } else {
            visual.rest_frame()
        };
        let anchor = self.player.anchor();
        canvas.blit(sprite, anchor);

        let Some(carried) = self
            .player
            .carried()
            .and_then(|id| self.interactables.get(id))
        else {
            return;
        };
        let visual = carried.current_visual();
        let (held_width, held_height) = visual.size();
        let position = Vec2::new(
            (anchor.x + (self.player.size().x - held_width as f32) * 0.5).floor(),
            anchor.y - held_height as f32 - CARRY_GAP,
        );
        canvas.blit(visual.rest_frame(), position);
    }

    fn draw_conversation(&self, canvas: &mut Canvas<'_>, target: EntityId) {
        let dialogue = self
            .interactables
            .get(target)
            .and_then(|entry| entry.dialogue.as_deref())
            .unwrap_or(SILENT_DIALOGUE);
        let width = canvas.width() as f32;
        let height = canvas.height() as f32;
        let panel = Rect::new(
            CONVERSATION_MARGIN,
            height - CONVERSATION_HEIGHT - CONVERSATION_MARGIN,
            (width - CONVERSATION_MARGIN * 2.0).max(0.0),
            CONVERSATION_HEIGHT,
        );
        canvas.fill_rect(panel, CONVERSATION_BG_COLOR);
        canvas.stroke_rect(panel, 2.0, CONVERSATION_BORDER_COLOR);

        let text_x = panel.x + 12.0;
        let mut text_y = panel.y + 12.0;
        for line in dialogue.lines() {
            canvas.draw_text(Vec2::new(text_x, text_y), line, CONVERSATION_TEXT_COLOR);
            text_y += Canvas::line_height();
        }
        let hint_y = panel.bottom() - Canvas::line_height() - 8.0;
        canvas.draw_text(Vec2::new(text_x, hint_y), LEAVE_HINT, CONVERSATION_HINT_COLOR);
    }

    pub(crate) fn debug_lines(&self) -> Vec<String> {
        let origin = self.viewport.origin();
        let carrying = self
            .player
            .carried()
            .and_then(|id| self.interactables.get(id))
            .and_then(Interactable::pickup_kind)
            .map_or("nothing", |kind| kind.label());
        let interaction = match self.player.interaction() {
            InteractionState::Idle => "idle".to_string(),
            InteractionState::Interacting(target) => format!("talking to #{}", target.0),
        };
        vec![
            format!("view: {:.0},{:.0}", origin.x, origin.y),
            format!("facing: {}", self.player.facing().as_token()),
            format!("carrying: {carrying}"),
            format!("state: {interaction}"),
        ]
    }
}

/// The single exploration scene. Content is parsed up front; visuals are
/// resolved when the engine hands over its asset provider.
pub(crate) struct ExplorationScene {
    content: WorldContent,
    world: Option<GameWorld>,
}

impl ExplorationScene {
    pub(crate) fn new(content: WorldContent) -> Self {
        Self {
            content,
            world: None,
        }
    }

    pub(crate) fn world(&self) -> Option<&GameWorld> {
        self.world.as_ref()
    }
}

impl Scene for ExplorationScene {
    fn load(&mut self, assets: &mut dyn AssetLookup) -> Result<(), AssetError> {
        self.world = Some(GameWorld::build(&self.content, assets)?);
        Ok(())
    }

    fn update(&mut self, input: &InputSnapshot) {
        if let Some(world) = self.world.as_mut() {
            world.update(input);
        }
    }

    fn recompute_state(&mut self) {
        if let Some(world) = self.world.as_mut() {
            world.recompute_state();
        }
    }

    fn draw(&self, canvas: &mut Canvas<'_>) {
        match self.world.as_ref() {
            Some(world) => world.draw(canvas),
            None => canvas.clear(CLEAR_COLOR),
        }
    }

    fn debug_lines(&self) -> Vec<String> {
        self.world
            .as_ref()
            .map(GameWorld::debug_lines)
            .unwrap_or_default()
    }

    fn unload(&mut self) {
        if self.world.take().is_some() {
            info!("world_unloaded");
        }
    }
}
