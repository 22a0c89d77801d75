use engine::{Canvas, Rect, Vec2};

use super::entity::EntityId;
use super::interactables::Interactables;
use super::player::Player;
use super::viewport::Viewport;

pub(crate) const COMBINE_PROMPT: &str = "press c to combine";

const BAR_HEIGHT: f32 = 28.0;
const BAR_BG_COLOR: [u8; 4] = [245, 235, 200, 230];
const BAR_BORDER_COLOR: [u8; 4] = [90, 70, 40, 255];
const BAR_TEXT_COLOR: [u8; 4] = [20, 20, 20, 255];

pub(crate) fn help_prompt(help_text: &str) -> String {
    format!("press x to {help_text}")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ProximityOutcome {
    pub(crate) nearby: Option<EntityId>,
    pub(crate) prompt: Option<String>,
}

/// Scans tooltip entries in insertion order and stops at the first one whose
/// rect overlaps the player's interaction boundary.
///
/// For that entry: carrying something it combines with prompts to combine;
/// empty hands prompt with its help text; carrying anything else shows no
/// prompt but still marks it nearby and still ends the scan.
pub(crate) fn resolve_proximity(
    player: &Player,
    interactables: &Interactables,
    viewport: &Viewport,
) -> ProximityOutcome {
    let boundary = player.interaction_boundary(viewport);
    let carried_kind = player
        .carried()
        .and_then(|id| interactables.get(id))
        .and_then(|entry| entry.pickup_kind());

    for entry in interactables.tooltip_entries() {
        if !boundary.intersects(&entry.body.bounding_rect()) {
            continue;
        }
        let prompt = match (player.carried(), carried_kind) {
            (Some(_), Some(kind)) => entry
                .pickup()
                .and_then(|pickup| pickup.combine_result(kind))
                .map(|_| COMBINE_PROMPT.to_string()),
            (Some(_), None) => None,
            (None, _) => Some(help_prompt(&entry.help_text)),
        };
        return ProximityOutcome {
            nearby: Some(entry.id),
            prompt,
        };
    }

    ProximityOutcome::default()
}

/// Bottom-of-screen prompt strip.
#[derive(Debug, Clone, Default)]
pub(crate) struct TooltipBar {
    prompt: Option<String>,
}

impl TooltipBar {
    pub(crate) fn set_prompt(&mut self, prompt: Option<String>) {
        self.prompt = prompt;
    }

    pub(crate) fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub(crate) fn draw(&self, canvas: &mut Canvas<'_>) {
        let Some(prompt) = self.prompt.as_deref() else {
            return;
        };
        let width = canvas.width() as f32;
        let top = canvas.height() as f32 - BAR_HEIGHT;
        let bar = Rect::new(0.0, top, width, BAR_HEIGHT);
        canvas.fill_rect(bar, BAR_BG_COLOR);
        canvas.stroke_rect(bar, 2.0, BAR_BORDER_COLOR);
        let text_x = ((width - Canvas::text_width(prompt)) * 0.5).max(4.0);
        let text_y = top + (BAR_HEIGHT - Canvas::line_height()) * 0.5 + 2.0;
        canvas.draw_text(Vec2::new(text_x, text_y), prompt, BAR_TEXT_COLOR);
    }
}
