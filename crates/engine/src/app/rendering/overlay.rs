use crate::app::{LoopMetricsSnapshot, Rect, Vec2};

use super::text::{GLYPH_ADVANCE, LINE_ADVANCE, TEXT_SCALE};
use super::Canvas;

const OVERLAY_ORIGIN: Vec2 = Vec2::new(50.0, 50.0);
const OVERLAY_PANEL_INSET_X: i32 = 4 * TEXT_SCALE;
const OVERLAY_PANEL_INSET_Y: i32 = 3 * TEXT_SCALE;
const OVERLAY_TEXT_PRIMARY_COLOR: [u8; 4] = [244, 248, 252, 255];
const OVERLAY_TEXT_DIM_COLOR: [u8; 4] = [176, 198, 220, 255];
const OVERLAY_PANEL_BG_COLOR: [u8; 4] = [10, 12, 16, 210];
const OVERLAY_PANEL_BORDER_COLOR: [u8; 4] = [92, 106, 126, 255];

#[derive(Debug, Clone, Default)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub scene_lines: Vec<String>,
}

pub(crate) fn draw_overlay(canvas: &mut Canvas<'_>, data: &OverlayData) {
    let lines = build_overlay_lines(data);
    let longest_line_chars = lines
        .iter()
        .map(|line| line.chars().count() as i32)
        .max()
        .unwrap_or(0);
    let panel = Rect::new(
        OVERLAY_ORIGIN.x - OVERLAY_PANEL_INSET_X as f32,
        OVERLAY_ORIGIN.y - OVERLAY_PANEL_INSET_Y as f32,
        (longest_line_chars * GLYPH_ADVANCE + OVERLAY_PANEL_INSET_X * 2) as f32,
        (lines.len() as i32 * LINE_ADVANCE + OVERLAY_PANEL_INSET_Y * 2) as f32,
    );
    canvas.fill_rect(panel, OVERLAY_PANEL_BG_COLOR);
    canvas.stroke_rect(panel, 1.0, OVERLAY_PANEL_BORDER_COLOR);

    let mut y = OVERLAY_ORIGIN.y;
    for (index, line) in lines.iter().enumerate() {
        let color = if index == 0 {
            OVERLAY_TEXT_PRIMARY_COLOR
        } else {
            OVERLAY_TEXT_DIM_COLOR
        };
        canvas.draw_text(Vec2::new(OVERLAY_ORIGIN.x, y), line, color);
        y += LINE_ADVANCE as f32;
    }
}

fn build_overlay_lines(data: &OverlayData) -> Vec<String> {
    let mut lines = vec![format_fps_line(data.metrics.fps)];
    lines.extend(data.scene_lines.iter().cloned());
    lines
}

fn format_fps_line(fps: f32) -> String {
    format!("FPS: {fps:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_line_uses_two_decimals() {
        assert_eq!(format_fps_line(59.987), "FPS: 59.99");
        assert_eq!(format_fps_line(0.0), "FPS: 0.00");
    }

    #[test]
    fn scene_lines_follow_fps_line() {
        let data = OverlayData {
            metrics: LoopMetricsSnapshot::default(),
            scene_lines: vec!["view: 0,0".to_string()],
        };
        let lines = build_overlay_lines(&data);
        assert_eq!(lines, vec!["FPS: 0.00".to_string(), "view: 0,0".to_string()]);
    }

    #[test]
    fn draw_overlay_writes_backing_plate_pixels() {
        let mut frame = vec![0u8; 320 * 180 * 4];
        let mut canvas = Canvas::new(&mut frame, 320, 180).expect("canvas");
        canvas.clear([0, 0, 0, 255]);
        draw_overlay(&mut canvas, &OverlayData::default());

        let inside_panel = canvas.pixel(46, 48).expect("pixel");
        assert_ne!(inside_panel, [0, 0, 0, 255]);
        assert_eq!(canvas.pixel(300, 170), Some([0, 0, 0, 255]));
    }
}
