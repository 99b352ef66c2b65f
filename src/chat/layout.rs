//! Decides which open chat windows float on screen and which overflow into
//! the hidden menu.
//!
//! Windows dock against the right edge of the viewport; offsets are measured
//! from that edge. The calculator is a pure function of its inputs.

use crate::chat::device::Viewport;
use crate::chat::thread::ThreadRef;
use crate::config::LayoutConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    #[default]
    Desktop,
    /// Single window at full viewport width, never a hidden menu.
    Compact,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowSlot {
    pub thread: ThreadRef,
    pub visible_index: usize,
    pub offset: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutResult {
    pub visible: Vec<WindowSlot>,
    pub hidden: Vec<ThreadRef>,
    pub show_hidden_menu: bool,
    pub hidden_menu_offset: Option<f32>,
    pub mode: LayoutMode,
}

impl LayoutResult {
    pub fn visible_window_ids(&self) -> Vec<ThreadRef> {
        self.visible.iter().map(|slot| slot.thread.clone()).collect()
    }

    pub fn hidden_window_ids(&self) -> Vec<ThreadRef> {
        self.hidden.clone()
    }

    pub fn slot(&self, thread: &ThreadRef) -> Option<&WindowSlot> {
        self.visible.iter().find(|slot| &slot.thread == thread)
    }

    /// Width taken by visible windows, gaps and the hidden menu.
    pub fn occupied_width(&self, config: &LayoutConfig) -> f32 {
        if self.mode == LayoutMode::Compact {
            return self.visible.first().map(|slot| slot.width).unwrap_or(0.0);
        }
        let Some(last) = self.visible.last() else {
            return 0.0;
        };
        let mut width = last.offset + last.width + config.end_gap;
        if self.show_hidden_menu {
            width += config.between_gap + config.hidden_menu_width;
        }
        width
    }
}

fn required_width(config: &LayoutConfig, windows: usize, with_menu: bool) -> f32 {
    let count = windows as f32;
    let mut width = config.start_gap
        + count * config.window_width
        + (count - 1.0).max(0.0) * config.between_gap
        + config.end_gap;
    if with_menu {
        width += config.between_gap + config.hidden_menu_width;
    }
    width
}

fn slot_offset(config: &LayoutConfig, index: usize) -> f32 {
    config.start_gap + index as f32 * (config.window_width + config.between_gap)
}

fn compact(threads: &[ThreadRef], viewport: Viewport) -> LayoutResult {
    let mut result = LayoutResult {
        mode: LayoutMode::Compact,
        ..LayoutResult::default()
    };
    let Some((front, rest)) = threads.split_first() else {
        return result;
    };
    result.visible.push(WindowSlot {
        thread: front.clone(),
        visible_index: 0,
        offset: 0.0,
        width: viewport.width.max(0.0),
    });
    result.hidden = rest.to_vec();
    result
}

/// `threads` must be ordered most-recently-opened first.
pub fn compute_layout(
    threads: &[ThreadRef],
    viewport: Viewport,
    config: &LayoutConfig,
) -> LayoutResult {
    if threads.is_empty() {
        return LayoutResult::default();
    }

    let fits = |count: usize, with_menu: bool| required_width(config, count, with_menu) <= viewport.width;

    if viewport.is_mobile || viewport.width < config.small_viewport_width || !fits(1, false) {
        return compact(threads, viewport);
    }

    let mut visible_count = 0;
    while visible_count < threads.len() && fits(visible_count + 1, false) {
        visible_count += 1;
    }

    let show_hidden_menu = visible_count < threads.len();
    if show_hidden_menu {
        while visible_count > 0 && !fits(visible_count, true) {
            visible_count -= 1;
        }
        if visible_count == 0 {
            return compact(threads, viewport);
        }
    }

    let visible = threads[..visible_count]
        .iter()
        .enumerate()
        .map(|(index, thread)| WindowSlot {
            thread: thread.clone(),
            visible_index: index,
            offset: slot_offset(config, index),
            width: config.window_width,
        })
        .collect();

    LayoutResult {
        visible,
        hidden: threads[visible_count..].to_vec(),
        show_hidden_menu,
        hidden_menu_offset: show_hidden_menu.then(|| slot_offset(config, visible_count)),
        mode: LayoutMode::Desktop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threads(count: i64) -> Vec<ThreadRef> {
        (1..=count).map(ThreadRef::channel).collect()
    }

    fn layout(count: i64, width: f32) -> LayoutResult {
        compute_layout(&threads(count), Viewport::desktop(width), &LayoutConfig::default())
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let result = layout(0, 1920.0);
        assert!(result.visible.is_empty());
        assert!(result.hidden.is_empty());
        assert!(!result.show_hidden_menu);
    }

    #[test]
    fn three_windows_fit_from_1050() {
        for width in [1050.0, 1200.0, 1920.0] {
            let result = layout(3, width);
            assert_eq!(result.visible_window_ids(), threads(3), "width {width}");
            assert!(result.hidden.is_empty());
            assert!(!result.show_hidden_menu);
        }
    }

    #[test]
    fn two_visible_and_menu_between_880_and_1050() {
        for width in [880.0, 900.0, 1049.0] {
            let result = layout(3, width);
            assert_eq!(result.visible.len(), 2, "width {width}");
            assert_eq!(result.hidden_window_ids(), vec![ThreadRef::channel(3)]);
            assert!(result.show_hidden_menu);
            assert_eq!(result.hidden_menu_offset, Some(700.0));
        }
    }

    #[test]
    fn newest_windows_keep_visibility() {
        let result = layout(5, 900.0);
        assert_eq!(
            result.visible_window_ids(),
            vec![ThreadRef::channel(1), ThreadRef::channel(2)]
        );
        assert_eq!(
            result.hidden_window_ids(),
            vec![
                ThreadRef::channel(3),
                ThreadRef::channel(4),
                ThreadRef::channel(5)
            ]
        );
    }

    #[test]
    fn visible_indices_are_dense_and_offsets_step() {
        let result = layout(3, 1920.0);
        let indices: Vec<usize> = result.visible.iter().map(|slot| slot.visible_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        let offsets: Vec<f32> = result.visible.iter().map(|slot| slot.offset).collect();
        assert_eq!(offsets, vec![10.0, 355.0, 700.0]);
    }

    #[test]
    fn occupied_width_never_exceeds_viewport() {
        let config = LayoutConfig::default();
        for width in (300..2000).step_by(37) {
            let width = width as f32;
            for count in 1..6 {
                let result = compute_layout(&threads(count), Viewport::desktop(width), &config);
                assert!(
                    result.occupied_width(&config) <= width,
                    "{count} windows overflow {width}px"
                );
            }
        }
    }

    #[test]
    fn mobile_device_shows_single_window_without_menu() {
        let result = compute_layout(
            &threads(3),
            Viewport::mobile(1200.0),
            &LayoutConfig::default(),
        );
        assert_eq!(result.mode, LayoutMode::Compact);
        assert_eq!(result.visible_window_ids(), vec![ThreadRef::channel(1)]);
        assert_eq!(result.hidden.len(), 2);
        assert!(!result.show_hidden_menu);
        assert_eq!(result.hidden_menu_offset, None);
        assert_eq!(result.visible[0].width, 1200.0);
    }

    #[test]
    fn narrow_viewport_falls_back_to_compact() {
        let result = layout(2, 320.0);
        assert_eq!(result.mode, LayoutMode::Compact);
        assert_eq!(result.visible.len(), 1);
        assert!(!result.show_hidden_menu);
    }

    #[test]
    fn no_room_for_window_and_menu_falls_back_to_compact() {
        let config = LayoutConfig {
            small_viewport_width: 0.0,
            ..LayoutConfig::default()
        };
        // one window fits alone (360px) but not next to the menu (535px)
        let result = compute_layout(&threads(2), Viewport::desktop(400.0), &config);
        assert_eq!(result.mode, LayoutMode::Compact);
        assert!(!result.show_hidden_menu);

        let single = compute_layout(&threads(1), Viewport::desktop(400.0), &config);
        assert_eq!(single.mode, LayoutMode::Desktop);
        assert_eq!(single.visible[0].offset, 10.0);
    }

    #[test]
    fn custom_constants_shift_thresholds() {
        let config = LayoutConfig {
            window_width: 300.0,
            ..LayoutConfig::default()
        };
        // 10 + 3 * 300 + 2 * 5 + 10
        let result = compute_layout(&threads(3), Viewport::desktop(930.0), &config);
        assert_eq!(result.visible.len(), 3);
        let result = compute_layout(&threads(3), Viewport::desktop(929.0), &config);
        assert_eq!(result.visible.len(), 2);
        assert!(result.show_hidden_menu);
    }
}
