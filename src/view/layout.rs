//! Flexbox-like layout of an element tree.
//!
//! Layout is a pure function of the tree, the available size and the
//! [`LayoutContext`]. Each container measures its children's base sizes,
//! distributes free space along its main axis (growing or shrinking), then
//! positions children on both axes.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::warn;

use crate::asset::{AssetCache, AssetKind, AssetRequest, AssetState};
use crate::error::LayoutOverflow;
use crate::style::{
    AlignItems, ComputedStyle, EdgeInsets, FlexDirection, JustifyContent, SizeValue,
    compute_style,
};
use crate::ui::{Element, ElementKind};
use crate::view::{MonospaceMeasurer, TextMeasurer};

/// Preorder index of a node within one layout tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    fn of(self, v: Vec2) -> f32 {
        match self {
            Self::Horizontal => v.x,
            Self::Vertical => v.y,
        }
    }

    fn vec(self, main: f32, cross: f32) -> Vec2 {
        match self {
            Self::Horizontal => Vec2::new(main, cross),
            Self::Vertical => Vec2::new(cross, main),
        }
    }
}

impl From<FlexDirection> for Axis {
    fn from(direction: FlexDirection) -> Self {
        match direction {
            FlexDirection::Row => Self::Horizontal,
            FlexDirection::Column => Self::Vertical,
        }
    }
}

/// What a container does when its children need more main-axis space than
/// it has. Either way a [`LayoutOverflow`] is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Shrink children in proportion to their base size.
    #[default]
    Shrink,
    /// Keep base sizes; children extend past the container.
    Clip,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    pub fn inset(&self, insets: &EdgeInsets<f32>) -> Rect {
        Rect::new(
            self.x + insets.left,
            self.y + insets.top,
            (self.width - insets.horizontal()).max(0.0),
            (self.height - insets.vertical()).max(0.0),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutKind {
    Container,
    Text(String),
    Image(SmolStr),
    VectorIcon(SmolStr),
}

impl From<&ElementKind> for LayoutKind {
    fn from(kind: &ElementKind) -> Self {
        match kind {
            ElementKind::Container => Self::Container,
            ElementKind::Text(content) => Self::Text(content.clone()),
            ElementKind::Image(path) => Self::Image(path.clone()),
            ElementKind::VectorIcon(path) => Self::VectorIcon(path.clone()),
        }
    }
}

/// One laid-out element. Children are in element order, so the path of
/// child indices to a node is the same in both trees.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: NodeId,
    pub kind: LayoutKind,
    /// Border box in window coordinates.
    pub rect: Rect,
    pub style: ComputedStyle,
    /// Set for image or icon nodes whose asset is not available.
    pub placeholder: bool,
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    /// The box children are placed in: border box minus border and padding.
    pub fn content_rect(&self) -> Rect {
        let insets = box_insets(&self.style, self.rect.size());
        self.rect.inset(&insets)
    }

    pub fn at_path(&self, path: &[usize]) -> Option<&LayoutNode> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    /// Depth-first search by id.
    pub fn find(&self, id: NodeId) -> Option<&LayoutNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(LayoutNode::node_count).sum::<usize>()
    }
}

/// Collaborators layout reads from. Borrowed for the duration of one pass.
pub struct LayoutContext<'a> {
    pub measurer: &'a dyn TextMeasurer,
    pub assets: &'a AssetCache,
    pub overflow: OverflowPolicy,
    /// Style the root element inherits from.
    pub root_style: ComputedStyle,
}

impl<'a> LayoutContext<'a> {
    pub fn new(measurer: &'a dyn TextMeasurer, assets: &'a AssetCache) -> Self {
        Self {
            measurer,
            assets,
            overflow: OverflowPolicy::default(),
            root_style: ComputedStyle::default(),
        }
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_root_style(mut self, root_style: ComputedStyle) -> Self {
        self.root_style = root_style;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutcome {
    pub root: LayoutNode,
    pub overflows: Vec<LayoutOverflow>,
    /// Assets referenced by the tree that the cache has never seen.
    pub missing_assets: Vec<AssetRequest>,
}

/// Lays `root` out in a `width` × `height` window.
///
/// An auto-sized root fills the window.
pub fn compute_layout<V>(
    root: &Element<V>,
    width: f32,
    height: f32,
    cx: &LayoutContext<'_>,
) -> LayoutOutcome {
    let available = Vec2::new(width.max(0.0), height.max(0.0));
    let style = compute_style(root.parsed_style(), Some(&cx.root_style));
    let margin = style.margin.resolve(available.x, available.y);
    let size = Vec2::new(
        style
            .width
            .resolve(available.x)
            .unwrap_or((available.x - margin.horizontal()).max(0.0)),
        style
            .height
            .resolve(available.y)
            .unwrap_or((available.y - margin.vertical()).max(0.0)),
    );
    let rect = Rect::from_origin_size(Vec2::new(margin.left, margin.top), size);

    let mut pass = LayoutPass {
        cx,
        next_id: 0,
        overflows: Vec::new(),
        missing_assets: Vec::new(),
    };
    let root = pass.arrange(root, style, rect);
    LayoutOutcome {
        root,
        overflows: pass.overflows,
        missing_assets: pass.missing_assets,
    }
}

/// [`compute_layout`] with the fixed-advance measurer and no assets loaded.
pub fn layout<V>(root: &Element<V>, width: f32, height: f32) -> LayoutOutcome {
    let measurer = MonospaceMeasurer::default();
    let assets = AssetCache::new();
    compute_layout(root, width, height, &LayoutContext::new(&measurer, &assets))
}

fn box_insets(style: &ComputedStyle, size: Vec2) -> EdgeInsets<f32> {
    let padding = style.padding.resolve(size.x, size.y);
    let border = style.border_width.resolve(size.x).max(0.0);
    EdgeInsets {
        top: padding.top + border,
        right: padding.right + border,
        bottom: padding.bottom + border,
        left: padding.left + border,
    }
}

fn asset_of(kind: &ElementKind) -> Option<(&SmolStr, AssetKind)> {
    match kind {
        ElementKind::Image(path) => Some((path, AssetKind::Raster)),
        ElementKind::VectorIcon(path) => Some((path, AssetKind::Vector)),
        _ => None,
    }
}

struct LayoutPass<'c, 'a> {
    cx: &'c LayoutContext<'a>,
    next_id: u32,
    overflows: Vec<LayoutOverflow>,
    missing_assets: Vec<AssetRequest>,
}

/// A child after main-axis distribution.
struct Slot {
    style: ComputedStyle,
    margin: EdgeInsets<f32>,
    main: f32,
    /// Main size before grow or shrink.
    measured_main: f32,
    cross: f32,
}

impl LayoutPass<'_, '_> {
    /// Border-box size `element` wants when offered `available`.
    fn measure<V>(&self, element: &Element<V>, style: &ComputedStyle, available: Vec2) -> Vec2 {
        let explicit_w = style.width.resolve(available.x);
        let explicit_h = style.height.resolve(available.y);
        if let (Some(w), Some(h)) = (explicit_w, explicit_h) {
            return Vec2::new(w, h);
        }

        let outer = Vec2::new(
            explicit_w.unwrap_or(available.x),
            explicit_h.unwrap_or(available.y),
        );
        let insets = box_insets(style, outer);
        let inner = Vec2::new(
            (outer.x - insets.horizontal()).max(0.0),
            (outer.y - insets.vertical()).max(0.0),
        );

        let content = match element.kind() {
            ElementKind::Container => self.measure_children(element, style, inner),
            ElementKind::Text(content) => {
                self.cx.measurer.measure(content, style, Some(inner.x))
            }
            ElementKind::Image(path) | ElementKind::VectorIcon(path) => {
                self.cx.assets.intrinsic_size(path).unwrap_or(Vec2::ZERO)
            }
        };

        Vec2::new(
            explicit_w.unwrap_or(content.x + insets.horizontal()),
            explicit_h.unwrap_or(content.y + insets.vertical()),
        )
    }

    fn measure_children<V>(&self, element: &Element<V>, style: &ComputedStyle, inner: Vec2) -> Vec2 {
        let axis = Axis::from(style.flex_direction);
        let children = element.child_elements();
        let gap = style.gap.resolve(axis.of(inner)).max(0.0);

        let mut main = gap * children.len().saturating_sub(1) as f32;
        let mut cross = 0.0_f32;
        for child in children {
            let child_style = compute_style(child.parsed_style(), Some(style));
            let margin = child_style.margin.resolve(inner.x, inner.y);
            let size = self.measure(child, &child_style, inner);
            let (margin_main, margin_cross) = match axis {
                Axis::Horizontal => (margin.horizontal(), margin.vertical()),
                Axis::Vertical => (margin.vertical(), margin.horizontal()),
            };
            main += axis.of(size) + margin_main;
            cross = cross.max(axis.cross().of(size) + margin_cross);
        }
        axis.vec(main, cross)
    }

    /// Builds the node for `element` occupying `rect` and recurses.
    fn arrange<V>(&mut self, element: &Element<V>, style: ComputedStyle, rect: Rect) -> LayoutNode {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        let placeholder = match asset_of(element.kind()) {
            Some((path, kind)) => {
                if !self.cx.assets.contains(path)
                    && !self.missing_assets.iter().any(|req| &req.path == path)
                {
                    self.missing_assets.push(AssetRequest::new(path.clone(), kind));
                }
                !matches!(self.cx.assets.get(path), Some(AssetState::Ready(_)))
            }
            None => false,
        };

        let mut node = LayoutNode {
            id,
            kind: LayoutKind::from(element.kind()),
            rect,
            style,
            placeholder,
            children: Vec::new(),
        };
        if !element.child_elements().is_empty() {
            node.children = self.arrange_children(element, &node);
        }
        node
    }

    fn arrange_children<V>(&mut self, element: &Element<V>, parent: &LayoutNode) -> Vec<LayoutNode> {
        let style = &parent.style;
        let inner = parent.content_rect();
        let inner_size = inner.size();
        let axis = Axis::from(style.flex_direction);
        let inner_main = axis.of(inner_size);
        let inner_cross = axis.cross().of(inner_size);
        let children = element.child_elements();
        let gap = style.gap.resolve(inner_main).max(0.0);

        let mut slots: Vec<Slot> = children
            .iter()
            .map(|child| {
                let child_style = compute_style(child.parsed_style(), Some(style));
                let margin = child_style.margin.resolve(inner_size.x, inner_size.y);
                let base = self.measure(child, &child_style, inner_size);
                Slot {
                    main: axis.of(base),
                    measured_main: axis.of(base),
                    cross: axis.cross().of(base),
                    style: child_style,
                    margin,
                }
            })
            .collect();

        let margin_main = |margin: &EdgeInsets<f32>| match axis {
            Axis::Horizontal => (margin.left, margin.right),
            Axis::Vertical => (margin.top, margin.bottom),
        };
        let margin_cross = |margin: &EdgeInsets<f32>| match axis {
            Axis::Horizontal => (margin.top, margin.bottom),
            Axis::Vertical => (margin.left, margin.right),
        };

        let gaps = gap * slots.len().saturating_sub(1) as f32;
        let required = gaps
            + slots
                .iter()
                .map(|slot| {
                    let (start, end) = margin_main(&slot.margin);
                    slot.main + start + end
                })
                .sum::<f32>();
        let mut free = inner_main - required;

        if free > 0.0 {
            let total_grow: f32 = slots.iter().map(|slot| slot.style.flex_grow).sum();
            if total_grow > 0.0 {
                for slot in &mut slots {
                    slot.main += free * slot.style.flex_grow / total_grow;
                }
                free = 0.0;
            }
        } else if free < 0.0 {
            let overflow = -free;
            let warning = LayoutOverflow {
                node: parent.id,
                axis,
                available: inner_main,
                required,
                overflow,
            };
            warn!(%warning, "layout overflow");
            self.overflows.push(warning);

            if self.cx.overflow == OverflowPolicy::Shrink {
                let total_base: f32 = slots.iter().map(|slot| slot.main).sum();
                if total_base > 0.0 {
                    let reduce = overflow.min(total_base);
                    for slot in &mut slots {
                        slot.main = (slot.main - reduce * slot.main / total_base).max(0.0);
                    }
                }
            }
            free = 0.0;
        }

        // Text wraps to its final width, so its height follows any grow or shrink.
        if axis == Axis::Horizontal {
            for (child, slot) in children.iter().zip(&mut slots) {
                let base = slot.main;
                if matches!(child.kind(), ElementKind::Text(_))
                    && slot.style.height == SizeValue::Auto
                    && base != slot.measured_main
                {
                    slot.cross = self.measure(child, &slot.style, Vec2::new(base, inner_cross)).y;
                }
            }
        }

        let count = slots.len() as f32;
        let (mut cursor, between) = match style.justify_content {
            JustifyContent::Start => (0.0, 0.0),
            JustifyContent::Center => (free / 2.0, 0.0),
            JustifyContent::End => (free, 0.0),
            JustifyContent::SpaceBetween if slots.len() > 1 => (0.0, free / (count - 1.0)),
            JustifyContent::SpaceBetween => (0.0, 0.0),
            JustifyContent::SpaceAround => (free / count / 2.0, free / count),
            JustifyContent::SpaceEvenly => (free / (count + 1.0), free / (count + 1.0)),
        };

        let mut nodes = Vec::with_capacity(slots.len());
        for (child, slot) in children.iter().zip(slots) {
            let (main_start, main_end) = margin_main(&slot.margin);
            let (cross_start, cross_end) = margin_cross(&slot.margin);

            let explicit_cross = match axis {
                Axis::Horizontal => slot.style.height,
                Axis::Vertical => slot.style.width,
            };
            let cross = if style.align_items == AlignItems::Stretch
                && explicit_cross == SizeValue::Auto
            {
                (inner_cross - cross_start - cross_end).max(0.0)
            } else {
                slot.cross
            };
            let cross_offset = match style.align_items {
                AlignItems::Start | AlignItems::Stretch => cross_start,
                AlignItems::Center => {
                    cross_start + (inner_cross - cross - cross_start - cross_end) / 2.0
                }
                AlignItems::End => inner_cross - cross - cross_end,
            };

            cursor += main_start;
            let origin = inner.origin() + axis.vec(cursor, cross_offset);
            let size = axis.vec(slot.main, cross);
            cursor += slot.main + main_end + gap + between;

            nodes.push(self.arrange(child, slot.style, Rect::from_origin_size(origin, size)));
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::{LayoutContext, LayoutKind, NodeId, OverflowPolicy, Rect, compute_layout, layout};
    use crate::asset::{AssetCache, AssetInfo, AssetKind};
    use crate::error::AssetError;
    use crate::style::{AlignItems, JustifyContent, Length, Style};
    use crate::ui::Element;
    use crate::view::{Axis, MonospaceMeasurer};

    type El = Element<()>;

    fn boxed(width: f32, height: f32) -> El {
        Element::container().style(Style::new().size(width, height))
    }

    fn xs(node: &super::LayoutNode) -> Vec<f32> {
        node.children.iter().map(|child| child.rect.x).collect()
    }

    fn widths(node: &super::LayoutNode) -> Vec<f32> {
        node.children.iter().map(|child| child.rect.width).collect()
    }

    #[test]
    fn row_places_children_side_by_side() {
        let root: El = Element::container()
            .style(Style::new().row().width(300.0))
            .children([boxed(100.0, 20.0), boxed(100.0, 20.0), boxed(100.0, 20.0)]);
        let outcome = layout(&root, 300.0, 100.0);
        assert_eq!(xs(&outcome.root), vec![0.0, 100.0, 200.0]);
        assert_eq!(widths(&outcome.root), vec![100.0, 100.0, 100.0]);
        assert!(outcome.overflows.is_empty());
    }

    #[test]
    fn overflowing_row_shrinks_and_warns() {
        let root: El = Element::container()
            .style(Style::new().width(100.0))
            .children([boxed(80.0, 20.0), boxed(80.0, 20.0)]);
        let outcome = layout(&root, 400.0, 100.0);
        assert_eq!(widths(&outcome.root), vec![50.0, 50.0]);
        assert_eq!(xs(&outcome.root), vec![0.0, 50.0]);
        assert_eq!(outcome.overflows.len(), 1);
        let warning = outcome.overflows[0];
        assert_eq!(warning.node, NodeId::ROOT);
        assert_eq!(warning.axis, Axis::Horizontal);
        assert_eq!(warning.overflow, 60.0);
        assert_eq!(warning.required, 160.0);
    }

    #[test]
    fn shrunk_text_wraps_to_its_new_width() {
        // 10 chars at 5px: 50px wide, one 10px line
        let root: El = Element::container()
            .style(Style::new().width(60.0).font_size(10.0).line_height(1.0))
            .children([Element::text("abcdefghij"), Element::text("abcdefghij")]);
        let outcome = layout(&root, 400.0, 100.0);
        assert_eq!(widths(&outcome.root), vec![30.0, 30.0]);
        let heights: Vec<f32> = outcome.root.children.iter().map(|c| c.rect.height).collect();
        assert_eq!(heights, vec![20.0, 20.0]);
    }

    #[test]
    fn clip_policy_keeps_base_sizes() {
        let root: El = Element::container()
            .style(Style::new().width(100.0))
            .children([boxed(80.0, 20.0), boxed(80.0, 20.0)]);
        let measurer = MonospaceMeasurer::default();
        let assets = AssetCache::new();
        let cx = LayoutContext::new(&measurer, &assets).with_overflow(OverflowPolicy::Clip);
        let outcome = compute_layout(&root, 400.0, 100.0, &cx);
        assert_eq!(widths(&outcome.root), vec![80.0, 80.0]);
        assert_eq!(xs(&outcome.root), vec![0.0, 80.0]);
        assert_eq!(outcome.overflows.len(), 1);
    }

    #[test]
    fn column_gap_separates_children() {
        let root: El = Element::container()
            .style(Style::new().column().gap(10.0))
            .children([boxed(50.0, 20.0), boxed(50.0, 20.0), boxed(50.0, 20.0)]);
        let outcome = layout(&root, 200.0, 200.0);
        let ys: Vec<f32> = outcome.root.children.iter().map(|c| c.rect.y).collect();
        assert_eq!(ys, vec![0.0, 30.0, 60.0]);
    }

    #[test]
    fn grow_shares_free_space_by_weight() {
        let root: El = Element::container().style(Style::new().width(400.0)).children([
            boxed(100.0, 10.0),
            Element::container().style(Style::new().height(10.0).grow(1.0)),
            Element::container().style(Style::new().height(10.0).grow(3.0)),
        ]);
        let outcome = layout(&root, 400.0, 100.0);
        assert_eq!(widths(&outcome.root), vec![100.0, 75.0, 225.0]);
        assert_eq!(xs(&outcome.root), vec![0.0, 100.0, 175.0]);
    }

    #[test]
    fn justify_distributes_remaining_space() {
        let row = |justify| -> El {
            Element::container()
                .style(Style::new().width(100.0).justify(justify))
                .children([boxed(20.0, 10.0), boxed(20.0, 10.0)])
        };
        let cases = [
            (JustifyContent::Start, vec![0.0, 20.0]),
            (JustifyContent::Center, vec![30.0, 50.0]),
            (JustifyContent::End, vec![60.0, 80.0]),
            (JustifyContent::SpaceBetween, vec![0.0, 80.0]),
            (JustifyContent::SpaceAround, vec![15.0, 65.0]),
            (JustifyContent::SpaceEvenly, vec![20.0, 60.0]),
        ];
        for (justify, expected) in cases {
            let outcome = layout(&row(justify), 100.0, 100.0);
            assert_eq!(xs(&outcome.root), expected, "{justify:?}");
        }
    }

    #[test]
    fn cross_axis_alignment() {
        let row = |align| -> El {
            Element::container()
                .style(Style::new().size(100.0, 50.0).align(align))
                .children([boxed(10.0, 10.0), Element::container().style(Style::new().width(10.0))])
        };
        let first = |align| {
            let outcome = layout(&row(align), 100.0, 50.0);
            (outcome.root.children[0].rect, outcome.root.children[1].rect)
        };

        assert_eq!(first(AlignItems::Start).0.y, 0.0);
        assert_eq!(first(AlignItems::Center).0.y, 20.0);
        assert_eq!(first(AlignItems::End).0.y, 40.0);
        let (fixed, auto) = first(AlignItems::Stretch);
        assert_eq!(fixed.height, 10.0);
        assert_eq!(auto.height, 50.0);
    }

    #[test]
    fn box_model_offsets_children() {
        let root: El = Element::container()
            .style(Style::new().padding(10.0).border(2.0, "#000"))
            .child(
                Element::container()
                    .style(Style::new().size(20.0, 20.0).margin_x(5.0))
            );
        let outcome = layout(&root, 200.0, 200.0);
        assert_eq!(outcome.root.rect, Rect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(outcome.root.content_rect(), Rect::new(12.0, 12.0, 176.0, 176.0));
        assert_eq!(outcome.root.children[0].rect, Rect::new(17.0, 12.0, 20.0, 20.0));
    }

    #[test]
    fn percent_sizes_resolve_against_parent_content_box() {
        let root: El = Element::container()
            .style(Style::new().size(200.0, 100.0))
            .child(Element::container().style(Style::new().size(Length::percent(50.0), Length::percent(25.0))));
        let outcome = layout(&root, 500.0, 500.0);
        assert_eq!(outcome.root.children[0].rect.size(), Vec2::new(100.0, 25.0));
    }

    #[test]
    fn auto_container_wraps_its_children() {
        let root: El = Element::container().style(Style::new().column()).child(
            Element::container()
                .style(Style::new().padding(5.0).gap(4.0))
                .children([boxed(10.0, 30.0), boxed(20.0, 10.0)]),
        );
        let outcome = layout(&root, 300.0, 300.0);
        assert_eq!(outcome.root.children[0].rect.size(), Vec2::new(44.0, 40.0));
    }

    #[test]
    fn text_is_measured_with_inherited_font() {
        let root: El = Element::container()
            .style(Style::new().font_size(20.0).line_height(1.0))
            .child(Element::text("abcd"));
        let outcome = layout(&root, 300.0, 300.0);
        let text = &outcome.root.children[0];
        assert_eq!(text.kind, LayoutKind::Text("abcd".to_string()));
        assert_eq!(text.rect.size(), Vec2::new(40.0, 20.0));
    }

    #[test]
    fn unknown_asset_is_a_reported_placeholder() {
        let root: El = Element::container()
            .child(Element::image("photo.png"))
            .child(Element::vector_icon("star.svg").style(Style::new().size(16.0, 16.0)))
            .child(Element::image("photo.png"));
        let outcome = layout(&root, 300.0, 300.0);
        let nodes = &outcome.root.children;
        assert!(nodes.iter().all(|node| node.placeholder));
        assert_eq!(nodes[0].rect.size(), Vec2::ZERO);
        assert_eq!(nodes[1].rect.size(), Vec2::new(16.0, 16.0));
        let missing: Vec<_> = outcome.missing_assets.iter().map(|req| (req.path.as_str(), req.kind)).collect();
        assert_eq!(missing, vec![("photo.png", AssetKind::Raster), ("star.svg", AssetKind::Vector)]);
    }

    #[test]
    fn loaded_asset_uses_intrinsic_size() {
        let mut assets = AssetCache::new();
        assets.insert(
            "photo.png".into(),
            Ok(AssetInfo {
                kind: AssetKind::Raster,
                size: Vec2::new(64.0, 48.0),
            }),
        );
        assets.insert("broken.png".into(), Err(AssetError::NotFound));
        let root: El = Element::container()
            .child(Element::image("photo.png"))
            .child(Element::image("broken.png"));
        let measurer = MonospaceMeasurer::default();
        let outcome = compute_layout(&root, 300.0, 300.0, &LayoutContext::new(&measurer, &assets));

        let photo = &outcome.root.children[0];
        assert!(!photo.placeholder);
        assert_eq!(photo.rect.size(), Vec2::new(64.0, 48.0));
        let broken = &outcome.root.children[1];
        assert!(broken.placeholder);
        assert!(outcome.missing_assets.is_empty());
    }

    #[test]
    fn layout_is_deterministic() {
        let build = || -> El {
            Element::container()
                .style(Style::new().column().padding(6.0).gap(3.0))
                .child(Element::text("title").style(Style::new().font_size(22.0)))
                .child(
                    Element::container()
                        .style(Style::new().justify(JustifyContent::SpaceBetween))
                        .children([boxed(30.0, 30.0), Element::text("side")]),
                )
        };
        assert_eq!(layout(&build(), 320.0, 240.0), layout(&build(), 320.0, 240.0));
    }

    #[test]
    fn ids_are_assigned_in_preorder() {
        let root: El = Element::container()
            .child(Element::container().child(boxed(1.0, 1.0)))
            .child(boxed(1.0, 1.0));
        let outcome = layout(&root, 10.0, 10.0);
        let ids = [
            outcome.root.id,
            outcome.root.children[0].id,
            outcome.root.children[0].children[0].id,
            outcome.root.children[1].id,
        ];
        assert_eq!(ids, [NodeId(0), NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(outcome.root.find(NodeId(2)).map(|n| n.rect.size()), Some(Vec2::ONE));
        assert_eq!(outcome.root.at_path(&[1]).map(|n| n.id), Some(NodeId(3)));
    }
}
