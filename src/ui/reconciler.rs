use crate::view::{LayoutNode, Rect};

/// A region of a window that must be repainted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Damage {
    Full,
    Rect(Rect),
}

/// Compares two frames of the same window.
///
/// The first frame, or a change of the root's kind, size or child count,
/// repaints everything. Otherwise each changed subtree contributes the union
/// of its old and new boxes.
pub fn reconcile(previous: Option<&LayoutNode>, next: &LayoutNode) -> Vec<Damage> {
    let Some(previous) = previous else {
        return vec![Damage::Full];
    };

    if previous.kind != next.kind
        || previous.rect != next.rect
        || previous.children.len() != next.children.len()
    {
        return vec![Damage::Full];
    }

    let mut damage = Vec::new();
    reconcile_node(previous, next, &mut damage);
    damage
}

fn reconcile_node(old: &LayoutNode, new: &LayoutNode, damage: &mut Vec<Damage>) {
    if old.kind != new.kind
        || old.rect != new.rect
        || old.style != new.style
        || old.placeholder != new.placeholder
        || old.children.len() != new.children.len()
    {
        damage.push(Damage::Rect(old.rect.union(&new.rect)));
        return;
    }

    for (old_child, new_child) in old.children.iter().zip(&new.children) {
        reconcile_node(old_child, new_child, damage);
    }
}
