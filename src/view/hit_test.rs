use glam::Vec2;

use crate::view::LayoutNode;

/// Finds the topmost node under `point`, as a path of child indices from
/// `root`. Later siblings are drawn on top, so they are tested first.
pub fn hit_test(root: &LayoutNode, point: Vec2) -> Option<Vec<usize>> {
    fn find(node: &LayoutNode, point: Vec2, path: &mut Vec<usize>) -> bool {
        if !node.rect.contains(point) {
            return false;
        }

        for (index, child) in node.children.iter().enumerate().rev() {
            path.push(index);
            if find(child, point, path) {
                return true;
            }
            path.pop();
        }

        true
    }

    let mut path = Vec::new();
    find(root, point, &mut path).then_some(path)
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::hit_test;
    use crate::style::{AlignItems, Style};
    use crate::ui::Element;
    use crate::view::layout;

    fn tree() -> crate::view::LayoutNode {
        let root: Element<()> = Element::container()
            .style(Style::new().size(100.0, 100.0).align(AlignItems::Start))
            .child(
                Element::container()
                    .style(Style::new().size(50.0, 50.0))
                    .child(Element::container().style(Style::new().size(10.0, 10.0))),
            )
            .child(Element::container().style(Style::new().size(30.0, 30.0)));
        layout(&root, 100.0, 100.0).root
    }

    #[test]
    fn deepest_node_under_point_wins() {
        assert_eq!(hit_test(&tree(), Vec2::new(5.0, 5.0)), Some(vec![0, 0]));
        assert_eq!(hit_test(&tree(), Vec2::new(20.0, 20.0)), Some(vec![0]));
        assert_eq!(hit_test(&tree(), Vec2::new(60.0, 10.0)), Some(vec![1]));
    }

    #[test]
    fn empty_area_hits_the_root() {
        assert_eq!(hit_test(&tree(), Vec2::new(95.0, 95.0)), Some(vec![]));
    }

    #[test]
    fn outside_the_root_misses() {
        assert_eq!(hit_test(&tree(), Vec2::new(150.0, 10.0)), None);
        assert_eq!(hit_test(&tree(), Vec2::new(100.0, 0.0)), None);
    }
}
