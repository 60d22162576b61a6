use crate::types::MinMaxAABB;

use super::Primitive;

/// Scene tree node.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
  Primitive(Primitive),
  Group(Group),
}

/// Ordered collection of child nodes.
///
/// A group has no distance function of its own; the filler walks it and
/// blends each primitive in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
  pub children: Vec<Node>,
}

impl Group {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, primitive: Primitive) {
    self.children.push(Node::Primitive(primitive));
  }

  pub fn push_group(&mut self, group: Group) {
    self.children.push(Node::Group(group));
  }

  /// True when no primitive exists anywhere below this group.
  pub fn is_empty(&self) -> bool {
    self.primitive_count() == 0
  }

  pub fn primitive_count(&self) -> usize {
    self
      .children
      .iter()
      .map(|child| match child {
        Node::Primitive(_) => 1,
        Node::Group(g) => g.primitive_count(),
      })
      .sum()
  }

  /// Visit every primitive in blend order.
  pub fn for_each_primitive<'a>(&'a self, f: &mut impl FnMut(&'a Primitive)) {
    for child in &self.children {
      match child {
        Node::Primitive(p) => f(p),
        Node::Group(g) => g.for_each_primitive(f),
      }
    }
  }

  /// Largest `smooth_k` of any primitive, 0 for an empty tree.
  pub fn max_smooth_k(&self) -> f32 {
    let mut max = 0.0f32;
    self.for_each_primitive(&mut |p| max = max.max(p.smooth_k));
    max
  }

  /// World bounds of everything that adds material, widened by `margin`.
  ///
  /// Carving primitives only remove material, so they never extend the
  /// surface. Invalid (empty) when nothing adds material.
  pub fn world_bounds(&self, margin: f32) -> MinMaxAABB {
    let mut bounds = MinMaxAABB::empty();
    self.for_each_primitive(&mut |p| {
      if !p.material.is_carve() {
        bounds.union(&p.world_bounds(margin));
      }
    });
    bounds
  }
}
