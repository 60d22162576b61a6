use super::*;

#[test]
fn test_linear_index_roundtrip() {
  let dim = [5, 7, 3];
  for x in 0..dim[0] {
    for y in 0..dim[1] {
      for z in 0..dim[2] {
        let idx = linear_index(dim, x, y, z);
        assert_eq!(
          linear_to_coord(dim, idx),
          [x, y, z],
          "Roundtrip failed for ({}, {}, {})",
          x,
          y,
          z
        );
      }
    }
  }
}

#[test]
fn test_linear_index_z_innermost() {
  let dim = [4, 4, 4];
  assert_eq!(linear_index(dim, 0, 0, 1), 1);
  assert_eq!(linear_index(dim, 0, 1, 0), 4);
  assert_eq!(linear_index(dim, 1, 0, 0), 16);
}

#[test]
fn test_corner_offsets() {
  assert_eq!(CORNER_OFFSETS[0], [0, 0, 0]);
  assert_eq!(CORNER_OFFSETS[6], [1, 1, 1]);

  // Bottom face winds 0→1→2→3, top face repeats it one unit up.
  for i in 0..4 {
    let bottom = CORNER_OFFSETS[i];
    let top = CORNER_OFFSETS[i + 4];
    assert_eq!([bottom[0], bottom[1], bottom[2] + 1], top);
  }
}

#[test]
fn test_subdiv_limits_are_ordered() {
  assert!(MIN_SUBDIV >= 2);
  assert!(MAX_CUBE_SUBDIV <= MAX_SUBDIV);
}
