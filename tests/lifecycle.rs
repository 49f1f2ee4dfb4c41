use simplicia::{
  flip::flip_diagonal,
  mesh::{Mesh, MeshCell},
  topology::Topology,
};

fn init_logging() {
  let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn triangle_strip_lifecycle() {
  init_logging();
  let mut topo = Topology::new();

  // two unit squares side by side, two triangles each
  // v3 - v4 - v5
  //  | / | /  |
  // v0 - v1 - v2
  let v: Vec<_> = (0..6).map(|_| topo.vertex()).collect();
  let t0 = topo.triangle_from_vertices([v[0], v[1], v[4]]);
  let t0b = topo.triangle_from_vertices([v[0], v[4], v[3]]);
  let t1 = topo.triangle_from_vertices([v[1], v[2], v[5]]);
  let t1b = topo.triangle_from_vertices([v[1], v[5], v[4]]);

  let mut mesh = Mesh::new();
  for cell in [t0, t0b, t1, t1b] {
    mesh.insert(cell).unwrap();
  }
  assert_eq!(topo.n_vertices(), 6);
  assert_eq!(topo.n_edges(), 9);
  assert_eq!(topo.n_triangles(), 4);
  assert_eq!(mesh.boundary_size(&topo), 6);
  assert!(topo.sanity_check());

  // flip the left square's diagonal; the mesh hands the pair back first
  topo.retain(t0);
  topo.retain(t0b);
  mesh.erase(&mut topo, t0).unwrap();
  mesh.erase(&mut topo, t0b).unwrap();
  let (n0, n1) = flip_diagonal(&mut topo, (t0, t0b)).unwrap();
  mesh.insert(n0).unwrap();
  mesh.insert(n1).unwrap();

  assert_eq!(topo.n_edges(), 9);
  assert!(topo.find_edge([v[0], v[4]]).is_none());
  assert!(topo.find_edge([v[1], v[3]]).is_some());
  assert_eq!(mesh.boundary_size(&topo), 6);
  assert!(topo.sanity_check());

  // tearing down every cell leaves only the vertices the caller still owns
  let cells: Vec<_> = mesh.cells().collect();
  for cell in cells {
    mesh.erase(&mut topo, cell).unwrap();
  }
  assert_eq!(topo.n_triangles(), 0);
  assert_eq!(topo.n_edges(), 0);
  assert_eq!(topo.n_vertices(), 6);
  for vertex in v {
    topo.erase_vertex(vertex);
  }
  assert!(topo.is_empty());
}

#[test]
fn glued_tetrahedra_lifecycle() {
  init_logging();
  let mut topo = Topology::new();
  let [a, b, c, d, e] = [
    topo.vertex(),
    topo.vertex(),
    topo.vertex(),
    topo.vertex(),
    topo.vertex(),
  ];
  // two tetrahedra glued along the triangle on (a, b, c)
  let upper = topo.tetrahedron_from_vertices([a, b, c, d]);
  let lower = topo.tetrahedron_from_vertices([b, a, c, e]);
  assert_ne!(
    topo.tetrahedron_footprint(upper),
    topo.tetrahedron_footprint(lower)
  );
  assert_eq!(topo.n_tetrahedra(), 2);
  assert_eq!(topo.n_triangles(), 7);
  assert_eq!(topo.n_oriented_triangles(), 8);
  assert_eq!(topo.n_edges(), 9);

  let mut mesh = Mesh::new();
  mesh.insert(upper).unwrap();
  mesh.insert(lower).unwrap();
  // the glued face is interior, both its orientations exist
  assert_eq!(mesh.boundary_size(&topo), 6);
  for face in upper.faces(&topo) {
    assert!(topo.is_valid_triangle(topo.triangle_edges(face)));
  }

  mesh.erase(&mut topo, lower).unwrap();
  assert_eq!(topo.n_tetrahedra(), 1);
  assert_eq!(topo.n_triangles(), 4);
  assert_eq!(topo.n_edges(), 6);
  // e lost its simplices but is still owned by us
  assert_eq!(topo.n_vertices(), 5);
  assert_eq!(mesh.boundary_size(&topo), 4);

  mesh.erase(&mut topo, upper).unwrap();
  for vertex in [a, b, c, d, e] {
    topo.erase_vertex(vertex);
  }
  assert!(topo.is_empty());
}
