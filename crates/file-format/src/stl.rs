//! STL output for tessellated bodies.
//!
//! Binary layout:
//! - 80 bytes: header
//! - 4 bytes: u32 LE triangle count
//! - Per triangle (50 bytes each):
//!   - 12 bytes: normal vector (3 × f32 LE)
//!   - 36 bytes: 3 vertices (3 × 3 × f32 LE)
//!   - 2 bytes: attribute byte count (0u16)

use std::io::Write;

use shape_kernel::RenderMesh;

use crate::errors::ExportError;

const HEADER_SIZE: usize = 80;
const HEADER_TEXT: &[u8] = b"meiga-parts STL export";

type Triangle = [[f32; 3]; 3];

/// Resolve every index triple into vertex positions, rejecting bad indices.
fn triangles(mesh: &RenderMesh) -> Result<Vec<Triangle>, ExportError> {
    if mesh.indices.len() % 3 != 0 {
        return Err(ExportError::InvalidMesh {
            reason: format!("{} indices is not a multiple of 3", mesh.indices.len()),
        });
    }
    let vertex_count = mesh.vertices.len() / 3;
    mesh.indices
        .chunks_exact(3)
        .map(|tri| {
            let mut out = [[0.0f32; 3]; 3];
            for (corner, &index) in out.iter_mut().zip(tri) {
                let i = index as usize;
                if i >= vertex_count {
                    return Err(ExportError::InvalidMesh {
                        reason: format!("index {} out of range ({} vertices)", i, vertex_count),
                    });
                }
                corner.copy_from_slice(&mesh.vertices[i * 3..i * 3 + 3]);
            }
            Ok(out)
        })
        .collect()
}

/// Facet normal via cross product of edges, zero for degenerate triangles.
fn facet_normal([v0, v1, v2]: &Triangle) -> [f32; 3] {
    let e1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
    let e2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
    let nx = e1[1] * e2[2] - e1[2] * e2[1];
    let ny = e1[2] * e2[0] - e1[0] * e2[2];
    let nz = e1[0] * e2[1] - e1[1] * e2[0];
    let len = (nx * nx + ny * ny + nz * nz).sqrt();
    if len > 1e-12 {
        [nx / len, ny / len, nz / len]
    } else {
        [0.0, 0.0, 0.0]
    }
}

/// Write a mesh as binary STL.
pub fn write_stl_binary<W: Write>(mesh: &RenderMesh, mut writer: W) -> Result<(), ExportError> {
    let tris = triangles(mesh)?;
    if tris.is_empty() {
        return Err(ExportError::EmptyMesh);
    }

    let mut header = [0u8; HEADER_SIZE];
    header[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT);
    writer.write_all(&header)?;
    writer.write_all(&(tris.len() as u32).to_le_bytes())?;

    for tri in &tris {
        for c in facet_normal(tri) {
            writer.write_all(&c.to_le_bytes())?;
        }
        for v in tri {
            for c in v {
                writer.write_all(&c.to_le_bytes())?;
            }
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a mesh as ASCII STL under the solid name `name`.
pub fn write_stl_ascii<W: Write>(
    mesh: &RenderMesh,
    name: &str,
    mut writer: W,
) -> Result<(), ExportError> {
    let tris = triangles(mesh)?;
    if tris.is_empty() {
        return Err(ExportError::EmptyMesh);
    }

    writeln!(writer, "solid {name}")?;
    for tri in &tris {
        let [nx, ny, nz] = facet_normal(tri);
        writeln!(writer, "  facet normal {nx:.6e} {ny:.6e} {nz:.6e}")?;
        writeln!(writer, "    outer loop")?;
        for [x, y, z] in tri {
            writeln!(writer, "      vertex {x:.6e} {y:.6e} {z:.6e}")?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {name}")?;
    writer.flush()?;
    Ok(())
}

/// Binary STL in memory.
pub fn render_mesh_to_stl(mesh: &RenderMesh) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + 4 + mesh.triangle_count() * 50);
    write_stl_binary(mesh, &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> RenderMesh {
        RenderMesh {
            vertices: vec![
                0.0, 0.0, 0.0, // v0
                1.0, 0.0, 0.0, // v1
                0.0, 1.0, 0.0, // v2
            ],
            normals: vec![],
            indices: vec![0, 1, 2],
            face_ranges: vec![],
        }
    }

    #[test]
    fn stl_export_empty_mesh_is_rejected() {
        let mesh = RenderMesh::default();
        assert!(matches!(render_mesh_to_stl(&mesh), Err(ExportError::EmptyMesh)));
    }

    #[test]
    fn stl_export_single_triangle() {
        let stl = render_mesh_to_stl(&single_triangle()).unwrap();
        // 84 header + 1 * 50 = 134
        assert_eq!(stl.len(), 134);
        assert!(stl.starts_with(HEADER_TEXT));
        assert_eq!(u32::from_le_bytes([stl[80], stl[81], stl[82], stl[83]]), 1);

        // (1,0,0)×(0,1,0) points up
        let nz = f32::from_le_bytes([stl[92], stl[93], stl[94], stl[95]]);
        assert!((nz - 1.0).abs() < 1e-6);
    }

    #[test]
    fn stl_export_multi_triangle() {
        let mesh = RenderMesh {
            vertices: vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                1.0, 1.0, 0.0, //
                0.0, 1.0, 0.0,
            ],
            normals: vec![],
            indices: vec![0, 1, 2, 0, 2, 3],
            face_ranges: vec![],
        };
        let stl = render_mesh_to_stl(&mesh).unwrap();
        assert_eq!(stl.len(), 84 + 2 * 50);
        assert_eq!(u32::from_le_bytes([stl[80], stl[81], stl[82], stl[83]]), 2);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut mesh = single_triangle();
        mesh.indices[2] = 7;
        assert!(matches!(
            render_mesh_to_stl(&mesh),
            Err(ExportError::InvalidMesh { .. })
        ));
    }

    #[test]
    fn ascii_stl_layout() {
        let mut out = Vec::new();
        write_stl_ascii(&single_triangle(), "rim", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("solid rim\n"));
        assert!(text.trim_end().ends_with("endsolid rim"));
        assert_eq!(text.matches("facet normal").count(), 1);
        assert_eq!(text.matches("vertex").count(), 3);
        assert!(text.contains("facet normal 0.000000e0 0.000000e0 1.000000e0"));
    }

    /// Accepts nothing, like a device with no space left.
    struct Full;

    impl Write for Full {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("no space left"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn buffered_write_failure_is_reported() {
        let mesh = single_triangle();
        let binary = write_stl_binary(&mesh, std::io::BufWriter::new(Full));
        assert!(matches!(binary, Err(ExportError::Io(_))));
        let ascii = write_stl_ascii(&mesh, "rim", std::io::BufWriter::new(Full));
        assert!(matches!(ascii, Err(ExportError::Io(_))));
    }

    #[test]
    fn degenerate_triangle_gets_zero_normal() {
        let tri = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        assert_eq!(facet_normal(&tri), [0.0, 0.0, 0.0]);
    }
}
