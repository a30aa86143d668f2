//! Wavefront OBJ export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use amc_mesh::Mesh;

/// Error writing a mesh
#[derive(Debug)]
pub enum ExportError {
    Io(io::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "Failed to write mesh: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(e: io::Error) -> Self {
        ExportError::Io(e)
    }
}

/// Write `mesh` as OBJ with per-vertex normals
///
/// Face records reference vertex and normal by the same 1-based index.
pub fn write_obj<W: Write>(mesh: &Mesh, mut writer: W) -> Result<(), ExportError> {
    writeln!(writer, "# amc isosurface")?;
    writeln!(
        writer,
        "# {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    )?;

    for vertex in &mesh.vertices {
        let [x, y, z] = vertex.position;
        writeln!(writer, "v {} {} {}", x, y, z)?;
    }
    for vertex in &mesh.vertices {
        let [x, y, z] = vertex.normal;
        writeln!(writer, "vn {} {} {}", x, y, z)?;
    }
    for triangle in &mesh.triangles {
        let [a, b, c] = triangle.indices.map(|i| i + 1);
        writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }

    writer.flush()?;
    Ok(())
}

/// Write `mesh` to an OBJ file, replacing it if present
pub fn save_obj<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<(), ExportError> {
    let file = File::create(path.as_ref())?;
    write_obj(mesh, BufWriter::new(file))?;
    log::info!("Wrote {} triangles to {}", mesh.triangle_count(), path.as_ref().display());
    Ok(())
}
